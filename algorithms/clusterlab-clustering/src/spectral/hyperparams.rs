use super::SpectralClusteringParamsError;
use clusterlab::{Float, ParamGuard};
use rand::Rng;

#[derive(Clone, Debug, PartialEq)]
/// The set of hyperparameters that can be specified for the execution of
/// the [spectral clustering algorithm](crate::SpectralClustering).
pub struct SpectralClusteringValidParams<F: Float, R: Rng> {
    /// Number of clusters, also the dimension of the spectral embedding
    n_clusters: usize,
    /// Neighbours of every sample (itself included) in the affinity graph
    n_neighbors: usize,
    /// K-means runs on the embedding
    n_runs: usize,
    rng: R,
    #[doc(hidden)]
    float: std::marker::PhantomData<F>,
}

#[derive(Clone, Debug, PartialEq)]
/// An helper struct used to construct a set of [valid hyperparameters](SpectralClusteringValidParams)
/// for the [spectral clustering algorithm](crate::SpectralClustering) (using the builder pattern).
pub struct SpectralClusteringParams<F: Float, R: Rng>(SpectralClusteringValidParams<F, R>);

impl<F: Float, R: Rng> SpectralClusteringParams<F, R> {
    /// Defaults are provided if optional parameters are not specified:
    /// * `n_neighbors = 10`
    /// * `n_runs = 10`
    pub fn new(n_clusters: usize, rng: R) -> Self {
        Self(SpectralClusteringValidParams {
            n_clusters,
            n_neighbors: 10,
            n_runs: 10,
            rng,
            float: std::marker::PhantomData,
        })
    }

    pub fn n_neighbors(mut self, n_neighbors: usize) -> Self {
        self.0.n_neighbors = n_neighbors;
        self
    }

    pub fn n_runs(mut self, n_runs: usize) -> Self {
        self.0.n_runs = n_runs;
        self
    }
}

impl<F: Float, R: Rng> ParamGuard for SpectralClusteringParams<F, R> {
    type Checked = SpectralClusteringValidParams<F, R>;
    type Error = SpectralClusteringParamsError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if self.0.n_clusters == 0 {
            Err(SpectralClusteringParamsError::NClusters)
        } else if self.0.n_neighbors == 0 {
            Err(SpectralClusteringParamsError::NNeighbors)
        } else if self.0.n_runs == 0 {
            Err(SpectralClusteringParamsError::NRuns)
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float, R: Rng> SpectralClusteringValidParams<F, R> {
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    pub fn n_runs(&self) -> usize {
        self.n_runs
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }
}

#[cfg(test)]
mod tests {
    use crate::{SpectralClustering, SpectralClusteringParamsError};
    use clusterlab::ParamGuard;

    #[test]
    fn counts_cannot_be_zero() {
        let res = SpectralClustering::<f64>::params(0).check();
        assert!(matches!(res, Err(SpectralClusteringParamsError::NClusters)));
        let res = SpectralClustering::<f64>::params(2).n_neighbors(0).check();
        assert!(matches!(res, Err(SpectralClusteringParamsError::NNeighbors)));
        let res = SpectralClustering::<f64>::params(2).n_runs(0).check();
        assert!(matches!(res, Err(SpectralClusteringParamsError::NRuns)));
        assert!(SpectralClustering::<f64>::params(2).check().is_ok());
    }
}
