use std::cmp::Ordering;

use crate::k_means::{KMeans, KMeansError};
use crate::neighbors::{connected_components, kneighbors_graph, symmetrize};
use crate::spectral::{
    SpectralClusteringError, SpectralClusteringParams, SpectralClusteringValidParams,
};
use clusterlab::traits::{Fit, Predict};
use clusterlab::{DatasetBase, Float, ParamGuard};
use linfa_linalg::{eigh::EighInto, LinalgError};
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix2};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// Spectral clustering embeds the samples with the leading eigenvectors of a normalised
/// affinity graph and runs K-Means in that embedding. Unlike K-Means on the raw records it
/// recovers non convex shapes, such as concentric circles, as long as every shape forms a well
/// connected neighbourhood graph.
///
/// ## The algorithm
///
/// - Connect every sample to its `n_neighbors` nearest neighbours (itself included) and make the
///   graph undirected, giving the affinity matrix `A` with degrees `D`.
/// - Compute the `n_clusters` eigenvectors of `D^-1/2 A D^-1/2` with the largest eigenvalues,
///   which are the smallest ones of the normalised graph Laplacian.
/// - Scale the rows by `D^-1/2` and flip the sign of every eigenvector so that its entry of
///   largest magnitude is positive.
/// - Cluster the rows of the embedding with K-Means.
///
/// The model only describes the training samples: there is no way to embed new samples
/// without recomputing the graph, so no `predict` is provided.
///
/// ## Tutorial
///
/// ```
/// use clusterlab::DatasetBase;
/// use clusterlab::traits::Fit;
/// use clusterlab_clustering::SpectralClustering;
/// use ndarray::array;
///
/// let records = array![[0., 0.], [0., 1.], [1., 0.], [10., 10.], [10., 11.], [11., 10.]];
/// let model = SpectralClustering::params(2)
///     .n_neighbors(3)
///     .fit(&DatasetBase::from(records))
///     .unwrap();
///
/// let labels = model.labels();
/// assert_eq!(labels[0], labels[1]);
/// assert_eq!(labels[3], labels[5]);
/// assert_ne!(labels[0], labels[3]);
/// ```
pub struct SpectralClustering<F> {
    embedding: Array2<F>,
    labels: Array1<usize>,
    n_connected_components: usize,
}

impl<F: Float> SpectralClustering<F> {
    pub fn params(n_clusters: usize) -> SpectralClusteringParams<F, Xoshiro256Plus> {
        SpectralClusteringParams::new(n_clusters, Xoshiro256Plus::seed_from_u64(42))
    }

    pub fn params_with_rng<R: Rng>(n_clusters: usize, rng: R) -> SpectralClusteringParams<F, R> {
        SpectralClusteringParams::new(n_clusters, rng)
    }

    /// Cluster of every training sample
    pub fn labels(&self) -> &Array1<usize> {
        &self.labels
    }

    /// Spectral embedding with shape `(n_samples, n_clusters)`
    pub fn embedding(&self) -> &Array2<F> {
        &self.embedding
    }

    /// Number of connected components of the affinity graph
    pub fn n_connected_components(&self) -> usize {
        self.n_connected_components
    }
}

impl<F: Float, R: Rng + Clone, D: Data<Elem = F>, T>
    Fit<ArrayBase<D, Ix2>, T, SpectralClusteringError> for SpectralClusteringValidParams<F, R>
{
    type Object = SpectralClustering<F>;

    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<D, Ix2>, T>,
    ) -> Result<Self::Object, SpectralClusteringError> {
        let records = dataset.records();
        let n_samples = records.nrows();
        if n_samples < self.n_clusters() {
            return Err(SpectralClusteringError::NotEnoughSamples {
                n_samples,
                n_clusters: self.n_clusters(),
            });
        }

        let graph = symmetrize(&kneighbors_graph(records, self.n_neighbors(), true)?);
        let (n_connected_components, _) = connected_components(&graph);
        if n_connected_components > 1 {
            log::warn!(
                "Graph is not fully connected ({} components), spectral embedding may not work as expected.",
                n_connected_components
            );
        }

        let embedding = spectral_embedding(&affinity(&graph), self.n_clusters())?;
        let embedded = DatasetBase::from(embedding.clone());
        let kmeans = KMeans::params_with_rng(self.n_clusters(), self.rng().clone())
            .n_runs(self.n_runs())
            .check()
            .map_err(KMeansError::from)?
            .fit(&embedded)?;
        let labels = kmeans.predict(&embedding);
        log::debug!(
            "spectral clustering assigned {} samples to {} clusters",
            n_samples,
            self.n_clusters()
        );

        Ok(SpectralClustering {
            embedding,
            labels,
            n_connected_components,
        })
    }
}

/// Dense affinity matrix of an undirected graph, self loops removed
fn affinity<F: Float>(graph: &sprs::CsMat<F>) -> Array2<F> {
    let n = graph.rows();
    let mut dense = Array2::zeros((n, n));
    for (&v, (i, j)) in graph.iter() {
        if i != j {
            dense[(i, j)] = v;
        }
    }
    dense
}

/// Leading `n_components` eigenvectors of the normalised affinity, scaled back by the degrees
fn spectral_embedding<F: Float>(
    affinity: &Array2<F>,
    n_components: usize,
) -> Result<Array2<F>, LinalgError> {
    // isolated samples keep a unit degree to stay finite
    let dd = affinity.sum_axis(Axis(1)).mapv(|d| {
        if d > F::zero() {
            d.sqrt()
        } else {
            F::one()
        }
    });
    let mut normalized = affinity.clone();
    for ((i, j), v) in normalized.indexed_iter_mut() {
        *v = *v / (dd[i] * dd[j]);
    }

    let (values, vectors) = normalized.eigh_into()?;
    // eigenvalues come unordered, keep the largest ones
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[b]
            .partial_cmp(&values[a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });
    order.truncate(n_components);
    let mut embedding = vectors.select(Axis(1), &order);
    for (i, mut row) in embedding.rows_mut().into_iter().enumerate() {
        row.mapv_inplace(|x| x / dd[i]);
    }
    for mut column in embedding.columns_mut() {
        let largest = column
            .iter()
            .fold(F::zero(), |m, &x| if x.abs() > m.abs() { x } else { m });
        if largest < F::zero() {
            column.mapv_inplace(|x| -x);
        }
    }
    Ok(embedding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clusterlab::metrics::adjusted_rand_index;
    use clusterlab_datasets::generate;
    use ndarray::array;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<SpectralClustering<f64>>();
        has_autotraits::<SpectralClusteringParams<f64, Xoshiro256Plus>>();
        has_autotraits::<SpectralClusteringError>();
    }

    #[test]
    fn separates_concentric_circles() {
        let mut rng = Xoshiro256Plus::seed_from_u64(3);
        let (records, truth) = generate::make_circles(200, 0.5, 0.05, &mut rng).unwrap();
        let model = SpectralClustering::params(2)
            .fit(&DatasetBase::from(records))
            .unwrap();

        assert_eq!(model.embedding().dim(), (200, 2));
        let labels = model.labels().as_slice().unwrap();
        let ari = adjusted_rand_index(truth.as_slice().unwrap(), labels).unwrap();
        assert!(ari > 0.99, "ari = {}", ari);
    }

    #[test]
    fn separates_blobs() {
        let mut rng = Xoshiro256Plus::seed_from_u64(7);
        let centers = array![[0., 0.], [8., 8.], [-8., 8.]];
        let (records, truth) =
            generate::make_blobs(150, &centers, &[0.5, 0.5, 0.5], &mut rng).unwrap();
        let model = SpectralClustering::params(3)
            .fit(&DatasetBase::from(records))
            .unwrap();

        let labels = model.labels().as_slice().unwrap();
        let ari = adjusted_rand_index(truth.as_slice().unwrap(), labels).unwrap();
        assert!((ari - 1.).abs() < 1e-12);
    }

    #[test]
    fn embedding_signs_are_deterministic() {
        let records = array![[0., 0.], [0., 1.], [1., 0.], [5., 5.], [5., 6.], [6., 5.]];
        let model = SpectralClustering::<f64>::params(2)
            .n_neighbors(3)
            .fit(&DatasetBase::from(records))
            .unwrap();
        for column in model.embedding().columns() {
            let largest = column
                .iter()
                .fold(0f64, |m, &x| if x.abs() > m.abs() { x } else { m });
            assert!(largest > 0.);
        }
    }

    #[test]
    fn embedding_keeps_the_largest_eigenvalues() {
        // two disconnected pairs, the leading eigenvectors are constant on each pair while the
        // trailing ones flip sign within it
        let affinity: Array2<f64> = array![
            [0., 1., 0., 0.],
            [1., 0., 0., 0.],
            [0., 0., 0., 2.],
            [0., 0., 2., 0.]
        ];
        let embedding = spectral_embedding(&affinity, 2).unwrap();
        assert_eq!(embedding.dim(), (4, 2));
        for col in embedding.columns() {
            assert!((col[0] - col[1]).abs() < 1e-8);
            assert!((col[2] - col[3]).abs() < 1e-8);
        }
        let gap = (&embedding.row(0) - &embedding.row(2)).mapv(f64::abs).sum();
        assert!(gap > 1e-3);
    }

    #[test]
    fn too_few_samples() {
        let records = array![[0., 0.], [1., 1.]];
        let res = SpectralClustering::params(3).fit(&DatasetBase::from(records));
        assert!(matches!(
            res,
            Err(SpectralClusteringError::NotEnoughSamples {
                n_samples: 2,
                n_clusters: 3
            })
        ));
    }

    #[test]
    fn neighbours_are_checked_against_samples() {
        let records = array![[0., 0.], [1., 1.], [2., 2.]];
        let res = SpectralClustering::params(2)
            .n_neighbors(5)
            .check_unwrap()
            .fit(&DatasetBase::from(records));
        assert!(matches!(res, Err(SpectralClusteringError::Neighbors(_))));
    }
}
