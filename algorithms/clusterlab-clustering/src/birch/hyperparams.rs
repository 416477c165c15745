use super::BirchParamsError;
use clusterlab::{Float, ParamGuard};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// The set of hyperparameters that can be specified for the execution of
/// the [BIRCH algorithm](crate::Birch).
pub struct BirchValidParams<F> {
    /// Largest radius of a subcluster absorbing a new sample
    threshold: F,
    /// Largest number of subclusters in a node
    branching_factor: usize,
    /// Clusters formed from the subclusters, `None` keeps every subcluster
    n_clusters: Option<usize>,
}

#[derive(Clone, Debug, PartialEq)]
/// An helper struct used to construct a set of [valid hyperparameters](BirchValidParams) for
/// the [BIRCH algorithm](crate::Birch) (using the builder pattern).
pub struct BirchParams<F>(BirchValidParams<F>);

impl<F: Float> Default for BirchParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> BirchParams<F> {
    /// Defaults are provided if optional parameters are not specified:
    /// * `threshold = 0.5`
    /// * `branching_factor = 50`
    /// * `n_clusters = Some(3)`
    pub fn new() -> Self {
        Self(BirchValidParams {
            threshold: F::cast(0.5),
            branching_factor: 50,
            n_clusters: Some(3),
        })
    }

    pub fn threshold(mut self, threshold: F) -> Self {
        self.0.threshold = threshold;
        self
    }

    pub fn branching_factor(mut self, branching_factor: usize) -> Self {
        self.0.branching_factor = branching_factor;
        self
    }

    pub fn n_clusters(mut self, n_clusters: Option<usize>) -> Self {
        self.0.n_clusters = n_clusters;
        self
    }
}

impl<F: Float> ParamGuard for BirchParams<F> {
    type Checked = BirchValidParams<F>;
    type Error = BirchParamsError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if !(self.0.threshold > F::zero()) {
            Err(BirchParamsError::Threshold)
        } else if self.0.branching_factor <= 1 {
            Err(BirchParamsError::BranchingFactor)
        } else if self.0.n_clusters == Some(0) {
            Err(BirchParamsError::NClusters)
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float> BirchValidParams<F> {
    pub fn threshold(&self) -> F {
        self.threshold
    }

    pub fn branching_factor(&self) -> usize {
        self.branching_factor
    }

    pub fn n_clusters(&self) -> Option<usize> {
        self.n_clusters
    }
}
