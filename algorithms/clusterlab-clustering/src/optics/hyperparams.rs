use crate::distance::Distance;
use crate::optics::errors::OpticsError;
use clusterlab::param_guard::TransformGuard;
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
/// the [OPTICS algorithm](crate::Optics).
pub struct OpticsValidParams<F, D, N> {
    /// Distance between points for them to be considered neighbours. Compared to DBSCAN this
    /// parameter isn't strictly necessary but improves execution time by not considering every
    /// point. If the tolerance is too low the distances calculated are undefined and no clusters
    /// will be returned.
    tolerance: F,
    /// Distance metric to be used for the algorithm
    dist_fn: D,
    /// The minimum number of points (the point itself included) for a point to be a core point
    min_points: usize,
    /// Nearest neighbour algorithm answering the range queries
    nn_algo: N,
}

#[derive(Clone, Debug, PartialEq)]
/// Helper struct for building a set of [OPTICS hyperparameters](OpticsValidParams)
pub struct OpticsParams<F, D, N>(OpticsValidParams<F, D, N>);

impl<F: Float, D: Distance<F>, N> OpticsParams<F, D, N> {
    pub(crate) fn new(min_points: usize, dist_fn: D, nn_algo: N) -> Self {
        Self(OpticsValidParams {
            min_points,
            tolerance: F::infinity(),
            dist_fn,
            nn_algo,
        })
    }

    /// Set the maximum distance between two points for them to be considered neighbours
    pub fn tolerance(mut self, tolerance: F) -> Self {
        self.0.tolerance = tolerance;
        self
    }

    /// Set the distance metric
    pub fn dist_fn(mut self, dist_fn: D) -> Self {
        self.0.dist_fn = dist_fn;
        self
    }

    /// Set the nearest neighbour algorithm to be used
    pub fn nn_algo(mut self, nn_algo: N) -> Self {
        self.0.nn_algo = nn_algo;
        self
    }
}

impl<F: Float, D, N> ParamGuard for OpticsParams<F, D, N> {
    type Checked = OpticsValidParams<F, D, N>;
    type Error = OpticsError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if self.0.tolerance <= F::zero() {
            Err(OpticsError::Tolerance)
        } else if self.0.min_points <= 1 {
            Err(OpticsError::MinPoints)
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}
impl<F: Float, D, N> TransformGuard for OpticsParams<F, D, N> {}

impl<F: Float, D, N> OpticsValidParams<F, D, N> {
    /// Maximum distance for two points to be neighbours
    pub fn tolerance(&self) -> F {
        self.tolerance
    }

    /// Minimum number of points needed to form a cluster
    pub fn minimum_points(&self) -> usize {
        self.min_points
    }

    /// Distance metric used in the OPTICS calculation
    pub fn dist_fn(&self) -> &D {
        &self.dist_fn
    }

    /// Nearest neighbour algorithm used for range queries
    pub fn nn_algo(&self) -> &N {
        &self.nn_algo
    }
}
