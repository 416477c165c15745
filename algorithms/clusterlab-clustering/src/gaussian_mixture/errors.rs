use crate::k_means::KMeansError;
use linfa_linalg::LinalgError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GmmError>;

/// An error when fitting with an invalid hyperparameter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GmmParamsError {
    #[error("n_clusters cannot be 0")]
    NClusters,
    #[error("tolerance must be greater than 0")]
    Tolerance,
    #[error("reg_covariance must be positive")]
    RegCovariance,
    #[error("n_runs cannot be 0")]
    NRuns,
    #[error("max_n_iterations cannot be 0")]
    MaxIterations,
}

/// An error when modeling a GMM algorithm
#[derive(Error, Debug)]
pub enum GmmError {
    /// When any of the hyperparameters are set the wrong value
    #[error("Invalid hyperparameter: {0}")]
    InvalidParams(#[from] GmmParamsError),
    #[error("n_samples = {n_samples} should be >= n_clusters = {n_clusters}")]
    NotEnoughSamples { n_samples: usize, n_clusters: usize },
    /// Errors encountered during linear algebra operations
    #[error(
        "Linalg Error: \
    Fitting the mixture model failed because some components have \
    ill-defined empirical covariance (for instance caused by singleton \
    or collapsed samples). Try to decrease the number of components, \
    or increase reg_covar. Error: {0}"
    )]
    LinalgError(#[from] LinalgError),
    /// When lower bound computation fails
    #[error("Fitting failed: {0}")]
    LowerBoundError(String),
    /// When initial KMeans fails
    #[error("Initial KMeans failed: {0}")]
    KMeansError(#[from] KMeansError),
    #[error(transparent)]
    BaseCrate(#[from] clusterlab::error::Error),
}
