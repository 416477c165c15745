use thiserror::Error;

/// An error when fitting with an invalid hyperparameter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgglomerativeParamsError {
    #[error("n_clusters cannot be 0")]
    NClusters,
    #[error("Ward linkage only works with the euclidean metric")]
    WardMetric,
    #[error("connectivity must be a square matrix, got {0}x{1}")]
    ConnectivityShape(usize, usize),
}

/// An error when building a cluster hierarchy
#[derive(Error, Debug, Clone)]
pub enum AgglomerativeError {
    #[error("Invalid hyperparameter: {0}")]
    InvalidParams(#[from] AgglomerativeParamsError),
    #[error("n_samples = {n_samples} should be >= n_clusters = {n_clusters}")]
    NotEnoughSamples { n_samples: usize, n_clusters: usize },
    #[error("connectivity has {found} rows but there are {expected} samples")]
    ConnectivityMismatch { expected: usize, found: usize },
    #[error(transparent)]
    BaseCrate(#[from] clusterlab::error::Error),
}
