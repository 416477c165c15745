use thiserror::Error;

/// An error when fitting with an invalid hyperparameter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KMeansParamsError {
    #[error("n_clusters cannot be 0")]
    NClusters,
    #[error("n_runs cannot be 0")]
    NRuns,
    #[error("tolerance must be greater than 0")]
    Tolerance,
    #[error("max_n_iterations cannot be 0")]
    MaxIterations,
    #[error("batch_size cannot be 0")]
    BatchSize,
    #[error("precomputed centroids have {found} rows, expected n_clusters = {expected}")]
    PrecomputedCentroids { expected: usize, found: usize },
}

/// An error when modeling a KMeans algorithm
#[derive(Error, Debug, Clone)]
pub enum KMeansError {
    /// When any of the hyperparameters are set the wrong value
    #[error("Invalid hyperparameter: {0}")]
    InvalidParams(#[from] KMeansParamsError),
    /// When there are fewer samples than requested clusters
    #[error("n_samples = {n_samples} should be >= n_clusters = {n_clusters}")]
    NotEnoughSamples { n_samples: usize, n_clusters: usize },
    /// When inertia computation fails
    #[error("Fitting failed: No inertia improvement (-inf)")]
    InertiaError,
    #[error(transparent)]
    BaseCrate(#[from] clusterlab::error::Error),
}
