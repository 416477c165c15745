use crate::k_means::KMeansError;
use crate::neighbors::NeighborsError;
use linfa_linalg::LinalgError;
use thiserror::Error;

/// An error when fitting with an invalid hyperparameter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpectralClusteringParamsError {
    #[error("n_clusters cannot be 0")]
    NClusters,
    #[error("n_neighbors cannot be 0")]
    NNeighbors,
    #[error("n_runs cannot be 0")]
    NRuns,
}

/// An error when running spectral clustering
#[derive(Error, Debug)]
pub enum SpectralClusteringError {
    #[error("Invalid hyperparameter: {0}")]
    InvalidParams(#[from] SpectralClusteringParamsError),
    #[error("n_samples = {n_samples} should be >= n_clusters = {n_clusters}")]
    NotEnoughSamples { n_samples: usize, n_clusters: usize },
    #[error("affinity graph: {0}")]
    Neighbors(#[from] NeighborsError),
    #[error("spectral embedding: {0}")]
    Linalg(#[from] LinalgError),
    #[error("label assignment: {0}")]
    KMeans(#[from] KMeansError),
    #[error(transparent)]
    BaseCrate(#[from] clusterlab::error::Error),
}
