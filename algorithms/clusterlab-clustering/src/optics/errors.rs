use thiserror::Error;
pub type Result<T> = std::result::Result<T, OpticsError>;

/// An error when running the OPTICS analysis or extracting clusters from it
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpticsError {
    #[error("min_points must be greater than 1")]
    MinPoints,
    #[error("tolerance must be greater than 0")]
    Tolerance,
    /// The steepness threshold of the Xi extraction lies outside `(0, 1)`
    #[error("xi must lie in (0, 1), got {0}")]
    Xi(f64),
    #[error("invalid min_cluster_size: {0}")]
    ClusterSize(String),
}
