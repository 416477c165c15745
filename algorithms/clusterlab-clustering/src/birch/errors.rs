use thiserror::Error;

/// An error when fitting with an invalid hyperparameter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BirchParamsError {
    #[error("threshold must be greater than 0")]
    Threshold,
    #[error("branching_factor should be greater than one")]
    BranchingFactor,
    #[error("n_clusters cannot be 0")]
    NClusters,
}

/// An error when fitting a BIRCH model
#[derive(Error, Debug, Clone)]
pub enum BirchError {
    #[error("Invalid hyperparameter: {0}")]
    InvalidParams(#[from] BirchParamsError),
    #[error("BIRCH needs at least one sample")]
    NotEnoughSamples,
    #[error(transparent)]
    BaseCrate(#[from] clusterlab::error::Error),
}
