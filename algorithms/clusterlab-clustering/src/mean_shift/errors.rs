use clusterlab_nn::NnError;
use thiserror::Error;

/// An error when fitting with an invalid hyperparameter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeanShiftParamsError {
    #[error("bandwidth must be greater than 0")]
    Bandwidth,
    #[error("min_bin_freq cannot be 0")]
    MinBinFreq,
    #[error("max_n_iterations cannot be 0")]
    MaxIterations,
}

/// An error when fitting a mean shift model
#[derive(Error, Debug, Clone)]
pub enum MeanShiftError {
    #[error("Invalid hyperparameter: {0}")]
    InvalidParams(#[from] MeanShiftParamsError),
    /// No seed had a sample within the bandwidth
    #[error("No point was within bandwidth={0} of any seed. Try a different seeding strategy or increase the bandwidth.")]
    NoCenters(f64),
    /// A seed or sample holds non-finite values
    #[error("neighbour query failed: {0}")]
    Query(#[from] NnError),
    #[error(transparent)]
    BaseCrate(#[from] clusterlab::error::Error),
}
