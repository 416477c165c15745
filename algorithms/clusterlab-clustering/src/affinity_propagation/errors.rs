use thiserror::Error;

/// An error when fitting with an invalid hyperparameter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AffinityPropagationParamsError {
    #[error("damping must lie in [0.5, 1), got {0}")]
    Damping(f64),
    #[error("max_n_iterations cannot be 0")]
    MaxIterations,
    #[error("convergence_iter cannot be 0")]
    ConvergenceIter,
    #[error("preference must be finite")]
    Preference,
}

/// An error when fitting an affinity propagation model
#[derive(Error, Debug, Clone)]
pub enum AffinityPropagationError {
    #[error("Invalid hyperparameter: {0}")]
    InvalidParams(#[from] AffinityPropagationParamsError),
    #[error("at least one sample is required")]
    NotEnoughSamples,
    #[error(transparent)]
    BaseCrate(#[from] clusterlab::error::Error),
}
