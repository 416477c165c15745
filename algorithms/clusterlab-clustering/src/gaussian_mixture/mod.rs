mod algorithm;
mod errors;
mod hyperparams;

pub use algorithm::*;
pub use errors::{GmmError, GmmParamsError};
pub use hyperparams::*;
