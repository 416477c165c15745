mod algorithm;
mod analysis;
mod errors;
mod hyperparams;

pub use algorithm::*;
pub use analysis::*;
pub use errors::OpticsError;
pub use hyperparams::*;
