mod algorithm;
mod errors;
mod hyperparams;

pub(crate) use algorithm::agglomerate;
pub use algorithm::*;
pub use errors::*;
pub use hyperparams::*;
