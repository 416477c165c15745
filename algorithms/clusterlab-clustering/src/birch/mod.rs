mod algorithm;
mod cf_tree;
mod errors;
mod hyperparams;

pub use algorithm::*;
pub use errors::*;
pub use hyperparams::*;
