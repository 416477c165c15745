//! `clusterlab` is a small toolkit of classical clustering algorithms written in pure Rust,
//! kin in spirit to Python's `scikit-learn`, together with a gallery binary that compares
//! them on two dimensional toy datasets.
//!
//! This crate holds the shared vocabulary of the workspace:
//!
//! * [`DatasetBase`] pairs records with targets (ground truth or predicted labels)
//! * the [`traits`] module defines how estimators are fitted and how models predict
//! * the [`param_guard`] module separates unchecked hyperparameter builders from validated
//!   parameter sets
//! * the [`metrics`] module scores a clustering against a reference labeling
//!
//! The algorithms themselves live in `clusterlab-clustering`, the data generators in
//! `clusterlab-datasets` and feature scaling in `clusterlab-preprocessing`.

pub mod dataset;
pub mod error;
mod metrics_clustering;
pub mod param_guard;
pub mod prelude;
pub mod traits;

pub use dataset::{Dataset, DatasetBase, Float, Label};
pub use param_guard::ParamGuard;

/// Common metrics functions for clustering
pub mod metrics {
    pub use crate::metrics_clustering::{adjusted_rand_index, SilhouetteScore};
}
