//! Provide traits for different classes of algorithms
//!

use crate::dataset::{DatasetBase, Records};
use std::convert::From;

/// Transformation algorithms
///
/// A transformer takes a dataset and transforms it into a different one. It has no concept of
/// state and provides therefore no method to predict new data. A typical example are density
/// based clustering algorithms, which label the points they were given but cannot label unseen
/// ones, or a scaler which maps records onto a fixed range.
pub trait Transformer<R, T> {
    fn transform(&self, x: R) -> T;
}

/// Fittable algorithms
///
/// A fittable algorithm takes a dataset and creates a concept of some kind about it. For example
/// in *KMeans* this would be the mean values for each class, or in *Birch* the clustering feature
/// tree summarising the training records.
pub trait Fit<R: Records, T, E: std::error::Error + From<crate::error::Error>> {
    type Object;

    fn fit(&self, dataset: &DatasetBase<R, T>) -> Result<Self::Object, E>;
}

/// Predict with model
///
/// A fitted model assigns memberships to records. Models implement this for `&Array2` inputs,
/// returning the memberships directly, and for datasets, returning the dataset with the
/// memberships attached as targets.
pub trait Predict<R, T> {
    fn predict(&self, x: R) -> T;
}
