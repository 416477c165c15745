//! Datasets
//!
//! This module implements the dataset struct and various helper traits to extend its
//! functionality.
use ndarray::{ArrayBase, ArrayView, Ix1, Ix2, NdFloat, OwnedRepr};

use num_traits::{AsPrimitive, FromPrimitive, NumCast, Signed};
use rand::distributions::uniform::SampleUniform;

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::iter::Sum;

mod impl_dataset;
mod impl_records;
mod impl_targets;

/// Floating point numbers
///
/// This trait bound multiplexes to the most common assumption of floating point number and
/// implement them for 32bit and 64bit floating points. They are used in the records of a dataset
/// and in all distances, centroids and densities computed by the clustering algorithms.
pub trait Float:
    NdFloat + FromPrimitive + Default + Signed + Sum + AsPrimitive<usize> + SampleUniform
{
    fn cast<T: NumCast>(x: T) -> Self {
        NumCast::from(x).unwrap()
    }
}

impl Float for f32 {}

impl Float for f64 {}

/// Discrete labels
///
/// Labels are countable, comparable and hashable. Cluster memberships are either `usize`, or
/// `Option<usize>` for algorithms which mark points as noise.
pub trait Label: PartialEq + Eq + Hash + Clone {}

impl Label for bool {}
impl Label for usize {}
impl Label for String {}
impl Label for () {}
impl Label for &str {}
impl Label for Option<usize> {}

/// DatasetBase
///
/// This is the fundamental structure of a dataset. It contains a number of records about the data
/// and may contain targets and feature names. In order to keep the type complexity low the dataset
/// base is only generic over the records and targets.
///
/// # Fields
///
/// * `records`: a two-dimensional matrix with dimensionality (nsamples, nfeatures)
/// * `targets`: generation labels of a synthetic dataset, or predicted cluster memberships
/// * `feature_names`: optional descriptive feature names with dimensionality (nfeatures)
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetBase<R, T>
where
    R: Records,
{
    pub records: R,
    pub targets: T,

    feature_names: Vec<String>,
}

/// Dataset
///
/// The most commonly used typed of dataset. It contains a number of records
/// stored as an `Array2` and each record corresponds to a single target.
pub type Dataset<D, T> = DatasetBase<ArrayBase<OwnedRepr<D>, Ix2>, ArrayBase<OwnedRepr<T>, Ix1>>;

/// DatasetView
///
/// A read only view of a Dataset
pub type DatasetView<'a, D, T> = DatasetBase<ArrayView<'a, D, Ix2>, ArrayView<'a, T, Ix1>>;

/// Record trait
pub trait Records: Sized {
    type Elem;

    fn nsamples(&self) -> usize;
    fn nfeatures(&self) -> usize;
}

/// Get the labels in all targets
pub trait Labels {
    type Elem: Label;

    fn label_count(&self) -> HashMap<Self::Elem, usize>;

    fn label_set(&self) -> HashSet<Self::Elem> {
        self.label_count().into_keys().collect()
    }

    fn labels(&self) -> Vec<Self::Elem> {
        self.label_set().into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1, Array2};

    #[test]
    fn dataset_implements_required_methods() {
        let dataset = Dataset::new(array![[1., 2.], [1., 2.], [3., 4.]], array![0usize, 1, 1]);

        assert_eq!(dataset.nsamples(), 3);
        assert_eq!(dataset.nfeatures(), 2);
        assert_eq!(dataset.feature_names(), vec!["feature-0", "feature-1"]);

        let counts = dataset.label_count();
        assert_eq!(counts[&0], 1);
        assert_eq!(counts[&1], 2);

        let dataset = dataset.with_feature_names(vec!["x", "y"]);
        assert_eq!(dataset.feature_names(), vec!["x", "y"]);
    }

    #[test]
    fn with_targets_replaces_labels() {
        let records: Array2<f64> = Array2::zeros((4, 2));
        let dataset = DatasetBase::from(records);
        assert_eq!(dataset.nsamples(), 4);

        let predicted: Array1<Option<usize>> = array![Some(0), None, Some(1), Some(1)];
        let dataset = dataset.with_targets(predicted);
        let mut labels = dataset.labels();
        labels.sort();
        assert_eq!(labels, vec![None, Some(0), Some(1)]);
    }

    #[test]
    fn view_shares_records() {
        let dataset = Dataset::new(array![[1., 2.], [3., 4.]], array![0usize, 1]);
        let view = dataset.view();
        assert_eq!(view.records(), dataset.records());
        assert_eq!(view.targets()[1], 1);
    }

    #[test]
    fn map_targets_keeps_records() {
        let dataset = Dataset::new(array![[1., 2.], [3., 4.]], array![0usize, 1]);
        let dataset = dataset.map_targets(|x| Some(*x));
        assert_eq!(dataset.targets(), &array![Some(0), Some(1)]);
    }
}
