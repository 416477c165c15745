use super::{DatasetBase, DatasetView, Records};
use ndarray::{Array1, ArrayBase, Data, Ix1, Ix2};

/// Implementation without constraints on records and targets
///
/// This implementation block provides a method for the creation of datasets
/// from records and targets, as well as methods to access and replace the
/// individual fields.
impl<R: Records, S> DatasetBase<R, S> {
    /// Create a new dataset from records and targets
    ///
    /// # Example
    ///
    /// ```ignore
    /// let dataset = Dataset::new(records, targets);
    /// ```
    pub fn new(records: R, targets: S) -> DatasetBase<R, S> {
        DatasetBase {
            records,
            targets,
            feature_names: Vec::new(),
        }
    }

    /// Returns reference to targets
    pub fn targets(&self) -> &S {
        &self.targets
    }

    /// Returns feature names
    ///
    /// A feature name gives a human-readable string describing the purpose of a single feature.
    /// This allow the reader to understand its purpose while analysing results, for example
    /// correlation analysis or feature importance. If no names were set, `feature-<index>` is
    /// returned for every feature.
    pub fn feature_names(&self) -> Vec<String> {
        if !self.feature_names.is_empty() {
            self.feature_names.clone()
        } else {
            (0..self.records.nfeatures())
                .map(|idx| format!("feature-{}", idx))
                .collect()
        }
    }

    /// Return records of a dataset
    ///
    /// The records are data points from which predictions are made. This functions returns a
    /// reference to the record field.
    pub fn records(&self) -> &R {
        &self.records
    }

    /// Updates the records of a dataset
    ///
    /// This function overwrites the records in a dataset. It also invalidates the feature
    /// names.
    pub fn with_records<T: Records>(self, records: T) -> DatasetBase<T, S> {
        DatasetBase {
            records,
            targets: self.targets,
            feature_names: Vec::new(),
        }
    }

    /// Updates the targets of a dataset
    ///
    /// Clustering algorithms use this to attach the predicted memberships to the records they
    /// were computed from.
    pub fn with_targets<T>(self, targets: T) -> DatasetBase<R, T> {
        DatasetBase {
            records: self.records,
            targets,
            feature_names: self.feature_names,
        }
    }

    /// Updates the feature names of a dataset
    pub fn with_feature_names<I: Into<String>>(mut self, names: Vec<I>) -> DatasetBase<R, S> {
        let feature_names = names.into_iter().map(|x| x.into()).collect();

        self.feature_names = feature_names;

        self
    }
}

impl<F, L, D: Data<Elem = F>, T: Data<Elem = L>> DatasetBase<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>> {
    /// Map targets with a function `f`
    ///
    /// # Returns
    ///
    /// A modified dataset with new target type.
    pub fn map_targets<M, G: FnMut(&L) -> M>(
        self,
        fnc: G,
    ) -> DatasetBase<ArrayBase<D, Ix2>, Array1<M>> {
        let DatasetBase {
            records,
            targets,
            feature_names,
        } = self;

        DatasetBase {
            records,
            targets: targets.map(fnc),
            feature_names,
        }
    }

    /// Creates a view of a dataset
    pub fn view(&self) -> DatasetView<'_, F, L> {
        DatasetBase::new(self.records.view(), self.targets.view())
            .with_feature_names(self.feature_names.clone())
    }
}

/// Create a dataset without targets from a record matrix
impl<F, D: Data<Elem = F>> From<ArrayBase<D, Ix2>> for DatasetBase<ArrayBase<D, Ix2>, ()> {
    fn from(records: ArrayBase<D, Ix2>) -> Self {
        DatasetBase {
            records,
            targets: (),
            feature_names: Vec::new(),
        }
    }
}

/// Create a dataset from a `(records, targets)` pair
impl<F, L, D: Data<Elem = F>, T: Data<Elem = L>> From<(ArrayBase<D, Ix2>, ArrayBase<T, Ix1>)>
    for DatasetBase<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>>
{
    fn from(rec_tar: (ArrayBase<D, Ix2>, ArrayBase<T, Ix1>)) -> Self {
        DatasetBase {
            records: rec_tar.0,
            targets: rec_tar.1,
            feature_names: Vec::new(),
        }
    }
}
