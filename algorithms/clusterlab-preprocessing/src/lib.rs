//! # Preprocessing
//! `clusterlab-preprocessing` provides the feature scaling applied to datasets before they are
//! clustered.
//!
//! Distance based clustering algorithms are sensitive to the scale of the features, so the
//! gallery standardises every dataset to zero mean and unit variance first. The
//! [`LinearScaler`] is fitted on a dataset and the resulting [`FittedLinearScaler`] transforms
//! records or whole datasets.
//!
//! ```
//! use clusterlab::traits::{Fit, Transformer};
//! use clusterlab::DatasetBase;
//! use clusterlab_preprocessing::LinearScaler;
//! use ndarray::{array, Array2};
//!
//! let dataset: DatasetBase<Array2<f64>, ()> = array![[1., 10.], [2., 20.], [3., 30.]].into();
//! let scaler = LinearScaler::standard().fit(&dataset).unwrap();
//! let scaled = scaler.transform(dataset);
//! // the middle row sits on the mean of every feature
//! let v: f64 = scaled.records()[[1, 1]];
//! assert!(v.abs() < 1e-12);
//! ```

pub mod error;
mod linear_scaler;

pub use error::PreprocessingError;
pub use linear_scaler::{FittedLinearScaler, LinearScaler, ScalingMethod};
