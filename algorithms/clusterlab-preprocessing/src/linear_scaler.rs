//! Linear feature scaling
use crate::error::{PreprocessingError, Result};
use clusterlab::dataset::{DatasetBase, Float};
use clusterlab::traits::{Fit, Transformer};
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix2, Zip};

/// Scaling applied by a [`LinearScaler`]
#[derive(Clone, Debug, PartialEq)]
pub enum ScalingMethod<F> {
    /// Standardise features, optionally centring on the mean and dividing by the population
    /// standard deviation
    Standard(bool, bool),
    /// Map every feature onto the range `[min, max]`
    MinMax(F, F),
}

impl<F: Float> std::fmt::Display for ScalingMethod<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalingMethod::Standard(with_mean, with_std) => write!(
                f,
                "Standard scaler (with_mean = {}, with_std = {})",
                with_mean, with_std
            ),
            ScalingMethod::MinMax(min, max) => {
                write!(f, "Min-Max scaler (min = {}, max = {})", min, max)
            }
        }
    }
}

/// Scaler of the features of a dataset
///
/// Every feature is shifted by an offset and multiplied by a scale learned from the training
/// records. Features which are constant in the training records are only shifted.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearScaler<F> {
    method: ScalingMethod<F>,
}

impl<F: Float> LinearScaler<F> {
    pub fn new(method: ScalingMethod<F>) -> Self {
        Self { method }
    }

    pub fn method(mut self, method: ScalingMethod<F>) -> Self {
        self.method = method;
        self
    }

    /// Zero mean, unit variance
    pub fn standard() -> Self {
        Self {
            method: ScalingMethod::Standard(true, true),
        }
    }

    pub fn standard_no_mean() -> Self {
        Self {
            method: ScalingMethod::Standard(false, true),
        }
    }

    pub fn standard_no_std() -> Self {
        Self {
            method: ScalingMethod::Standard(true, false),
        }
    }

    pub fn min_max() -> Self {
        Self {
            method: ScalingMethod::MinMax(F::zero(), F::one()),
        }
    }

    pub fn min_max_range(min: F, max: F) -> Self {
        Self {
            method: ScalingMethod::MinMax(min, max),
        }
    }
}

impl<F: Float, D: Data<Elem = F>, T> Fit<ArrayBase<D, Ix2>, T, PreprocessingError>
    for LinearScaler<F>
{
    type Object = FittedLinearScaler<F>;

    fn fit(&self, x: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Self::Object> {
        match &self.method {
            ScalingMethod::Standard(with_mean, with_std) => {
                FittedLinearScaler::standard(x.records(), *with_mean, *with_std)
            }
            ScalingMethod::MinMax(min, max) => FittedLinearScaler::min_max(x.records(), *min, *max),
        }
    }
}

/// Offsets and scales learned by a [`LinearScaler`]
#[derive(Clone, Debug, PartialEq)]
pub struct FittedLinearScaler<F> {
    offsets: Array1<F>,
    scales: Array1<F>,
    method: ScalingMethod<F>,
}

/// A spread this close to zero marks a constant feature, which is left unscaled
fn inverse_or_one<F: Float>(spread: F) -> F {
    if spread < F::epsilon() * F::cast(10) {
        F::one()
    } else {
        F::one() / spread
    }
}

impl<F: Float> FittedLinearScaler<F> {
    pub(crate) fn standard<D: Data<Elem = F>>(
        records: &ArrayBase<D, Ix2>,
        with_mean: bool,
        with_std: bool,
    ) -> Result<Self> {
        let means = match records.mean_axis(Axis(0)) {
            Some(means) if with_mean => means,
            Some(_) => Array1::zeros(records.ncols()),
            None => return Err(PreprocessingError::NotEnoughSamples),
        };
        let std_devs = if with_std {
            records.std_axis(Axis(0), F::zero()).mapv(inverse_or_one)
        } else {
            Array1::ones(records.ncols())
        };
        Ok(Self {
            offsets: means,
            scales: std_devs,
            method: ScalingMethod::Standard(with_mean, with_std),
        })
    }

    pub(crate) fn min_max<D: Data<Elem = F>>(
        records: &ArrayBase<D, Ix2>,
        min: F,
        max: F,
    ) -> Result<Self> {
        if records.nrows() == 0 {
            return Err(PreprocessingError::NotEnoughSamples);
        }
        let mins = records.fold_axis(Axis(0), F::infinity(), |&x, &prev| x.min(prev));
        let mut scales = records.fold_axis(Axis(0), F::neg_infinity(), |&x, &prev| x.max(prev));
        Zip::from(&mut scales).and(&mins).for_each(|max, &min| {
            *max = inverse_or_one(*max - min);
        });
        Ok(Self {
            offsets: mins,
            scales,
            method: ScalingMethod::MinMax(min, max),
        })
    }

    pub fn offsets(&self) -> &Array1<F> {
        &self.offsets
    }

    pub fn scales(&self) -> &Array1<F> {
        &self.scales
    }

    pub fn method(&self) -> &ScalingMethod<F> {
        &self.method
    }
}

impl<F: Float> Transformer<Array2<F>, Array2<F>> for FittedLinearScaler<F> {
    fn transform(&self, x: Array2<F>) -> Array2<F> {
        if x.is_empty() {
            return x;
        }
        let mut x = x;
        Zip::from(x.columns_mut())
            .and(self.offsets())
            .and(self.scales())
            .for_each(|mut col, &offset, &scale| {
                col.mapv_inplace(|el| (el - offset) * scale);
            });
        match &self.method {
            ScalingMethod::MinMax(min, max) => x * (*max - *min) + *min,
            _ => x,
        }
    }
}

impl<F: Float, D: Data<Elem = F>, T>
    Transformer<DatasetBase<ArrayBase<D, Ix2>, T>, DatasetBase<Array2<F>, T>>
    for FittedLinearScaler<F>
{
    fn transform(&self, x: DatasetBase<ArrayBase<D, Ix2>, T>) -> DatasetBase<Array2<F>, T> {
        let feature_names = x.feature_names();
        let transformed_records = self.transform(x.records.to_owned());
        x.with_records(transformed_records)
            .with_feature_names(feature_names)
    }
}
