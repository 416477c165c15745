use super::MeanShiftParamsError;
use clusterlab::{Float, ParamGuard};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// The set of hyperparameters that can be specified for the execution of
/// the [Mean Shift algorithm](crate::MeanShift).
pub struct MeanShiftValidParams<F> {
    /// Radius of the flat kernel
    bandwidth: F,
    /// Seed from a grid of cells of size `bandwidth` instead of every sample
    bin_seeding: bool,
    /// Minimum number of samples in a grid cell for it to be a seed
    min_bin_freq: usize,
    /// Label samples farther than `bandwidth` from every centre too
    cluster_all: bool,
    max_n_iterations: usize,
}

#[derive(Clone, Debug, PartialEq)]
/// An helper struct used to construct a set of [valid hyperparameters](MeanShiftValidParams) for
/// the [Mean Shift algorithm](crate::MeanShift) (using the builder pattern).
pub struct MeanShiftParams<F>(MeanShiftValidParams<F>);

impl<F: Float> MeanShiftParams<F> {
    /// Defaults are provided if optional parameters are not specified:
    /// * `bin_seeding = false`
    /// * `min_bin_freq = 1`
    /// * `cluster_all = true`
    /// * `max_n_iterations = 300`
    pub fn new(bandwidth: F) -> Self {
        Self(MeanShiftValidParams {
            bandwidth,
            bin_seeding: false,
            min_bin_freq: 1,
            cluster_all: true,
            max_n_iterations: 300,
        })
    }

    pub fn bin_seeding(mut self, bin_seeding: bool) -> Self {
        self.0.bin_seeding = bin_seeding;
        self
    }

    pub fn min_bin_freq(mut self, min_bin_freq: usize) -> Self {
        self.0.min_bin_freq = min_bin_freq;
        self
    }

    pub fn cluster_all(mut self, cluster_all: bool) -> Self {
        self.0.cluster_all = cluster_all;
        self
    }

    pub fn max_n_iterations(mut self, max_n_iterations: usize) -> Self {
        self.0.max_n_iterations = max_n_iterations;
        self
    }
}

impl<F: Float> ParamGuard for MeanShiftParams<F> {
    type Checked = MeanShiftValidParams<F>;
    type Error = MeanShiftParamsError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if !(self.0.bandwidth > F::zero()) || !self.0.bandwidth.is_finite() {
            Err(MeanShiftParamsError::Bandwidth)
        } else if self.0.min_bin_freq == 0 {
            Err(MeanShiftParamsError::MinBinFreq)
        } else if self.0.max_n_iterations == 0 {
            Err(MeanShiftParamsError::MaxIterations)
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float> MeanShiftValidParams<F> {
    pub fn bandwidth(&self) -> F {
        self.bandwidth
    }

    pub fn bin_seeding(&self) -> bool {
        self.bin_seeding
    }

    pub fn min_bin_freq(&self) -> usize {
        self.min_bin_freq
    }

    pub fn cluster_all(&self) -> bool {
        self.cluster_all
    }

    pub fn max_n_iterations(&self) -> usize {
        self.max_n_iterations
    }
}

#[cfg(test)]
mod tests {
    use crate::{MeanShift, MeanShiftParamsError};
    use clusterlab::ParamGuard;

    #[test]
    fn bandwidth_must_be_positive() {
        let res = MeanShift::params(0.).check();
        assert!(matches!(res, Err(MeanShiftParamsError::Bandwidth)));
        let res = MeanShift::params(f64::NAN).check();
        assert!(matches!(res, Err(MeanShiftParamsError::Bandwidth)));
    }

    #[test]
    fn counts_cannot_be_zero() {
        let res = MeanShift::params(1.).min_bin_freq(0).check();
        assert!(matches!(res, Err(MeanShiftParamsError::MinBinFreq)));
        let res = MeanShift::params(1.).max_n_iterations(0).check();
        assert!(matches!(res, Err(MeanShiftParamsError::MaxIterations)));
    }
}
