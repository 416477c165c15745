use super::AffinityPropagationParamsError;
use clusterlab::{Float, ParamGuard};
use rand::Rng;

#[derive(Clone, Debug, PartialEq)]
/// The set of hyperparameters that can be specified for the execution of
/// the [Affinity Propagation algorithm](crate::AffinityPropagation).
pub struct AffinityPropagationValidParams<F: Float, R: Rng> {
    /// Weight of the previous message in every update
    damping: F,
    /// Self similarity of every sample, `None` uses the median similarity
    preference: Option<F>,
    max_n_iterations: usize,
    /// Number of iterations the exemplars must stay unchanged to declare convergence
    convergence_iter: usize,
    /// Breaks ties between equal similarities
    rng: R,
}

#[derive(Clone, Debug, PartialEq)]
/// An helper struct used to construct a set of [valid hyperparameters](AffinityPropagationValidParams)
/// for the [Affinity Propagation algorithm](crate::AffinityPropagation) (using the builder pattern).
pub struct AffinityPropagationParams<F: Float, R: Rng>(AffinityPropagationValidParams<F, R>);

impl<F: Float, R: Rng> AffinityPropagationParams<F, R> {
    /// Defaults are provided if optional parameters are not specified:
    /// * `damping = 0.5`
    /// * `preference = None` (median of the similarities)
    /// * `max_n_iterations = 200`
    /// * `convergence_iter = 15`
    pub fn new(rng: R) -> Self {
        Self(AffinityPropagationValidParams {
            damping: F::cast(0.5),
            preference: None,
            max_n_iterations: 200,
            convergence_iter: 15,
            rng,
        })
    }

    /// Change the value of `damping`
    pub fn damping(mut self, damping: F) -> Self {
        self.0.damping = damping;
        self
    }

    /// Set the preference of every sample. Lower values give fewer clusters.
    pub fn preference(mut self, preference: F) -> Self {
        self.0.preference = Some(preference);
        self
    }

    /// Change the value of `max_n_iterations`
    pub fn max_n_iterations(mut self, max_n_iterations: usize) -> Self {
        self.0.max_n_iterations = max_n_iterations;
        self
    }

    /// Change the value of `convergence_iter`
    pub fn convergence_iter(mut self, convergence_iter: usize) -> Self {
        self.0.convergence_iter = convergence_iter;
        self
    }
}

impl<F: Float, R: Rng> ParamGuard for AffinityPropagationParams<F, R> {
    type Checked = AffinityPropagationValidParams<F, R>;
    type Error = AffinityPropagationParamsError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        let damping = self.0.damping;
        if !(damping >= F::cast(0.5) && damping < F::one()) {
            Err(AffinityPropagationParamsError::Damping(damping.to_f64().unwrap_or(f64::NAN)))
        } else if self.0.max_n_iterations == 0 {
            Err(AffinityPropagationParamsError::MaxIterations)
        } else if self.0.convergence_iter == 0 {
            Err(AffinityPropagationParamsError::ConvergenceIter)
        } else if self.0.preference.map_or(false, |p| !p.is_finite()) {
            Err(AffinityPropagationParamsError::Preference)
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float, R: Rng> AffinityPropagationValidParams<F, R> {
    pub fn damping(&self) -> F {
        self.damping
    }

    pub fn preference(&self) -> Option<F> {
        self.preference
    }

    pub fn max_n_iterations(&self) -> usize {
        self.max_n_iterations
    }

    pub fn convergence_iter(&self) -> usize {
        self.convergence_iter
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }
}
