use crate::affinity_propagation::{
    AffinityPropagationError, AffinityPropagationParams, AffinityPropagationValidParams,
};
use crate::distance::{Distance, L2Dist};
use clusterlab::traits::{Fit, Predict};
use clusterlab::{DatasetBase, Float};
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix2, Zip};
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};
use std::collections::VecDeque;

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// Affinity Propagation clusters samples by exchanging messages between pairs of samples until
/// a set of *exemplars*, samples representative of the others, emerges. The number of clusters
/// is not chosen up front but follows from the *preference* of each sample to be an exemplar.
///
/// ## The algorithm
///
/// The similarity of two samples is their negative squared euclidean distance, the similarity
/// of a sample with itself is the preference. Two kinds of messages are then updated in turn:
/// - the responsibility `r(i, k)`: how well suited `k` is to be the exemplar of `i`, compared
///   to the other candidates of `i`;
/// - the availability `a(i, k)`: how appropriate it is for `i` to pick `k`, given the support
///   `k` receives from the other samples.
///
/// Both are damped with the value of the previous iteration. A sample is an exemplar when its
/// self responsibility plus self availability is positive, and the algorithm has converged when
/// the set of exemplars has not changed for `convergence_iter` iterations. Every sample then
/// joins its most similar exemplar, and each cluster elects the member most similar to the
/// other members as its final exemplar.
///
/// When no exemplar emerges the model is degenerate: every sample is labelled `None`.
///
/// ## Tutorial
///
/// ```
/// use clusterlab::DatasetBase;
/// use clusterlab::traits::{Fit, Predict};
/// use clusterlab_clustering::AffinityPropagation;
/// use ndarray::array;
///
/// let records = array![[1., 2.], [1., 4.], [1., 0.], [4., 2.], [4., 4.], [4., 0.]];
/// let model = AffinityPropagation::params()
///     .fit(&DatasetBase::from(records))
///     .unwrap();
///
/// assert_eq!(model.exemplar_indices(), &[0, 3]);
/// assert_eq!(model.predict(&array![[0., 0.], [4., 4.]]), array![Some(0), Some(1)]);
/// ```
pub struct AffinityPropagation<F> {
    exemplar_indices: Vec<usize>,
    exemplars: Array2<F>,
    labels: Array1<Option<usize>>,
    n_iter: usize,
    converged: bool,
}

impl<F: Float> AffinityPropagation<F> {
    pub fn params() -> AffinityPropagationParams<F, Xoshiro256Plus> {
        AffinityPropagationParams::new(Xoshiro256Plus::seed_from_u64(42))
    }

    pub fn params_with_rng<R: Rng>(rng: R) -> AffinityPropagationParams<F, R> {
        AffinityPropagationParams::new(rng)
    }

    /// Indices of the exemplars in the training records, in increasing order
    pub fn exemplar_indices(&self) -> &[usize] {
        &self.exemplar_indices
    }

    /// The exemplars, one row per cluster
    pub fn exemplars(&self) -> &Array2<F> {
        &self.exemplars
    }

    /// Cluster of every training sample
    pub fn labels(&self) -> &Array1<Option<usize>> {
        &self.labels
    }

    /// Number of message passing iterations run
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    fn from_exemplars<D: Data<Elem = F>>(
        records: &ArrayBase<D, Ix2>,
        labels: Array1<Option<usize>>,
        exemplar_indices: Vec<usize>,
        n_iter: usize,
        converged: bool,
    ) -> Self {
        AffinityPropagation {
            exemplars: records.select(Axis(0), &exemplar_indices),
            exemplar_indices,
            labels,
            n_iter,
            converged,
        }
    }
}

impl<F: Float, R: Rng + Clone, DA: Data<Elem = F>, T>
    Fit<ArrayBase<DA, Ix2>, T, AffinityPropagationError> for AffinityPropagationValidParams<F, R>
{
    type Object = AffinityPropagation<F>;

    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<DA, Ix2>, T>,
    ) -> Result<Self::Object, AffinityPropagationError> {
        let records = dataset.records();
        let n = records.nrows();
        if n == 0 {
            return Err(AffinityPropagationError::NotEnoughSamples);
        }

        let mut s = Array2::zeros((n, n));
        for i in 0..n {
            for j in (i + 1)..n {
                let sim = -L2Dist.rdistance(records.row(i), records.row(j));
                s[(i, j)] = sim;
                s[(j, i)] = sim;
            }
        }
        let preference = self.preference().unwrap_or_else(|| median(&s));

        if let Some(exemplars) = equal_similarities(&s, preference) {
            log::warn!(
                "All samples have mutually equal similarities. Returning arbitrary cluster center(s)."
            );
            let labels = if exemplars.len() == 1 {
                Array1::from_elem(n, Some(0))
            } else {
                (0..n).map(Some).collect()
            };
            return Ok(AffinityPropagation::from_exemplars(records, labels, exemplars, 0, true));
        }

        s.diag_mut().fill(preference);
        // Small noise removes degenerate ties between equally good exemplars
        let mut rng = self.rng().clone();
        let noise: Array2<f64> = Array2::random_using((n, n), StandardNormal, &mut rng);
        let tiny = F::min_positive_value() * F::cast(100.);
        Zip::from(&mut s).and(&noise).for_each(|s, &z| {
            *s += (F::epsilon() * *s + tiny) * F::cast(z);
        });

        let (exemplars, n_iter, converged) = self.propagate(&s);
        if exemplars.is_empty() {
            log::warn!(
                "Affinity propagation did not converge and this model will not have any cluster centers."
            );
            return Ok(AffinityPropagation::from_exemplars(
                records,
                Array1::from_elem(n, None),
                vec![],
                n_iter,
                converged,
            ));
        }
        if !converged {
            log::warn!(
                "Affinity propagation did not converge, this model may return degenerate cluster centers and labels."
            );
        }

        let (labels, exemplar_indices) = refine_exemplars(&s, exemplars);
        log::debug!(
            "Affinity propagation found {} exemplars in {} iterations",
            exemplar_indices.len(),
            n_iter
        );
        Ok(AffinityPropagation::from_exemplars(
            records,
            labels.mapv(Some),
            exemplar_indices,
            n_iter,
            converged,
        ))
    }
}

impl<F: Float, R: Rng> AffinityPropagationValidParams<F, R> {
    /// Runs the message passing on the similarity matrix `s`, preferences on its diagonal
    ///
    /// Returns the exemplars of the last iteration, the number of iterations and whether the
    /// exemplars were stable.
    fn propagate(&self, s: &Array2<F>) -> (Vec<usize>, usize, bool) {
        let n = s.nrows();
        let damping = self.damping();
        let keep = F::one() - damping;
        let mut r = Array2::<F>::zeros((n, n));
        let mut a = Array2::<F>::zeros((n, n));
        let mut tmp = Array2::<F>::zeros((n, n));
        let mut history: VecDeque<Array1<bool>> = VecDeque::with_capacity(self.convergence_iter());
        let mut is_exemplar = Array1::from_elem(n, false);

        for it in 0..self.max_n_iterations() {
            // Responsibilities
            Zip::from(&mut tmp)
                .and(&a)
                .and(s)
                .for_each(|t, &av, &sv| *t = av + sv);
            for (mut row, s_row) in tmp.rows_mut().into_iter().zip(s.rows()) {
                let best = argmax(row.iter().copied());
                let first = row[best];
                row[best] = F::neg_infinity();
                let second = row.iter().copied().fold(F::neg_infinity(), F::max);
                Zip::from(&mut row)
                    .and(&s_row)
                    .for_each(|t, &sv| *t = sv - first);
                row[best] = s_row[best] - second;
            }
            r.mapv_inplace(|x| x * damping);
            r.scaled_add(keep, &tmp);

            // Availabilities, `tmp` holds their negation
            Zip::from(&mut tmp)
                .and(&r)
                .for_each(|t, &rv| *t = rv.max(F::zero()));
            tmp.diag_mut().assign(&r.diag());
            let column_sums = tmp.sum_axis(Axis(0));
            tmp -= &column_sums;
            let self_availability = tmp.diag().to_owned();
            tmp.mapv_inplace(|x| x.max(F::zero()));
            tmp.diag_mut().assign(&self_availability);
            a.mapv_inplace(|x| x * damping);
            a.scaled_add(-keep, &tmp);

            Zip::from(&mut is_exemplar)
                .and(&a.diag())
                .and(&r.diag())
                .for_each(|e, &av, &rv| *e = av + rv > F::zero());
            if history.len() == self.convergence_iter() {
                history.pop_front();
            }
            history.push_back(is_exemplar.clone());

            if it >= self.convergence_iter() {
                let stable = (0..n).all(|i| {
                    let count = history.iter().filter(|e| e[i]).count();
                    count == 0 || count == history.len()
                });
                if stable && is_exemplar.iter().any(|&e| e) {
                    return (exemplars_of(&is_exemplar), it + 1, true);
                }
            }
        }
        (exemplars_of(&is_exemplar), self.max_n_iterations(), false)
    }
}

fn exemplars_of(is_exemplar: &Array1<bool>) -> Vec<usize> {
    is_exemplar
        .iter()
        .enumerate()
        .filter(|(_, &e)| e)
        .map(|(i, _)| i)
        .collect()
}

/// Assigns every sample to its most similar exemplar and moves each exemplar to the member most
/// similar to the rest of its cluster
///
/// Returns the labels, numbered by exemplar index, and the sorted exemplars.
fn refine_exemplars<F: Float>(
    s: &Array2<F>,
    mut exemplars: Vec<usize>,
) -> (Array1<usize>, Vec<usize>) {
    let assign = |exemplars: &[usize]| -> Vec<usize> {
        let mut c: Vec<usize> = s
            .rows()
            .into_iter()
            .map(|row| argmax(exemplars.iter().map(|&e| row[e])))
            .collect();
        for (k, &e) in exemplars.iter().enumerate() {
            c[e] = k;
        }
        c
    };

    let c = assign(&exemplars);
    for (k, exemplar) in exemplars.iter_mut().enumerate() {
        let members: Vec<usize> = (0..c.len()).filter(|&i| c[i] == k).collect();
        let best = argmax(
            members
                .iter()
                .map(|&j| members.iter().map(|&i| s[(i, j)]).sum::<F>()),
        );
        *exemplar = members[best];
    }

    let c = assign(&exemplars);
    let chosen: Vec<usize> = c.iter().map(|&k| exemplars[k]).collect();
    let mut centers = chosen.clone();
    centers.sort_unstable();
    centers.dedup();
    let labels = chosen
        .iter()
        .map(|e| centers.binary_search(e).unwrap_or(0))
        .collect();
    (labels, centers)
}

/// Position of the first maximum
fn argmax<F: Float>(values: impl Iterator<Item = F>) -> usize {
    let mut best = 0;
    let mut best_value = F::neg_infinity();
    for (i, v) in values.enumerate() {
        if v > best_value {
            best = i;
            best_value = v;
        }
    }
    best
}

fn median<F: Float>(s: &Array2<F>) -> F {
    let mut values = s.iter().copied().collect::<Vec<_>>();
    values.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / F::cast(2.)
    } else {
        values[mid]
    }
}

/// With all similarities equal the messages carry no information: every sample is its own
/// exemplar when the preference exceeds the similarity, otherwise the first sample is the only
/// one
fn equal_similarities<F: Float>(s: &Array2<F>, preference: F) -> Option<Vec<usize>> {
    let n = s.nrows();
    if n == 1 {
        return Some(vec![0]);
    }
    let first = s[(0, 1)];
    let all_equal = s.indexed_iter().all(|((i, j), &v)| i == j || v == first);
    if !all_equal {
        None
    } else if preference > first {
        Some((0..n).collect())
    } else {
        Some(vec![0])
    }
}

impl<F: Float, DA: Data<Elem = F>> Predict<&ArrayBase<DA, Ix2>, Array1<Option<usize>>>
    for AffinityPropagation<F>
{
    /// Label of the closest exemplar for every observation, `None` for a model without
    /// exemplars
    fn predict(&self, observations: &ArrayBase<DA, Ix2>) -> Array1<Option<usize>> {
        if self.exemplar_indices.is_empty() {
            log::warn!(
                "This model does not have any cluster centers because affinity propagation did not converge. Labeling every sample as None."
            );
            return Array1::from_elem(observations.nrows(), None);
        }
        observations
            .rows()
            .into_iter()
            .map(|row| {
                let closest = argmax(
                    self.exemplars
                        .rows()
                        .into_iter()
                        .map(|e| -L2Dist.rdistance(row.view(), e)),
                );
                Some(closest)
            })
            .collect()
    }
}

impl<F: Float, DA: Data<Elem = F>, T>
    Predict<
        DatasetBase<ArrayBase<DA, Ix2>, T>,
        DatasetBase<ArrayBase<DA, Ix2>, Array1<Option<usize>>>,
    > for AffinityPropagation<F>
{
    fn predict(
        &self,
        dataset: DatasetBase<ArrayBase<DA, Ix2>, T>,
    ) -> DatasetBase<ArrayBase<DA, Ix2>, Array1<Option<usize>>> {
        let labels = self.predict(dataset.records());
        dataset.with_targets(labels)
    }
}
