//! Common metrics for clustering
use crate::dataset::{DatasetBase, Label, Labels};
use crate::error::{Error, Result};
use crate::Float;
use ndarray::{ArrayBase, ArrayView1, Data, Ix1, Ix2};
use std::collections::HashMap;
use std::ops::Sub;

/// Evaluates the quality of a clustering using euclidean distance.
pub trait SilhouetteScore<F> {
    /// Evaluates the quality of a clustering.
    ///
    /// Given a clustered dataset,
    /// the silhouette score for each sample is computed as
    /// the relative difference between the average distance
    /// of the sample to other samples in the same cluster and
    /// the minimum average distance of the sample to samples in
    /// another cluster. This value goes from -1 to +1 when the point
    /// is respectively closer (in average) to points in another cluster and to points in its own cluster.
    ///
    /// Finally, the silhouette score for the clustering is evaluated as the mean
    /// silhouette score of each sample.
    fn silhouette_score(&self) -> Result<F>;
}

struct DistanceCount<F> {
    total_distance: F,
    count: usize,
}

impl<F: Float> DistanceCount<F> {
    /// Sets the total distance from the sample to this cluster to zero
    pub fn reset(&mut self) {
        self.total_distance = F::zero();
    }

    pub fn new(count: usize) -> DistanceCount<F> {
        DistanceCount {
            total_distance: F::zero(),
            count,
        }
    }

    /// Divides the total distance from the sample to this cluster by the number of samples in the cluster
    pub fn mean_distance(&self) -> F {
        self.total_distance / F::cast(self.count)
    }

    /// To be used in the cluster in which the sample is located. The distance from the sample to itself
    /// is zero so it does not get added to the total distance. We can then just divide the total
    /// distance by 1 - #samples in this cluster
    pub fn same_label_mean_distance(&self) -> F {
        if self.count == 1 {
            return F::zero();
        }
        self.total_distance / F::cast(self.count - 1)
    }

    /// adds the distance of `other_sample` from `eval_sample` to the total distance of `eval_sample` from the current cluster
    pub fn add_point(&mut self, eval_sample: ArrayView1<F>, other_sample: ArrayView1<F>) {
        self.total_distance += eval_sample.sub(&other_sample).mapv(|x| x * x).sum().sqrt();
    }
}

impl<F: Float, L: Label, D: Data<Elem = F>, T: Data<Elem = L>> SilhouetteScore<F>
    for DatasetBase<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>>
{
    fn silhouette_score(&self) -> Result<F> {
        let records = self.records();
        let targets = self.targets();
        if records.nrows() != targets.len() {
            return Err(Error::MismatchedShapes(records.nrows(), targets.len()));
        }
        if records.nrows() == 0 {
            return Err(Error::NotEnoughSamples);
        }

        let mut labels: HashMap<L, DistanceCount<F>> = targets
            .label_count()
            .into_iter()
            .map(|(label, count)| (label, DistanceCount::new(count)))
            .collect();

        // Single label dataset, all points are in the same cluster.
        if labels.len() == 1 {
            return Ok(F::one());
        }

        // Compute and sum silhouette score for each sample
        let score = records
            .rows()
            .into_iter()
            .zip(targets.iter())
            .map(|(sample, sample_label)| {
                // Loops through all samples in the dataset and adds
                // the distance between them and `sample` to the cluster
                // in which they belong
                for (other, other_label) in records.rows().into_iter().zip(targets.iter()) {
                    if let Some(counter) = labels.get_mut(other_label) {
                        counter.add_point(sample, other);
                    }
                }

                // average distance from `sample` to points in its cluster
                let mut a_x = F::zero();
                // minimum average distance from `sample` to another cluster
                let mut b_x: Option<F> = None;

                for (label, counter) in &mut labels {
                    if sample_label == label {
                        // The cluster of `sample` averages by excluding `sample` from the counting
                        a_x = counter.same_label_mean_distance();
                    } else {
                        let mean = counter.mean_distance();
                        b_x = Some(match b_x {
                            Some(v) if v <= mean => v,
                            _ => mean,
                        });
                    }
                    counter.reset()
                }
                // There are at least two clusters so `b_x` is always set here
                let b_x = b_x.unwrap_or_else(F::zero);

                // s(x) = (b(x) - a(x)) / max{a(x), b(x)}
                let max = if a_x >= b_x { a_x } else { b_x };
                if max == F::zero() {
                    F::zero()
                } else {
                    (b_x - a_x) / max
                }
            })
            .sum::<F>();
        let score = score / F::cast(records.nrows());
        Ok(score)
    }
}

fn comb2(n: usize) -> f64 {
    let n = n as f64;
    n * (n - 1.0) / 2.0
}

/// Adjusted Rand index between two labelings of the same samples
///
/// Counts the pairs of samples both labelings put together or apart and corrects the count for
/// chance. Identical partitions score `1.0` regardless of the label values, independent random
/// labelings score close to `0.0`. Noise labels (`None`) are handled like any other label value.
///
/// Returns `MismatchedShapes` if the labelings differ in length.
pub fn adjusted_rand_index<A: Label, B: Label>(truth: &[A], predicted: &[B]) -> Result<f64> {
    if truth.len() != predicted.len() {
        return Err(Error::MismatchedShapes(truth.len(), predicted.len()));
    }
    let n_samples = truth.len();
    if n_samples < 2 {
        return Ok(1.0);
    }

    let mut contingency: HashMap<(&A, &B), usize> = HashMap::new();
    let mut row_sums: HashMap<&A, usize> = HashMap::new();
    let mut col_sums: HashMap<&B, usize> = HashMap::new();
    for (a, b) in truth.iter().zip(predicted.iter()) {
        *contingency.entry((a, b)).or_insert(0) += 1;
        *row_sums.entry(a).or_insert(0) += 1;
        *col_sums.entry(b).or_insert(0) += 1;
    }

    let sum_comb: f64 = contingency.values().map(|&n| comb2(n)).sum();
    let sum_rows: f64 = row_sums.values().map(|&n| comb2(n)).sum();
    let sum_cols: f64 = col_sums.values().map(|&n| comb2(n)).sum();

    let expected = sum_rows * sum_cols / comb2(n_samples);
    let max_index = (sum_rows + sum_cols) / 2.0;
    let denominator = max_index - expected;
    if denominator == 0.0 {
        return Ok(1.0);
    }

    Ok((sum_comb - expected) / denominator)
}

#[cfg(test)]
mod tests {
    use super::{adjusted_rand_index, SilhouetteScore};
    use crate::Dataset;
    use approx::assert_abs_diff_eq;
    use ndarray::{concatenate, Array, Array1, Axis};

    #[test]
    fn test_silhouette_score() {
        // Two very far apart clusters, each with its own label.
        // This is a very good clustering for silhouette and should return a score very close to +1
        let records = concatenate![
            Axis(0),
            Array::linspace(0f64, 1f64, 10),
            Array::linspace(10000f64, 10001f64, 10)
        ]
        .insert_axis(Axis(1));
        let records = concatenate![Axis(1), records, records];
        let targets = concatenate![
            Axis(0),
            Array1::from_elem(10, 0usize),
            Array1::from_elem(10, 1)
        ];
        let dataset = Dataset::new(records, targets);
        let score = dataset.silhouette_score().unwrap();
        assert_abs_diff_eq!(score, 1f64, epsilon = 1e-3);

        // Two clusters separated into halves very far from each other and each very near an half of the other cluster.
        // Bad but not terrible for silhouette, should return a score slightly negative
        let records = concatenate![
            Axis(0),
            Array::linspace(0f64, 1f64, 5),
            Array::linspace(1f64, 2f64, 5),
            Array::linspace(10000f64, 10001f64, 5),
            Array::linspace(10001f64, 10002f64, 5)
        ]
        .insert_axis(Axis(1));
        let records = concatenate![Axis(1), records, records];
        let targets = concatenate![
            Axis(0),
            Array1::from_elem(5, 0usize),
            Array1::from_elem(5, 1),
            Array1::from_elem(5, 0),
            Array1::from_elem(5, 1)
        ];
        let dataset = Dataset::new(records, targets);
        let score = dataset.silhouette_score().unwrap();
        assert!(score < 0f64);

        // Very bad clustering with a high number of clusters, I expect a very negative value
        let records = Array::linspace(0f64, 10f64, 100).insert_axis(Axis(1));
        let records = concatenate![Axis(1), records, records];
        let targets = Array1::from_shape_fn(100, |i| (i + 3) % 48);
        let dataset = Dataset::new(records, targets);
        let score = dataset.silhouette_score().unwrap();
        assert!(score < -0.5f64)
    }

    #[test]
    fn test_single_label_scores_one() {
        let records = Array::linspace(0f64, 1f64, 10).insert_axis(Axis(1));
        let dataset = Dataset::new(records, Array1::from_elem(10, Some(0usize)));
        let score = dataset.silhouette_score().unwrap();
        assert_abs_diff_eq!(score, 1f64, epsilon = 1e-5);
    }

    #[test]
    fn ari_ignores_label_permutation() {
        let truth = [0usize, 0, 1, 1, 2, 2];
        let predicted = [Some(5usize), Some(5), None, None, Some(1), Some(1)];
        let ari = adjusted_rand_index(&truth, &predicted).unwrap();
        assert_abs_diff_eq!(ari, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn ari_of_split_clusters_is_below_one() {
        let truth = [0usize, 0, 0, 1, 1, 1];
        let predicted = [0usize, 0, 1, 1, 2, 2];
        let ari = adjusted_rand_index(&truth, &predicted).unwrap();
        assert!(ari < 1.0);
        assert!(ari > -1.0);
    }

    #[test]
    fn ari_single_cluster_against_itself() {
        let truth = [0usize; 5];
        let ari = adjusted_rand_index(&truth, &truth).unwrap();
        assert_abs_diff_eq!(ari, 1.0);
    }

    #[test]
    fn ari_rejects_length_mismatch() {
        assert!(adjusted_rand_index(&[0usize, 1], &[0usize]).is_err());
    }
}
