use crate::optics::errors::{OpticsError, Result};
use clusterlab::Float;
use ndarray::Array1;
use noisy_float::{checkers::NumChecker, NoisyFloat};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::Index;
use std::slice::SliceIndex;

/// This struct represents a data point in the dataset with it's associated distances obtained from
/// the OPTICS analysis
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<F> {
    /// Index of the observation in the dataset
    pub(crate) index: usize,
    /// The core distance
    pub(crate) core_distance: Option<F>,
    /// The reachability distance
    pub(crate) reachability_distance: Option<F>,
    /// The sample whose expansion set the reachability distance
    pub(crate) predecessor: Option<usize>,
}

impl<F: Float> Sample<F> {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            core_distance: None,
            reachability_distance: None,
            predecessor: None,
        }
    }

    /// Index of the sample in the dataset.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The reachability distance of a sample is the distance between the point and it's cluster
    /// core or another point whichever is larger. `None` stands for an undefined (infinite)
    /// distance.
    pub fn reachability_distance(&self) -> &Option<F> {
        &self.reachability_distance
    }

    /// The distance to the nth closest point where n is the minimum points to form a cluster.
    pub fn core_distance(&self) -> &Option<F> {
        &self.core_distance
    }

    /// Index of the sample this one was reached from
    pub fn predecessor(&self) -> Option<usize> {
        self.predecessor
    }

    /// Undefined reachability sorts after every defined one, ties go to the lowest index
    pub(crate) fn reachability_order(&self, other: &Self) -> Ordering {
        let key = |s: &Self| {
            (
                s.reachability_distance.is_none(),
                s.reachability_distance
                    .map(NoisyFloat::<_, NumChecker>::new),
                s.index,
            )
        };
        key(self).cmp(&key(other))
    }
}

/// Minimum size of a cluster extracted from the reachability plot
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClusterSize {
    /// Absolute number of samples, at least 2
    Count(usize),
    /// Fraction of the number of samples in `(0, 1]`, rounded down and raised to at least 2
    Fraction(f64),
}

impl ClusterSize {
    /// Resolves the size against the number of samples analysed
    pub fn resolve(&self, n_samples: usize) -> Result<usize> {
        match *self {
            ClusterSize::Count(count) if count < 2 || count > n_samples => {
                let msg = format!("{} for {} samples", count, n_samples);
                Err(OpticsError::ClusterSize(msg))
            }
            ClusterSize::Count(count) => Ok(count),
            ClusterSize::Fraction(fraction) if !(fraction > 0. && fraction <= 1.) => {
                let msg = format!("fraction {} outside (0, 1]", fraction);
                Err(OpticsError::ClusterSize(msg))
            }
            ClusterSize::Fraction(fraction) => {
                Ok(usize::max(2, (fraction * n_samples as f64) as usize))
            }
        }
    }
}

/// The analysis from running OPTICS on a dataset, this allows you iterate over the data points and
/// access their core and reachability distances. The ordering of the points also doesn't match
/// that of the dataset instead ordering based on the clustering structure worked out during
/// analysis.
///
/// Flat clusterings are extracted from the analysis with [`extract_xi`](Self::extract_xi) or
/// [`extract_dbscan`](Self::extract_dbscan).
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct OpticsAnalysis<F> {
    /// A list of the samples in the dataset sorted and with their reachability and core distances
    /// computed.
    pub(crate) orderings: Vec<Sample<F>>,
    /// `min_points` the analysis was run with
    pub(crate) min_points: usize,
}

/// A steep down area of the reachability plot and the maximum reachability seen since its end
#[derive(Debug, Clone, Copy)]
struct SteepDownArea<F> {
    start: usize,
    end: usize,
    mib: F,
}

impl<F> OpticsAnalysis<F> {
    /// Extracts a slice containing all samples in the dataset
    pub fn as_slice(&self) -> &[Sample<F>] {
        self.orderings.as_slice()
    }

    /// Returns an iterator over the samples in the dataset
    pub fn iter(&self) -> std::slice::Iter<'_, Sample<F>> {
        self.orderings.iter()
    }

    /// Number of samples analysed
    pub fn len(&self) -> usize {
        self.orderings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orderings.is_empty()
    }
}

impl<F: Float> OpticsAnalysis<F> {
    /// Reachability of the samples in analysis order, undefined values are infinite
    pub fn reachability_plot(&self) -> Array1<F> {
        self.orderings
            .iter()
            .map(|s| s.reachability_distance.unwrap_or_else(F::infinity))
            .collect()
    }

    /// Labels every sample like DBSCAN with the neighbourhood radius `eps` would do, provided
    /// `eps` does not exceed the tolerance of the analysis. Border points may be assigned
    /// differently as they are attached to the first cluster that reaches them.
    pub fn extract_dbscan(&self, eps: F) -> Array1<Option<usize>> {
        let mut labels = Array1::from_elem(self.orderings.len(), None);
        let mut current: Option<usize> = None;
        for sample in &self.orderings {
            let far_reach = sample.reachability_distance.map_or(true, |r| r > eps);
            let near_core = sample.core_distance.map_or(false, |c| c <= eps);
            if far_reach && near_core {
                current = Some(current.map_or(0, |c| c + 1));
            }
            labels[sample.index] = if far_reach && !near_core {
                None
            } else {
                current
            };
        }
        labels
    }

    /// Labels the samples with the Xi method: clusters are delimited by steep down and steep up
    /// areas of the reachability plot, where `xi` is the minimum relative steepness.
    ///
    /// Clusters are nested, the labels come from the innermost clusters which are not
    /// overlapping an earlier one, samples outside of any cluster are noise (`None`).
    ///
    /// With `predecessor_correction` the end of a cluster is moved back until its predecessor lies
    /// within the cluster.
    pub fn extract_xi(
        &self,
        xi: f64,
        min_cluster_size: ClusterSize,
        predecessor_correction: bool,
    ) -> Result<Array1<Option<usize>>> {
        let clusters = self.xi_clusters(xi, min_cluster_size, predecessor_correction)?;
        let mut ordered = vec![None; self.orderings.len()];
        let mut label = 0;
        for (start, end) in clusters {
            if ordered[start..=end].iter().all(|l| l.is_none()) {
                for l in &mut ordered[start..=end] {
                    *l = Some(label);
                }
                label += 1;
            }
        }
        let mut labels = Array1::from_elem(self.orderings.len(), None);
        for (sample, label) in self.orderings.iter().zip(ordered) {
            labels[sample.index] = label;
        }
        log::debug!("OPTICS xi extraction found {} clusters", label);
        Ok(labels)
    }

    /// The clusters found by the Xi method as inclusive `(start, end)` positions in the
    /// analysis order, smaller clusters before the ones containing them.
    pub fn xi_clusters(
        &self,
        xi: f64,
        min_cluster_size: ClusterSize,
        predecessor_correction: bool,
    ) -> Result<Vec<(usize, usize)>> {
        if !(xi > 0. && xi < 1.) {
            return Err(OpticsError::Xi(xi));
        }
        let n_samples = self.orderings.len();
        if n_samples == 0 {
            return Ok(vec![]);
        }
        let min_cluster_size = min_cluster_size.resolve(n_samples)?;

        // An infinite value closes the plot so that a cluster running to the end is found
        let mut plot = self.reachability_plot().to_vec();
        plot.push(F::infinity());
        let predecessors: Vec<_> = self.orderings.iter().map(|s| s.predecessor).collect();
        let ordering: Vec<_> = self.orderings.iter().map(|s| s.index).collect();

        let xi_complement = F::cast(1. - xi);
        let mut steep_up = vec![false; n_samples];
        let mut steep_down = vec![false; n_samples];
        let mut up = vec![false; n_samples];
        let mut down = vec![false; n_samples];
        for i in 0..n_samples {
            // inf / inf and 0 / 0 are NaN and fail every comparison
            let ratio = plot[i] / plot[i + 1];
            steep_up[i] = ratio <= xi_complement;
            steep_down[i] = ratio >= F::one() / xi_complement;
            down[i] = ratio > F::one();
            up[i] = ratio < F::one();
        }

        let mut sdas: Vec<SteepDownArea<F>> = Vec::new();
        let mut clusters = Vec::new();
        let mut index = 0;
        let mut mib = F::zero();

        for steep_index in (0..n_samples).filter(|&i| steep_up[i] || steep_down[i]) {
            if steep_index < index {
                continue;
            }
            mib = plot[index..=steep_index]
                .iter()
                .fold(mib, |acc, &r| acc.max(r));
            filter_steep_down_areas(&mut sdas, mib, xi_complement, &plot);

            if steep_down[steep_index] {
                let end = extend_region(&steep_down, &up, steep_index, self.min_points);
                sdas.push(SteepDownArea {
                    start: steep_index,
                    end,
                    mib: F::zero(),
                });
                index = end + 1;
                mib = plot[index];
            } else {
                let up_start = steep_index;
                let up_end = extend_region(&steep_up, &down, up_start, self.min_points);
                index = up_end + 1;
                mib = plot[index];

                let mut found = Vec::new();
                for sda in &sdas {
                    let mut c_start = sda.start;
                    let mut c_end = up_end;

                    if plot[c_end + 1] * xi_complement < sda.mib {
                        continue;
                    }

                    // Align the borders of the cluster on the lower of its two sides
                    let d_max = plot[sda.start];
                    if d_max * xi_complement >= plot[c_end + 1] {
                        while plot[c_start + 1] > plot[c_end + 1] && c_start < sda.end {
                            c_start += 1;
                        }
                    } else if plot[c_end + 1] * xi_complement >= d_max {
                        while plot[c_end - 1] > d_max && c_end > up_start {
                            c_end -= 1;
                        }
                    }

                    if predecessor_correction {
                        match correct_predecessor(&plot, &predecessors, &ordering, c_start, c_end) {
                            Some((s, e)) => {
                                c_start = s;
                                c_end = e;
                            }
                            None => continue,
                        }
                    }

                    if c_end + 1 - c_start < min_cluster_size
                        || c_start > sda.end
                        || c_end < up_start
                    {
                        continue;
                    }
                    found.push((c_start, c_end));
                }
                found.reverse();
                clusters.extend(found);
            }
        }
        Ok(clusters)
    }
}

/// Last position of the steep area starting at `start`. The area may contain up to `min_points`
/// consecutive points which are neither steep nor going the opposite way.
fn extend_region(steep: &[bool], opposite: &[bool], start: usize, min_points: usize) -> usize {
    let mut non_steep = 0;
    let mut end = start;
    for index in start..steep.len() {
        if steep[index] {
            non_steep = 0;
            end = index;
        } else if !opposite[index] {
            non_steep += 1;
            if non_steep > min_points {
                break;
            }
        } else {
            return end;
        }
    }
    end
}

/// Drops the steep down areas whose start lies below the current maximum and raises the maximum
/// in between of the remaining ones
fn filter_steep_down_areas<F: Float>(
    sdas: &mut Vec<SteepDownArea<F>>,
    mib: F,
    xi_complement: F,
    plot: &[F],
) {
    if mib.is_infinite() {
        sdas.clear();
        return;
    }
    sdas.retain(|sda| mib <= plot[sda.start] * xi_complement);
    for sda in sdas.iter_mut() {
        sda.mib = sda.mib.max(mib);
    }
}

fn correct_predecessor<F: Float>(
    plot: &[F],
    predecessors: &[Option<usize>],
    ordering: &[usize],
    start: usize,
    mut end: usize,
) -> Option<(usize, usize)> {
    while start < end {
        if plot[start] > plot[end] {
            return Some((start, end));
        }
        if let Some(p) = predecessors[end] {
            if ordering[start..end].contains(&p) {
                return Some((start, end));
            }
        }
        end -= 1;
    }
    None
}

impl<I, F> Index<I> for OpticsAnalysis<F>
where
    I: SliceIndex<[Sample<F>]>,
{
    type Output = I::Output;

    fn index(&self, index: I) -> &Self::Output {
        self.orderings.index(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    /// Analysis with the identity ordering and a predecessor chain
    fn from_plot(reachability: &[f64], core: f64, min_points: usize) -> OpticsAnalysis<f64> {
        let orderings = reachability
            .iter()
            .enumerate()
            .map(|(i, &r)| Sample {
                index: i,
                core_distance: Some(core),
                reachability_distance: if r.is_finite() { Some(r) } else { None },
                predecessor: if i == 0 { None } else { Some(i - 1) },
            })
            .collect();
        OpticsAnalysis {
            orderings,
            min_points,
        }
    }

    #[test]
    fn xi_splits_at_reachability_peak() {
        let inf = f64::INFINITY;
        let plot = [inf, 1., 1., 1., 1., 1., 10., 1., 1., 1., 1., 1.];
        let analysis = from_plot(&plot, 1., 3);

        let clusters = analysis
            .xi_clusters(0.05, ClusterSize::Count(3), true)
            .unwrap();
        assert_eq!(clusters, vec![(0, 5), (6, 11), (0, 11)]);

        let labels = analysis
            .extract_xi(0.05, ClusterSize::Count(3), true)
            .unwrap();
        let mut expected = vec![Some(0); 6];
        expected.extend(vec![Some(1); 6]);
        assert_eq!(labels, Array1::from(expected));
    }

    #[test]
    fn xi_respects_min_cluster_size() {
        let inf = f64::INFINITY;
        let plot = [inf, 1., 1., 1., 1., 1., 10., 1., 1., 1., 1., 1.];
        let analysis = from_plot(&plot, 1., 3);

        // Only the enclosing cluster is large enough
        let labels = analysis
            .extract_xi(0.05, ClusterSize::Count(7), false)
            .unwrap();
        assert!(labels.iter().all(|l| *l == Some(0)));

        let labels = analysis
            .extract_xi(0.05, ClusterSize::Fraction(0.5), false)
            .unwrap();
        assert_eq!(labels[0], Some(0));
        assert_eq!(labels[11], Some(1));
    }

    #[test]
    fn flat_plot_has_a_single_cluster() {
        let inf = f64::INFINITY;
        let analysis = from_plot(&[inf, 1., 1., 1., 1.], 1., 2);
        let labels = analysis
            .extract_xi(0.1, ClusterSize::Count(2), true)
            .unwrap();
        assert_eq!(labels, arr1(&[Some(0); 5]));
    }

    #[test]
    fn xi_parameters_are_checked() {
        let analysis = from_plot(&[f64::INFINITY, 1., 1.], 1., 2);
        assert_eq!(
            analysis.extract_xi(0., ClusterSize::Count(2), true),
            Err(OpticsError::Xi(0.))
        );
        assert_eq!(
            analysis.extract_xi(1., ClusterSize::Count(2), true),
            Err(OpticsError::Xi(1.))
        );
        assert!(matches!(
            analysis.extract_xi(0.05, ClusterSize::Count(1), true),
            Err(OpticsError::ClusterSize(_))
        ));
        assert!(matches!(
            analysis.extract_xi(0.05, ClusterSize::Count(4), true),
            Err(OpticsError::ClusterSize(_))
        ));
        assert!(matches!(
            analysis.extract_xi(0.05, ClusterSize::Fraction(1.5), true),
            Err(OpticsError::ClusterSize(_))
        ));
    }

    #[test]
    fn cluster_size_fraction_is_at_least_two() {
        assert_eq!(ClusterSize::Fraction(0.1).resolve(10), Ok(2));
        assert_eq!(ClusterSize::Fraction(0.1).resolve(500), Ok(50));
        assert_eq!(ClusterSize::Count(7).resolve(500), Ok(7));
    }

    #[test]
    fn dbscan_extraction_marks_far_non_core_points() {
        let mut analysis = from_plot(&[f64::INFINITY, 1., 1., 5., 1.], 1., 2);
        // A point far from the first cluster without a dense neighbourhood is noise
        analysis.orderings[3].core_distance = Some(4.);
        let labels = analysis.extract_dbscan(2.);
        assert_eq!(labels, arr1(&[Some(0), Some(0), Some(0), None, Some(0)]));

        analysis.orderings[3].core_distance = Some(1.);
        let labels = analysis.extract_dbscan(2.);
        assert_eq!(labels, arr1(&[Some(0), Some(0), Some(0), Some(1), Some(1)]));
    }
}
