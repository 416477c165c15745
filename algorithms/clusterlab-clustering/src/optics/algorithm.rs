use crate::distance::{Distance, L2Dist};
use crate::neighbors::build_index;
use crate::optics::analysis::{OpticsAnalysis, Sample};
use crate::optics::hyperparams::{OpticsParams, OpticsValidParams};
use clusterlab::traits::Transformer;
use clusterlab::Float;
use clusterlab_nn::{CommonNearestNeighbour, NearestNeighbour, NearestNeighbourIndex};
use ndarray::{ArrayView, Ix1, Ix2};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, PartialOrd, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
/// OPTICS (Ordering Points To Identify Clustering Structure) is a clustering algorithm that
/// doesn't explicitly cluster the data but instead creates an "augmented ordering" of the dataset
/// representing it's density-based clustering structure. This ordering contains information which
/// is equivalent to the density-based clusterings and can then be used for automatic and
/// interactive cluster analysis.
///
/// OPTICS cluster analysis can be used to derive clusters equivalent to the output of other
/// clustering algorithms such as DBSCAN, or nested clusters of varying density with the Xi
/// method. However, due to it's more complicated neighborhood queries it typically has a higher
/// computational cost than other more specific algorithms.
///
/// More details on the OPTICS algorithm can be found
/// [here](https://www.wikipedia.org/wiki/OPTICS_algorithm)
///
/// ## Tutorial
///
/// ```rust
/// use clusterlab::traits::Transformer;
/// use clusterlab_clustering::{ClusterSize, Optics};
/// use ndarray::Array2;
///
/// let data: Vec<f64> = (0..10).chain(100..110).map(|x| x as f64).collect();
/// let data = Array2::from_shape_vec((20, 1), data).unwrap();
///
/// let analysis = Optics::params(3).transform(data.view()).unwrap();
/// let labels = analysis
///     .extract_xi(0.05, ClusterSize::Fraction(0.25), true)
///     .unwrap();
/// assert_eq!(labels[0], Some(0));
/// assert_eq!(labels[19], Some(1));
/// ```
pub struct Optics;

impl Optics {
    /// Configures the hyperparameters with the minimum number of points required to form a cluster
    ///
    /// Defaults are provided if the optional parameters are not specified:
    /// * `tolerance = F::infinity()`
    /// * `dist_fn = L2Dist` (Euclidean distance)
    /// * `nn_algo = KdTree`
    pub fn params<F: Float>(min_points: usize) -> OpticsParams<F, L2Dist, CommonNearestNeighbour> {
        OpticsParams::new(min_points, L2Dist, CommonNearestNeighbour::KdTree)
    }

    /// Configures the hyperparameters with the minimum number of points, a custom distance
    /// metric and a custom nearest neighbour algorithm
    pub fn params_with<F: Float, D: Distance<F>, N: NearestNeighbour>(
        min_points: usize,
        dist_fn: D,
        nn_algo: N,
    ) -> OpticsParams<F, D, N> {
        OpticsParams::new(min_points, dist_fn, nn_algo)
    }
}

impl<F: Float, D: Distance<F>, N: NearestNeighbour>
    Transformer<ArrayView<'_, F, Ix2>, OpticsAnalysis<F>> for OpticsValidParams<F, D, N>
{
    fn transform(&self, observations: ArrayView<F, Ix2>) -> OpticsAnalysis<F> {
        let n_samples = observations.nrows();
        let nn = build_index(self.nn_algo(), &observations, self.dist_fn().clone());
        let neighborhoods: Vec<_> = observations
            .rows()
            .into_iter()
            .map(|row| self.find_neighbors(&*nn, row))
            .collect();
        let mut points = (0..n_samples).map(Sample::new).collect::<Vec<_>>();
        for point in points.iter_mut() {
            self.set_core_distance(point, &neighborhoods[point.index]);
        }

        let mut processed = vec![false; n_samples];
        let mut orderings = Vec::with_capacity(n_samples);
        for _ in 0..n_samples {
            // The unprocessed point with the smallest reachability, lowest index on ties
            let next = match points
                .iter()
                .filter(|p| !processed[p.index])
                .min_by(|a, b| a.reachability_order(b))
            {
                Some(p) => p.index,
                None => break,
            };
            processed[next] = true;
            orderings.push(points[next].clone());

            if let Some(core_distance) = points[next].core_distance {
                self.update_reachability(
                    next,
                    core_distance,
                    &neighborhoods[next],
                    &mut points,
                    &processed,
                );
            }
        }

        log::debug!(
            "OPTICS ordered {} samples, {} of them core points",
            orderings.len(),
            orderings
                .iter()
                .filter(|s| s.core_distance.is_some())
                .count()
        );
        OpticsAnalysis {
            orderings,
            min_points: self.minimum_points(),
        }
    }
}

impl<F: Float, D: Distance<F>, N: NearestNeighbour> OpticsValidParams<F, D, N> {
    /// Indices and distances of the points within the tolerance of `candidate`, closest first
    ///
    /// A candidate holding non-finite values has no neighbours.
    fn find_neighbors(
        &self,
        nn: &dyn NearestNeighbourIndex<F>,
        candidate: ArrayView<F, Ix1>,
    ) -> Vec<(usize, F)> {
        nn.within_range(candidate, self.tolerance())
            .unwrap_or_default()
            .into_iter()
            .map(|(pt, index)| (index, self.dist_fn().distance(pt, candidate)))
            .collect()
    }

    /// Set the core distance, the distance to the `min_points`-th closest point (itself
    /// included) when it lies within the tolerance
    fn set_core_distance(&self, point: &mut Sample<F>, neighbors: &[(usize, F)]) {
        point.core_distance = neighbors
            .get(self.minimum_points() - 1)
            .map(|&(_, dist)| dist);
    }

    /// Lowers the reachability of the unprocessed neighbours of a core point
    fn update_reachability(
        &self,
        core: usize,
        core_distance: F,
        neighbors: &[(usize, F)],
        points: &mut [Sample<F>],
        processed: &[bool],
    ) {
        for &(i, dist) in neighbors {
            if processed[i] {
                continue;
            }
            let r_dist = F::max(core_distance, dist);
            let point = &mut points[i];
            match point.reachability_distance {
                Some(r) if r <= r_dist => {}
                _ => {
                    point.reachability_distance = Some(r_dist);
                    point.predecessor = Some(core);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::L1Dist;
    use crate::optics::{ClusterSize, OpticsError};
    use clusterlab::ParamGuard;
    use ndarray::{array, Array1, Array2};
    use std::collections::BTreeSet;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<OpticsAnalysis<f64>>();
        has_autotraits::<Optics>();
        has_autotraits::<Sample<f64>>();
        has_autotraits::<OpticsError>();
        has_autotraits::<OpticsParams<f64, L2Dist, CommonNearestNeighbour>>();
        has_autotraits::<OpticsValidParams<f64, L2Dist, CommonNearestNeighbour>>();
    }

    #[test]
    fn optics_consistency() {
        let params = Optics::params(3);
        let data = vec![1.0, 2.0, 3.0, 8.0, 8.0, 7.0, 2.0, 5.0, 6.0, 7.0, 8.0, 3.0];
        let data: Array2<f64> = Array2::from_shape_vec((data.len(), 1), data).unwrap();

        let samples = params.transform(data.view()).unwrap();

        // Make sure whole dataset is present:
        let indexes = samples.iter().map(|x| x.index).collect::<BTreeSet<_>>();
        assert!((0..data.len()).all(|x| indexes.contains(&x)));
        assert_eq!(samples.len(), data.len());

        // As we haven't set a tolerance every point should have a core distance
        assert!(samples.iter().all(|x| x.core_distance.is_some()));
        // Only the first point has an undefined reachability
        assert!(samples[0].reachability_distance.is_none());
        assert!(samples[1..].iter().all(|x| x.reachability_distance.is_some()));
    }

    #[test]
    fn simple_dataset() {
        let params = Optics::params(3).tolerance(4.0);
        //               0    1   2    3     4     5     6     7     8    9     10    11     12
        let data = vec![
            1.0, 2.0, 3.0, 10.0, 18.0, 18.0, 15.0, 2.0, 15.0, 18.0, 3.0, 100.0, 101.0,
        ];
        let data: Array2<f64> = Array2::from_shape_vec((data.len(), 1), data).unwrap();

        // indexes of groupings of points in the dataset. These will end up with an outlier value
        // in between them to help separate things
        let first_grouping = [0, 1, 2, 7, 10].iter().collect::<BTreeSet<_>>();
        let second_grouping = [4, 5, 6, 8, 9].iter().collect::<BTreeSet<_>>();

        let samples = params.transform(data.view()).unwrap();

        let indexes = samples.iter().map(|x| x.index).collect::<BTreeSet<_>>();
        assert!((0..data.len()).all(|x| indexes.contains(&x)));

        assert!(samples
            .iter()
            .take(first_grouping.len())
            .all(|x| first_grouping.contains(&x.index)));
        let skip_len = first_grouping.len() + 1;
        assert!(samples
            .iter()
            .skip(skip_len)
            .take(first_grouping.len())
            .all(|x| second_grouping.contains(&x.index)));

        for anomaly in [3, 11, 12] {
            let anomaly = samples.iter().find(|x| x.index == anomaly).unwrap();
            assert!(anomaly.core_distance.is_none());
            assert!(anomaly.reachability_distance.is_none());
            assert!(anomaly.predecessor.is_none());
        }
    }

    #[test]
    fn reachability_and_predecessors() {
        let data = array![[0.], [1.], [3.], [7.]];
        let analysis = Optics::params(2).transform(data.view()).unwrap();

        let order: Vec<_> = analysis.iter().map(|s| s.index()).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
        let reach: Vec<_> = analysis
            .iter()
            .map(|s| *s.reachability_distance())
            .collect();
        assert_eq!(reach, vec![None, Some(1.), Some(2.), Some(4.)]);
        let preds: Vec<_> = analysis.iter().map(|s| s.predecessor()).collect();
        assert_eq!(preds, vec![None, Some(0), Some(1), Some(2)]);
        let cores: Vec<_> = analysis.iter().map(|s| *s.core_distance()).collect();
        assert_eq!(cores, vec![Some(1.), Some(1.), Some(2.), Some(4.)]);
    }

    #[test]
    fn ties_go_to_the_lowest_index() {
        // Both 1 and 2 are reached from 0 with the same distance
        let data = array![[0., 0.], [1., 0.], [-1., 0.]];
        let analysis = Optics::params(2).transform(data.view()).unwrap();
        let order: Vec<_> = analysis.iter().map(|s| s.index()).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn dataset_too_small() {
        let params = Optics::params(4);
        let data = vec![1.0, 2.0, 3.0];
        let data: Array2<f64> = Array2::from_shape_vec((data.len(), 1), data).unwrap();

        let samples = params.transform(data.view()).unwrap();

        assert!(samples
            .iter()
            .all(|x| x.core_distance.is_none() && x.reachability_distance.is_none()));
    }

    #[test]
    fn invalid_params() {
        let params = Optics::params(1);
        let data = vec![1.0, 2.0, 3.0];
        let data: Array2<f64> = Array2::from_shape_vec((data.len(), 1), data).unwrap();
        assert!(params.transform(data.view()).is_err());

        let params = Optics::params(2);
        assert!(params.transform(data.view()).is_ok());

        let params = params.tolerance(0.0);
        assert!(params.transform(data.view()).is_err());
    }

    #[test]
    fn core_distance_counts_the_point_itself() {
        let data = array![[1.0], [2.0], [10.0], [15.0], [13.0]];
        let params = Optics::params(3).tolerance(6.0).check_unwrap();
        let nn = CommonNearestNeighbour::KdTree
            .from_batch(&data, L2Dist)
            .unwrap();

        let neighbors = params.find_neighbors(&*nn, data.row(0));
        assert_eq!(neighbors, vec![(0, 0.), (1, 1.)]);
        let mut point = Sample::new(0);
        params.set_core_distance(&mut point, &neighbors);
        assert!(point.core_distance.is_none());

        let neighbors = params.find_neighbors(&*nn, data.row(4));
        assert_eq!(neighbors, vec![(4, 0.), (3, 2.), (2, 3.)]);
        let mut point = Sample::new(4);
        params.set_core_distance(&mut point, &neighbors);
        assert_eq!(point.core_distance, Some(3.));
    }

    #[test]
    fn separated_groups_are_extracted() {
        let data: Vec<f64> = (0..10).chain(100..110).map(|x| x as f64).collect();
        let data = Array2::from_shape_vec((20, 1), data).unwrap();

        let analysis = Optics::params(3).transform(data.view()).unwrap();
        let mut expected = vec![Some(0); 10];
        expected.extend(vec![Some(1); 10]);
        let expected = Array1::from(expected);

        let labels = analysis
            .extract_xi(0.05, ClusterSize::Count(5), true)
            .unwrap();
        assert_eq!(labels, expected);

        let labels = analysis.extract_dbscan(3.);
        assert_eq!(labels, expected);
        let labels = analysis.extract_dbscan(0.5);
        assert!(labels.iter().all(|l| l.is_none()));
    }

    #[test]
    fn manhattan_distance() {
        let data = array![[0., 0.], [1., 1.], [2., 2.]];
        for nn_algo in &[
            CommonNearestNeighbour::LinearSearch,
            CommonNearestNeighbour::KdTree,
            CommonNearestNeighbour::BallTree,
        ] {
            let analysis = Optics::params_with(2, L1Dist, *nn_algo)
                .transform(data.view())
                .unwrap();
            let reach: Vec<_> = analysis
                .iter()
                .map(|s| *s.reachability_distance())
                .collect();
            assert_eq!(reach, vec![None, Some(2.), Some(2.)]);
        }
    }

    #[test]
    fn nn_algorithms_agree() {
        let data: Vec<f64> = (0..8).chain(40..46).map(|x| x as f64 * 0.5).collect();
        let data = Array2::from_shape_vec((7, 2), data).unwrap();
        let expected = Optics::params(2)
            .tolerance(3.0)
            .nn_algo(CommonNearestNeighbour::LinearSearch)
            .transform(data.view())
            .unwrap();
        for nn_algo in &[
            CommonNearestNeighbour::KdTree,
            CommonNearestNeighbour::BallTree,
        ] {
            let analysis = Optics::params(2)
                .tolerance(3.0)
                .nn_algo(*nn_algo)
                .transform(data.view())
                .unwrap();
            assert_eq!(analysis.orderings, expected.orderings);
        }
    }

    #[test]
    fn zero_dimensional_data() {
        let data = Array2::<f64>::zeros((3, 0));
        let analysis = Optics::params(2).transform(data.view()).unwrap();
        let order: Vec<_> = analysis.iter().map(|s| s.index()).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }
}
