use super::algorithm::update_min_dists;
use crate::distance::Distance;
use clusterlab::Float;
use ndarray::{s, Array1, Array2, ArrayView2, Axis};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
/// Specifies centroid initialization algorithm for KMeans.
pub enum KMeansInit<F: Float> {
    /// Pick random points as centroids.
    Random,
    /// Precomputed list of centroids, represented as an array of (n_centroids, n_features).
    Precomputed(Array2<F>),
    /// K-means++ algorithm. Using this over random initialization causes K-means to converge
    /// faster for almost all cases, since K-means++ produces better centroids.
    KMeansPlusPlus,
}

impl<F: Float> KMeansInit<F> {
    /// Runs the chosen initialization routine
    pub(crate) fn run<R: Rng, D: Distance<F>>(
        &self,
        dist_fn: &D,
        n_clusters: usize,
        observations: ArrayView2<F>,
        rng: &mut R,
    ) -> Array2<F> {
        match self {
            Self::Random => random_init(n_clusters, observations, rng),
            Self::KMeansPlusPlus => k_means_plusplus(dist_fn, n_clusters, observations, rng),
            Self::Precomputed(centroids) => centroids.clone(),
        }
    }
}

/// Pick random points from the input matrix as centroids
fn random_init<F: Float>(
    n_clusters: usize,
    observations: ArrayView2<F>,
    rng: &mut impl Rng,
) -> Array2<F> {
    let (n_samples, _) = observations.dim();
    let indices = rand::seq::index::sample(rng, n_samples, n_clusters).into_vec();
    observations.select(Axis(0), &indices)
}

/// Selects centroids using the KMeans++ initialization algorithm. The weights determine the
/// likeliness of an input point to be selected as a centroid relative to other points. The higher
/// the weight, the more likely the point will be selected as a centroid.
fn k_means_plusplus<F: Float, D: Distance<F>>(
    dist_fn: &D,
    n_clusters: usize,
    observations: ArrayView2<F>,
    rng: &mut impl Rng,
) -> Array2<F> {
    let (n_samples, n_features) = observations.dim();
    let mut centroids = Array2::zeros((n_clusters, n_features));
    // Select 1st centroid from the input points uniformly
    let first_idx = rng.gen_range(0..n_samples);
    centroids.row_mut(0).assign(&observations.row(first_idx));

    let mut dists = Array1::zeros(n_samples);
    for c_cnt in 1..n_clusters {
        update_min_dists(
            dist_fn,
            &centroids.slice(s![0..c_cnt, ..]),
            &observations,
            &mut dists,
        );
        // All points coincide with a centroid when every weight is zero, fall back to a
        // uniform draw
        let weights = dists.iter().map(|d| d.to_f64().unwrap_or(0.));
        let centroid_idx = match WeightedIndex::new(weights) {
            Ok(weights) => weights.sample(rng),
            Err(_) => rng.gen_range(0..n_samples),
        };
        centroids
            .row_mut(c_cnt)
            .assign(&observations.row(centroid_idx));
    }
    centroids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::L2Dist;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, concatenate, Array};
    use ndarray_rand::rand_distr::Normal;
    use ndarray_rand::RandomExt;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn test_precomputed() {
        let mut rng = Xoshiro256Plus::seed_from_u64(40);
        let centroids = array![[0.0, 1.0], [40.0, 10.0]];
        let observations = array![[3.0, 4.0], [1.0, 3.0], [25.0, 15.0]];
        let c = KMeansInit::Precomputed(centroids.clone()).run(
            &L2Dist,
            2,
            observations.view(),
            &mut rng,
        );
        assert_abs_diff_eq!(c, centroids);
    }

    #[test]
    fn test_random_picks_distinct_observations() {
        let mut rng = Xoshiro256Plus::seed_from_u64(40);
        let observations = array![[1.0], [2.0], [3.0], [4.0]];
        let c = KMeansInit::Random.run(&L2Dist, 4, observations.view(), &mut rng);
        let mut picked: Vec<f64> = c.iter().copied().collect();
        picked.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(picked, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_kmeans_plusplus_spreads_centroids() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let centers = [-100.0, 0.0, 100.0];
        let blobs: Vec<Array2<f64>> = centers
            .iter()
            .map(|&c| {
                Array::random_using((50, 1), Normal::new(c, 1.).unwrap(), &mut rng)
            })
            .collect();
        let views: Vec<_> = blobs.iter().map(|b| b.view()).collect();
        let observations = concatenate(Axis(0), &views).unwrap();

        for _ in 0..5 {
            let c = KMeansInit::KMeansPlusPlus.run(&L2Dist, 3, observations.view(), &mut rng);
            let mut found: Vec<f64> = c.iter().map(|x| (x / 100.).round()).collect();
            found.sort_by(|a, b| a.partial_cmp(b).unwrap());
            assert_eq!(found, vec![-1., 0., 1.]);
        }
    }

    #[test]
    fn test_kmeans_plusplus_duplicate_points() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let observations = Array2::<f64>::ones((5, 2));
        let c = KMeansInit::KMeansPlusPlus.run(&L2Dist, 2, observations.view(), &mut rng);
        assert_abs_diff_eq!(c, Array2::ones((2, 2)));
    }
}
