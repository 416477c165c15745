use crate::distance::{Distance, L2Dist};
use crate::k_means::{KMeansError, KMeansInit, KMeansParams, KMeansValidParams};
use clusterlab::traits::{Fit, Predict, Transformer};
use clusterlab::{DatasetBase, Float};
use ndarray::{Array1, Array2, ArrayBase, ArrayView2, Axis, Data, DataMut, Ix1, Ix2, Zip};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// K-means clustering aims to partition a set of unlabeled observations into clusters,
/// where each observation belongs to the cluster with the nearest mean.
///
/// The mean of the points within a cluster is called *centroid*.
///
/// Given the set of centroids, you can assign an observation to a cluster
/// choosing the nearest centroid.
///
/// We provide a modified version of the _standard algorithm_ (also known as Lloyd's Algorithm),
/// called m_k-means, which uses a slightly modified update step to avoid problems with empty
/// clusters. Setting a [batch size](KMeansParams::batch_size) switches to Mini-Batch K-means.
///
/// ## Standard algorithm
///
/// K-means is an iterative algorithm: it progressively refines the choice of centroids.
///
/// It's guaranteed to converge, even though it might not find the optimal set of centroids
/// (unfortunately it can get stuck in a local minimum, finding the optimal minimum if NP-hard!).
///
/// There are three steps in the standard algorithm:
/// - initialisation step: select initial centroids using one of our provided algorithms.
/// - assignment step: assign each observation to the nearest cluster
///                    (minimum distance between the observation and the cluster's centroid);
/// - update step: recompute the centroid of each cluster.
///
/// The initialisation step is a one-off, done at the very beginning.
/// Assignment and update are repeated in a loop until convergence is reached (either the
/// squared distance between the old and the new clusters is below `tolerance` or
/// we exceed the `max_n_iterations`).
///
/// ## Mini-Batch algorithm
///
/// Every iteration draws `batch_size` random samples, assigns them to their closest centroid
/// and moves each centroid towards its new members. A centroid's learning rate is the inverse
/// of the number of samples it has been assigned so far, so centroids settle as training
/// progresses. Each iteration is much cheaper than a full Lloyd step, at the cost of slightly
/// worse centroids.
///
/// More details on Mini-Batch K-means can be found [here](https://www.eecs.tufts.edu/~dsculley/papers/fastkmeans.pdf).
///
/// ## Tutorial
///
/// ```
/// use clusterlab::DatasetBase;
/// use clusterlab::traits::{Fit, Predict};
/// use clusterlab_clustering::KMeans;
/// use clusterlab_datasets::generate;
/// use ndarray::{Axis, array};
/// use rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256Plus;
/// use approx::assert_abs_diff_eq;
///
/// // Our random number generator, seeded for reproducibility
/// let mut rng = Xoshiro256Plus::seed_from_u64(42);
///
/// // `expected_centroids` has shape `(n_centroids, n_features)`
/// // i.e. three points in the 2-dimensional plane
/// let expected_centroids = array![[0., 1.], [-10., 20.], [-1., 10.]];
/// // Let's generate a synthetic dataset: three blobs of observations
/// // (100 points each) centered around our `expected_centroids`
/// let data = generate::blobs(100, &expected_centroids, &mut rng);
/// let n_clusters = expected_centroids.len_of(Axis(0));
/// let observations = DatasetBase::from(data);
///
/// // Mini-Batch K-means with batches of 64 samples
/// let model = KMeans::params_with_rng(n_clusters, rng.clone())
///     .batch_size(64)
///     .fit(&observations)
///     .expect("KMeans fitted");
///
/// // Predict returns the **index** of the nearest cluster
/// let memberships = model.predict(&array![[-9., 20.5]]);
/// // We can retrieve the actual centroid of the closest cluster using `.centroids()`
/// let closest_centroid = &model.centroids().index_axis(Axis(0), memberships[0]);
/// assert_abs_diff_eq!(closest_centroid.to_owned(), &array![-10., 20.], epsilon = 3e-1);
/// ```
pub struct KMeans<F: Float, D: Distance<F> = L2Dist> {
    centroids: Array2<F>,
    cluster_count: Array1<F>,
    inertia: F,
    dist_fn: D,
}

impl<F: Float> KMeans<F, L2Dist> {
    pub fn params(nclusters: usize) -> KMeansParams<F, Xoshiro256Plus, L2Dist> {
        KMeansParams::new(nclusters, Xoshiro256Plus::seed_from_u64(42), L2Dist)
    }

    pub fn params_with_rng<R: Rng>(nclusters: usize, rng: R) -> KMeansParams<F, R, L2Dist> {
        KMeansParams::new(nclusters, rng, L2Dist)
    }
}

impl<F: Float, D: Distance<F>> KMeans<F, D> {
    pub fn params_with<R: Rng>(nclusters: usize, rng: R, dist_fn: D) -> KMeansParams<F, R, D> {
        KMeansParams::new(nclusters, rng, dist_fn)
    }

    /// Return the set of centroids as a 2-dimensional matrix with shape
    /// `(n_centroids, n_features)`.
    pub fn centroids(&self) -> &Array2<F> {
        &self.centroids
    }

    /// Return the number of training points belonging to each cluster
    pub fn cluster_count(&self) -> &Array1<F> {
        &self.cluster_count
    }

    /// Return the sum of distances between each training point and its closest centroid, averaged
    /// across all training points.
    pub fn inertia(&self) -> F {
        self.inertia
    }
}

impl<F: Float, R: Rng + Clone, D: Distance<F>> KMeansValidParams<F, R, D> {
    /// Lloyd iterations on the full dataset, returns the centroids and whether they converged
    fn run_full_batch(
        &self,
        mut centroids: Array2<F>,
        observations: &ArrayView2<F>,
        memberships: &mut Array1<usize>,
    ) -> (Array2<F>, bool) {
        for _ in 0..self.max_n_iterations() {
            update_cluster_memberships(self.dist_fn(), &centroids, observations, memberships);
            let new_centroids = compute_centroids(&centroids, observations, memberships);
            let shift = centroid_shift(self.dist_fn(), &centroids, &new_centroids);
            centroids = new_centroids;
            if shift < self.tolerance() {
                return (centroids, true);
            }
        }
        (centroids, false)
    }

    /// Mini-Batch iterations, each on `batch_size` samples drawn with replacement
    fn run_mini_batch(
        &self,
        mut centroids: Array2<F>,
        observations: &ArrayView2<F>,
        batch_size: usize,
        rng: &mut R,
    ) -> (Array2<F>, bool) {
        let n_samples = observations.nrows();
        let mut counts = Array1::zeros(self.n_clusters());
        let mut memberships = Array1::zeros(batch_size);
        for _ in 0..self.max_n_iterations() {
            let indices: Vec<usize> = (0..batch_size)
                .map(|_| rng.gen_range(0..n_samples))
                .collect();
            let batch = observations.select(Axis(0), &indices);
            update_cluster_memberships(self.dist_fn(), &centroids, &batch, &mut memberships);
            let new_centroids =
                compute_centroids_incremental(&batch, &memberships, &centroids, &mut counts);
            let shift = centroid_shift(self.dist_fn(), &centroids, &new_centroids);
            centroids = new_centroids;
            if shift < self.tolerance() {
                return (centroids, true);
            }
        }
        (centroids, false)
    }
}

impl<F: Float, R: Rng + Clone, DA: Data<Elem = F>, T, D: Distance<F>>
    Fit<ArrayBase<DA, Ix2>, T, KMeansError> for KMeansValidParams<F, R, D>
{
    type Object = KMeans<F, D>;

    /// Given an input matrix `observations`, with shape `(n_observations, n_features)`,
    /// `fit` identifies `n_clusters` centroids based on the training data distribution.
    ///
    /// An instance of `KMeans` is returned.
    ///
    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<DA, Ix2>, T>,
    ) -> Result<Self::Object, KMeansError> {
        let mut rng = self.rng().clone();
        let observations = dataset.records().view();
        let n_samples = observations.nrows();
        if n_samples < self.n_clusters() {
            return Err(KMeansError::NotEnoughSamples {
                n_samples,
                n_clusters: self.n_clusters(),
            });
        }

        let mut memberships = Array1::zeros(n_samples);
        let mut dists = Array1::zeros(n_samples);
        let mut best: Option<(F, Array2<F>, bool)> = None;

        // Precomputed centroids give the same result on every run
        let n_runs = match self.init_method() {
            KMeansInit::Precomputed(_) => 1,
            _ => self.n_runs(),
        };
        for _ in 0..n_runs {
            let centroids =
                self.init_method()
                    .run(self.dist_fn(), self.n_clusters(), observations, &mut rng);
            let (centroids, converged) = match self.batch_size() {
                None => self.run_full_batch(centroids, &observations, &mut memberships),
                Some(batch_size) => {
                    self.run_mini_batch(centroids, &observations, batch_size, &mut rng)
                }
            };

            // We keep the centroids which minimize the inertia (defined as the sum of
            // the squared distances of the closest centroid for all observations)
            // over the n runs of the KMeans algorithm.
            update_min_dists(self.dist_fn(), &centroids, &observations, &mut dists);
            let inertia = dists.sum();
            let improves = match &best {
                Some((min_inertia, _, _)) => inertia < *min_inertia,
                None => inertia.is_finite(),
            };
            if improves {
                best = Some((inertia, centroids, converged));
            }
        }

        let (min_inertia, centroids, converged) = best.ok_or(KMeansError::InertiaError)?;
        if !converged {
            log::warn!(
                "K-means did not converge within {} iterations, consider increasing max_n_iterations",
                self.max_n_iterations()
            );
        }

        update_cluster_memberships(self.dist_fn(), &centroids, &observations, &mut memberships);
        let mut cluster_count = Array1::zeros(self.n_clusters());
        memberships
            .iter()
            .for_each(|&c| cluster_count[c] += F::one());
        Ok(KMeans {
            centroids,
            cluster_count,
            inertia: min_inertia / F::cast(n_samples),
            dist_fn: self.dist_fn().clone(),
        })
    }
}

impl<F: Float, DA: Data<Elem = F>, D: Distance<F>> Transformer<&ArrayBase<DA, Ix2>, Array1<F>>
    for KMeans<F, D>
{
    /// Given an input matrix `observations`, with shape `(n_observations, n_features)`,
    /// `transform` returns, for each observation, its squared distance to its centroid.
    fn transform(&self, observations: &ArrayBase<DA, Ix2>) -> Array1<F> {
        let mut dists = Array1::zeros(observations.nrows());
        update_min_dists(&self.dist_fn, &self.centroids, observations, &mut dists);
        dists
    }
}

impl<F: Float, DA: Data<Elem = F>, D: Distance<F>> Predict<&ArrayBase<DA, Ix2>, Array1<usize>>
    for KMeans<F, D>
{
    /// Given an input matrix `observations`, with shape `(n_observations, n_features)`,
    /// `predict` returns, for each observation, the index of the closest cluster/centroid.
    ///
    /// You can retrieve the centroid associated to an index using the
    /// [`centroids` method](#method.centroids).
    fn predict(&self, observations: &ArrayBase<DA, Ix2>) -> Array1<usize> {
        let mut memberships = Array1::zeros(observations.nrows());
        update_cluster_memberships(
            &self.dist_fn,
            &self.centroids,
            observations,
            &mut memberships,
        );
        memberships
    }
}

impl<F: Float, DA: Data<Elem = F>, T, D: Distance<F>>
    Predict<DatasetBase<ArrayBase<DA, Ix2>, T>, DatasetBase<ArrayBase<DA, Ix2>, Array1<usize>>>
    for KMeans<F, D>
{
    /// Attach the index of the closest centroid to every record of the dataset
    fn predict(
        &self,
        dataset: DatasetBase<ArrayBase<DA, Ix2>, T>,
    ) -> DatasetBase<ArrayBase<DA, Ix2>, Array1<usize>> {
        let memberships = self.predict(dataset.records());
        dataset.with_targets(memberships)
    }
}

impl<F: Float, DA: Data<Elem = F>, D: Distance<F>> Predict<&ArrayBase<DA, Ix1>, usize>
    for KMeans<F, D>
{
    /// Given one input observation, return the index of its closest cluster
    fn predict(&self, observation: &ArrayBase<DA, Ix1>) -> usize {
        closest_centroid(&self.dist_fn, &self.centroids, observation).0
    }
}

/// K-means is an iterative algorithm.
/// We will perform the assignment and update steps until we are satisfied
/// (according to our convergence criteria).
///
/// `compute_centroids` returns a 2-dimensional array,
/// where the i-th row corresponds to the i-th cluster.
fn compute_centroids<F: Float>(
    old_centroids: &Array2<F>,
    // (n_observations, n_features)
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    // (n_observations,)
    cluster_memberships: &ArrayBase<impl Data<Elem = usize>, Ix1>,
) -> Array2<F> {
    let n_clusters = old_centroids.nrows();
    let mut counts: Array1<usize> = Array1::ones(n_clusters);
    let mut centroids = Array2::zeros((n_clusters, observations.ncols()));

    Zip::from(observations.rows())
        .and(cluster_memberships)
        .for_each(|observation, &cluster_membership| {
            let mut centroid = centroids.row_mut(cluster_membership);
            centroid += &observation;
            counts[cluster_membership] += 1;
        });
    // m_k-means: Treat the old centroid like another point in the cluster
    centroids += old_centroids;

    Zip::from(centroids.rows_mut())
        .and(&counts)
        .for_each(|mut centroid, &cnt| centroid /= F::cast(cnt));
    centroids
}

/// Returns new centroids which has the moving average of all observations in each cluster added to
/// the old centroids.
/// Updates `counts` with the number of observations in each cluster.
fn compute_centroids_incremental<F: Float>(
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    cluster_memberships: &ArrayBase<impl Data<Elem = usize>, Ix1>,
    old_centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    counts: &mut ArrayBase<impl DataMut<Elem = F>, Ix1>,
) -> Array2<F> {
    let mut centroids = old_centroids.to_owned();
    Zip::from(observations.rows())
        .and(cluster_memberships)
        .for_each(|obs, &c| {
            // Computes centroids[c] += (observation - centroids[c]) / counts[c]
            // If cluster is empty for this batch, then this wouldn't even be called, so no
            // chance of getting NaN.
            counts[c] += F::one();
            let shift = (&obs - &centroids.row(c)) / counts[c];
            let mut centroid = centroids.row_mut(c);
            centroid += &shift;
        });
    centroids
}

/// Total reduced distance travelled by the centroids in one update
fn centroid_shift<F: Float, D: Distance<F>>(
    dist_fn: &D,
    old_centroids: &Array2<F>,
    new_centroids: &Array2<F>,
) -> F {
    old_centroids
        .rows()
        .into_iter()
        .zip(new_centroids.rows())
        .map(|(old, new)| dist_fn.rdistance(old, new))
        .sum()
}

// Update `cluster_memberships` with the index of the cluster each observation belongs to.
pub(crate) fn update_cluster_memberships<F: Float, D: Distance<F>>(
    dist_fn: &D,
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    cluster_memberships: &mut ArrayBase<impl DataMut<Elem = usize>, Ix1>,
) {
    Zip::from(observations.axis_iter(Axis(0)))
        .and(cluster_memberships)
        .for_each(|observation, cluster_membership| {
            *cluster_membership = closest_centroid(dist_fn, centroids, &observation).0
        });
}

// Updates `dists` with the distance of each observation from its closest centroid.
pub(crate) fn update_min_dists<F: Float, D: Distance<F>>(
    dist_fn: &D,
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    dists: &mut ArrayBase<impl DataMut<Elem = F>, Ix1>,
) {
    Zip::from(observations.axis_iter(Axis(0)))
        .and(dists)
        .for_each(|observation, dist| {
            *dist = closest_centroid(dist_fn, centroids, &observation).1
        });
}

/// Given a matrix of centroids with shape (n_centroids, n_features) and an observation,
/// return the index of the closest centroid (the index of the corresponding row in `centroids`).
pub(crate) fn closest_centroid<F: Float, D: Distance<F>>(
    dist_fn: &D,
    // (n_centroids, n_features)
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    // (n_features)
    observation: &ArrayBase<impl Data<Elem = F>, Ix1>,
) -> (usize, F) {
    let iterator = centroids.rows().into_iter();

    let first_centroid = centroids.row(0);
    let (mut closest_index, mut minimum_distance) = (
        0,
        dist_fn.rdistance(first_centroid.view(), observation.view()),
    );

    for (centroid_index, centroid) in iterator.enumerate() {
        let distance = dist_fn.rdistance(centroid.view(), observation.view());
        if distance < minimum_distance {
            closest_index = centroid_index;
            minimum_distance = distance;
        }
    }
    (closest_index, minimum_distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::L1Dist;
    use approx::assert_abs_diff_eq;
    use clusterlab::metrics::adjusted_rand_index;
    use clusterlab_datasets::generate;
    use ndarray::{array, concatenate, Array};
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;

    macro_rules! calc_memberships {
        ($dist:expr, $centroids:expr, $obs:expr) => {{
            let mut memberships = Array1::zeros($obs.nrows());
            update_cluster_memberships(&$dist, &$centroids, &$obs, &mut memberships);
            memberships
        }};
    }

    fn three_blobs(rng: &mut Xoshiro256Plus) -> (Array2<f64>, Array1<usize>) {
        let centers = array![[0., 10.], [10., 0.], [-10., -10.]];
        generate::make_blobs(300, &centers, &[1., 1., 1.], rng).unwrap()
    }

    #[test]
    fn test_min_dists() {
        let centroids = array![[0.0, 1.0], [40.0, 10.0]];
        let observations = array![[3.0, 4.0], [1.0, 3.0], [25.0, 15.0]];
        let mut dists = Array1::zeros(observations.nrows());

        update_min_dists(&L2Dist, &centroids, &observations, &mut dists);
        assert_abs_diff_eq!(dists, array![18.0, 5.0, 250.0]);
        update_min_dists(&L1Dist, &centroids, &observations, &mut dists);
        assert_abs_diff_eq!(dists, array![6.0, 3.0, 20.0]);
    }

    #[test]
    fn full_batch_recovers_blobs() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let (records, truth) = three_blobs(&mut rng);
        let dataset = DatasetBase::from(records.clone());
        let model = KMeans::params_with_rng(3, rng.clone())
            .fit(&dataset)
            .expect("KMeans fitted");
        let predicted = model.predict(&records);
        let ari = adjusted_rand_index(truth.as_slice().unwrap(), predicted.as_slice().unwrap());
        assert_abs_diff_eq!(ari.unwrap(), 1.0);
        assert_abs_diff_eq!(model.cluster_count().sum(), 300.);

        // inertia is the mean of the squared distances returned by `transform`
        let total_dist = model.transform(&records).sum();
        assert_abs_diff_eq!(model.inertia() * 300., total_dist, epsilon = 1e-8);
    }

    #[test]
    fn mini_batch_recovers_blobs() {
        let mut rng = Xoshiro256Plus::seed_from_u64(7);
        let (records, truth) = three_blobs(&mut rng);
        let dataset = DatasetBase::from(records.clone());
        for &batch_size in &[32, 1024] {
            let model = KMeans::params_with_rng(3, rng.clone())
                .batch_size(batch_size)
                .n_runs(3)
                .fit(&dataset)
                .expect("Mini-Batch KMeans fitted");
            let predicted = model.predict(DatasetBase::from(records.clone())).targets;
            let ari =
                adjusted_rand_index(truth.as_slice().unwrap(), predicted.as_slice().unwrap());
            assert_abs_diff_eq!(ari.unwrap(), 1.0);
        }
    }

    #[test]
    fn l1_kmeans_predicts_single_observation() {
        let mut rng = Xoshiro256Plus::seed_from_u64(3);
        let (records, _) = three_blobs(&mut rng);
        let dataset = DatasetBase::from(records.clone());
        let model = KMeans::params_with(3, rng, L1Dist)
            .fit(&dataset)
            .expect("KMeans fitted");
        let memberships = model.predict(&records);
        let single: usize = model.predict(&records.row(0));
        assert_eq!(single, memberships[0]);
    }

    #[test]
    fn too_few_samples() {
        let dataset = DatasetBase::from(array![[0., 0.], [1., 1.]]);
        let res = KMeans::params(3).fit(&dataset);
        assert!(matches!(
            res,
            Err(KMeansError::NotEnoughSamples {
                n_samples: 2,
                n_clusters: 3
            })
        ));
    }

    #[test]
    fn invalid_params_are_reported_on_fit() {
        let dataset = DatasetBase::from(array![[0., 0.], [1., 1.]]);
        let res = KMeans::params(1).tolerance(0.).fit(&dataset);
        assert!(matches!(res, Err(KMeansError::InvalidParams(_))));
    }

    #[test]
    fn compute_centroids_works() {
        let cluster_size = 100;
        let n_features = 4;
        let mut rng = Xoshiro256Plus::seed_from_u64(42);

        // Let's setup a synthetic set of observations, composed of two clusters with known means
        let cluster_1: Array2<f64> = Array::random_using(
            (cluster_size, n_features),
            Uniform::new(-100., 100.),
            &mut rng,
        );
        let memberships_1 = Array1::zeros(cluster_size);
        let expected_centroid_1 = cluster_1.sum_axis(Axis(0)) / (cluster_size + 1) as f64;

        let cluster_2: Array2<f64> = Array::random_using(
            (cluster_size, n_features),
            Uniform::new(-100., 100.),
            &mut rng,
        );
        let memberships_2 = Array1::ones(cluster_size);
        let expected_centroid_2 = cluster_2.sum_axis(Axis(0)) / (cluster_size + 1) as f64;

        let observations = concatenate(Axis(0), &[cluster_1.view(), cluster_2.view()]).unwrap();
        let memberships =
            concatenate(Axis(0), &[memberships_1.view(), memberships_2.view()]).unwrap();

        let old_centroids = Array2::zeros((2, n_features));
        let centroids = compute_centroids(&old_centroids, &observations, &memberships);
        assert_abs_diff_eq!(
            centroids.index_axis(Axis(0), 0),
            expected_centroid_1,
            epsilon = 1e-5
        );
        assert_abs_diff_eq!(
            centroids.index_axis(Axis(0), 1),
            expected_centroid_2,
            epsilon = 1e-5
        );

        assert_eq!(centroids.len_of(Axis(0)), 2);
    }

    #[test]
    fn test_compute_extra_centroids() {
        let observations = array![[1.0, 2.0]];
        let memberships = array![0];
        // Empty clusters keep their old centroid
        let old_centroids = Array2::ones((2, 2));
        let centroids = compute_centroids(&old_centroids, &observations, &memberships);
        assert_abs_diff_eq!(centroids, array![[1.0, 1.5], [1.0, 1.0]]);
    }

    #[test]
    // An observation is closest to itself.
    fn nothing_is_closer_than_self() {
        let n_centroids = 20;
        let n_features = 5;
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let centroids: Array2<f64> = Array::random_using(
            (n_centroids, n_features),
            Uniform::new(-100., 100.),
            &mut rng,
        );

        let expected_memberships = (0..n_centroids).collect::<Array1<_>>();
        assert_eq!(
            calc_memberships!(L2Dist, centroids, centroids),
            expected_memberships
        );
        assert_eq!(
            calc_memberships!(L1Dist, centroids, centroids),
            expected_memberships
        );
    }

    #[test]
    fn oracle_test_for_closest_centroid() {
        let centroids = array![[0., 0.], [1., 2.], [20., 0.], [0., 20.],];
        let observations = array![[1., 0.6], [20., 2.], [20., 0.], [7., 20.],];
        let l2_memberships = array![0, 2, 2, 3];
        let l1_memberships = array![1, 2, 2, 3];

        assert_eq!(
            calc_memberships!(L2Dist, centroids, observations),
            l2_memberships
        );
        assert_eq!(
            calc_memberships!(L1Dist, centroids, observations),
            l1_memberships
        );
    }

    #[test]
    fn test_compute_centroids_incremental() {
        let observations = array![[-1.0, -3.0], [0., 0.], [3., 5.], [5., 5.]];
        let memberships = array![0, 0, 1, 1];
        let centroids = array![[-1., -1.], [3., 4.], [7., 8.]];
        let mut counts = array![3.0, 0.0, 1.0];
        let centroids =
            compute_centroids_incremental(&observations, &memberships, &centroids, &mut counts);

        assert_abs_diff_eq!(centroids, array![[-4. / 5., -6. / 5.], [4., 5.], [7., 8.]]);
        assert_abs_diff_eq!(counts, array![5., 2., 1.]);
    }
}
