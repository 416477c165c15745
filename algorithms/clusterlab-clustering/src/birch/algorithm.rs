use crate::birch::cf_tree::{Node, Subcluster};
use crate::birch::{BirchError, BirchParams, BirchValidParams};
use crate::distance::Metric;
use crate::hierarchical::{agglomerate, Linkage};
use clusterlab::traits::{Fit, Predict};
use clusterlab::{DatasetBase, Float};
use ndarray::{Array1, Array2, ArrayBase, Data, Ix2};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// BIRCH (Balanced Iterative Reducing and Clustering using Hierarchies) compresses the samples
/// into a tree of *subclusters* in a single pass, then clusters the subclusters instead of the
/// samples.
///
/// ## The algorithm
///
/// Every sample descends the clustering feature tree towards the closest subcluster. At a leaf
/// it is absorbed by the closest subcluster if the radius of the union stays within
/// `threshold`, otherwise it starts a new subcluster. A node holding more than
/// `branching_factor` subclusters is split in two around its farthest pair, which may
/// propagate up to the root and grow the tree.
///
/// The centroids of the leaf subclusters are then grouped into `n_clusters` clusters with Ward
/// agglomerative clustering. Samples are labelled by their closest subcluster.
///
/// ## Tutorial
///
/// ```
/// use clusterlab::DatasetBase;
/// use clusterlab::traits::{Fit, Predict};
/// use clusterlab_clustering::Birch;
/// use ndarray::array;
///
/// let records = array![[0., 0.], [0.3, 0.], [5., 5.], [5.3, 5.], [10., 0.], [10.3, 0.]];
/// let model = Birch::params()
///     .fit(&DatasetBase::from(records))
///     .unwrap();
///
/// assert_eq!(model.subcluster_centers().nrows(), 3);
/// assert_eq!(model.labels(), &array![0, 0, 1, 1, 2, 2]);
/// assert_eq!(model.predict(&array![[9., 1.]]), array![2]);
/// ```
pub struct Birch<F> {
    subcluster_centers: Array2<F>,
    subcluster_labels: Array1<usize>,
    labels: Array1<usize>,
}

impl<F: Float> Birch<F> {
    pub fn params() -> BirchParams<F> {
        BirchParams::new()
    }

    /// Centroids of the leaf subclusters
    pub fn subcluster_centers(&self) -> &Array2<F> {
        &self.subcluster_centers
    }

    /// Cluster of every leaf subcluster
    pub fn subcluster_labels(&self) -> &Array1<usize> {
        &self.subcluster_labels
    }

    /// Cluster of every training sample
    pub fn labels(&self) -> &Array1<usize> {
        &self.labels
    }

    fn assign(&self, observations: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Array1<usize> {
        observations
            .rows()
            .into_iter()
            .map(|row| {
                let closest = self
                    .subcluster_centers
                    .rows()
                    .into_iter()
                    .map(|center| {
                        row.iter()
                            .zip(center.iter())
                            .map(|(&x, &c)| (x - c) * (x - c))
                            .sum::<F>()
                    })
                    .enumerate()
                    .fold((0, F::infinity()), |best, (i, d)| {
                        if d < best.1 {
                            (i, d)
                        } else {
                            best
                        }
                    })
                    .0;
                self.subcluster_labels[closest]
            })
            .collect()
    }
}

impl<F: Float, DA: Data<Elem = F>, T> Fit<ArrayBase<DA, Ix2>, T, BirchError>
    for BirchValidParams<F>
{
    type Object = Birch<F>;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<DA, Ix2>, T>) -> Result<Birch<F>, BirchError> {
        let records = dataset.records();
        if records.nrows() == 0 {
            return Err(BirchError::NotEnoughSamples);
        }

        let mut root = Node::leaf();
        for sample in records.rows() {
            let split = root.insert(
                Subcluster::from_sample(sample),
                self.threshold(),
                self.branching_factor(),
            );
            if split {
                let (first, second) = root.split();
                root = Node::grow(first, second);
            }
        }

        let leaves = root.leaves();
        let n_features = records.ncols();
        let mut subcluster_centers = Array2::zeros((leaves.len(), n_features));
        for (mut row, sc) in subcluster_centers.rows_mut().into_iter().zip(&leaves) {
            row.assign(sc.centroid());
        }
        log::debug!(
            "BIRCH summarised {} samples in {} subclusters",
            leaves.iter().map(|sc| sc.n_samples()).sum::<usize>(),
            leaves.len()
        );

        let subcluster_labels = match self.n_clusters() {
            Some(n_clusters) if leaves.len() < n_clusters => {
                log::warn!(
                    "Number of subclusters found ({}) by BIRCH is less than ({}). Decrease the threshold.",
                    leaves.len(),
                    n_clusters
                );
                Array1::from_iter(0..leaves.len())
            }
            Some(n_clusters) => agglomerate(
                subcluster_centers.view(),
                n_clusters,
                Linkage::Ward,
                Metric::L2,
                None,
            )
            .labels()
            .clone(),
            None => Array1::from_iter(0..leaves.len()),
        };

        let mut model = Birch {
            subcluster_centers,
            subcluster_labels,
            labels: Array1::zeros(0),
        };
        model.labels = model.assign(records);
        Ok(model)
    }
}

impl<F: Float, DA: Data<Elem = F>> Predict<&ArrayBase<DA, Ix2>, Array1<usize>> for Birch<F> {
    /// Label of the closest subcluster
    fn predict(&self, observations: &ArrayBase<DA, Ix2>) -> Array1<usize> {
        self.assign(observations)
    }
}

impl<F: Float, DA: Data<Elem = F>, T>
    Predict<DatasetBase<ArrayBase<DA, Ix2>, T>, DatasetBase<ArrayBase<DA, Ix2>, Array1<usize>>>
    for Birch<F>
{
    fn predict(
        &self,
        dataset: DatasetBase<ArrayBase<DA, Ix2>, T>,
    ) -> DatasetBase<ArrayBase<DA, Ix2>, Array1<usize>> {
        let labels = self.assign(dataset.records());
        dataset.with_targets(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use clusterlab::metrics::adjusted_rand_index;
    use clusterlab::ParamGuard;
    use clusterlab_datasets::generate;
    use ndarray::array;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<Birch<f64>>();
        has_autotraits::<BirchParams<f64>>();
        has_autotraits::<BirchError>();
    }

    #[test]
    fn recovers_blobs() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let centers = array![[0., 0.], [6., 6.], [-6., 6.]];
        let (records, truth) =
            generate::make_blobs(300, &centers, &[0.4, 0.4, 0.4], &mut rng).unwrap();
        let model = Birch::params()
            .fit(&DatasetBase::from(records.clone()))
            .unwrap();

        let ari = adjusted_rand_index(
            truth.as_slice().unwrap(),
            model.labels().as_slice().unwrap(),
        )
        .unwrap();
        assert_abs_diff_eq!(ari, 1., epsilon = 1e-12);
        assert_eq!(&model.predict(&records), model.labels());
    }

    #[test]
    fn small_branching_factor_keeps_all_samples() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1);
        let records = generate::uniform(200, 2, &mut rng);
        let model = Birch::params()
            .threshold(0.05)
            .branching_factor(3)
            .n_clusters(None)
            .fit(&DatasetBase::from(records.clone()))
            .unwrap();

        let n_subclusters = model.subcluster_centers().nrows();
        assert!(n_subclusters > 3);
        assert_eq!(model.labels().len(), 200);
        assert!(model.labels().iter().all(|&l| l < n_subclusters));
        assert_eq!(
            model.subcluster_labels(),
            &Array1::from_iter(0..n_subclusters)
        );
    }

    #[test]
    fn few_subclusters_keep_identity_labels() {
        let records = array![[0., 0.], [0.1, 0.], [5., 5.]];
        let model = Birch::params()
            .n_clusters(Some(3))
            .fit(&DatasetBase::from(records))
            .unwrap();
        assert_eq!(model.subcluster_centers().nrows(), 2);
        assert_eq!(model.subcluster_labels(), &array![0, 1]);
        assert_eq!(model.labels(), &array![0, 0, 1]);
    }

    #[test]
    fn empty_input() {
        let records = Array2::<f64>::zeros((0, 2));
        let res = Birch::params()
            .check_unwrap()
            .fit(&DatasetBase::from(records));
        assert!(matches!(res, Err(BirchError::NotEnoughSamples)));
    }
}
