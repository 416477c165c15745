//! `clusterlab-nn` provides distance metrics and nearest neighbour indices for the `clusterlab`
//! workspace.
//!
//! ## The big picture
//!
//! Density based estimators such as DBSCAN and OPTICS, the MeanShift hill climbing and the
//! k-nearest-neighbours graphs of spectral and agglomerative clustering all ask the same two
//! questions of a batch of points: which points lie within some range of a query point, and
//! which are its `k` closest. An index built once over the batch answers both.
//!
//! ## Current state
//!
//! The following indices are provided:
//! * [Linear search](LinearSearch), which scans every point
//! * [KD tree](KdTree), backed by the `kdtree` crate
//! * [Ball tree](BallTree), nested bounding spheres
//!
//! Indices are built through the [`NearestNeighbour`] trait and queried through the
//! [`NearestNeighbourIndex`] trait. [`CommonNearestNeighbour`] picks one of them at runtime.
//!
//! Rows holding non-finite values are left out of every index and never returned by queries.
use std::cmp::Ordering;

use clusterlab::Float;
use ndarray::{ArrayBase, Data, Ix2};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};
use thiserror::Error;

mod balltree;
pub mod distance;
mod heap_elem;
mod kdtree;
mod linear;

pub use crate::balltree::*;
pub use crate::kdtree::*;
pub use crate::linear::*;
pub use distance::Point;

use distance::Distance;

/// Leaf size used by [`NearestNeighbour::from_batch`]
pub const DEFAULT_LEAF_SIZE: usize = 16;

/// Error returned when building an index from a batch of points
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("points have dimension of 0")]
    ZeroDimension,
    #[error("leaf size is 0")]
    EmptyLeaf,
    #[error("failed to insert point {index} into the tree: {reason}")]
    Insert { index: usize, reason: String },
}

/// Error returned when querying an index
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NnError {
    #[error("query point has dimension {got}, indexed points have dimension {expected}")]
    WrongDimension { expected: usize, got: usize },
    #[error("query point has non-finite coordinates")]
    NonFinite,
    #[error("tree query failed: {0}")]
    Query(String),
}

/// Nearest neighbour algorithm builds a spatial index structure out of a batch of points. The
/// distance between points is calculated using a provided distance function. The index
/// implements the [`NearestNeighbourIndex`] trait and allows for efficient computing of nearest
/// neighbour and range queries.
pub trait NearestNeighbour: std::fmt::Debug + Send + Sync + Unpin {
    /// Builds a spatial index using a MxN two-dimensional array representing M points with N
    /// dimensions. Also takes `leaf_size`, which specifies the number of points a leaf of the
    /// index holds.
    ///
    /// Returns an error if the points have dimensionality of 0 or if the leaf size is 0.
    fn from_batch_with_leaf_size<'a, F: Float, DT: Data<Elem = F>, D: 'a + Distance<F>>(
        &self,
        batch: &'a ArrayBase<DT, Ix2>,
        leaf_size: usize,
        dist_fn: D,
    ) -> Result<Box<dyn 'a + NearestNeighbourIndex<F>>, BuildError>;

    /// Builds a spatial index using a default leaf size. See `from_batch_with_leaf_size` for more
    /// information.
    fn from_batch<'a, F: Float, DT: Data<Elem = F>, D: 'a + Distance<F>>(
        &self,
        batch: &'a ArrayBase<DT, Ix2>,
        dist_fn: D,
    ) -> Result<Box<dyn 'a + NearestNeighbourIndex<F>>, BuildError> {
        self.from_batch_with_leaf_size(batch, DEFAULT_LEAF_SIZE, dist_fn)
    }
}

/// A spatial index structure over a set of points, created by `NearestNeighbour`. Allows efficient
/// computation of nearest neighbour and range queries over the set of points. Individual points
/// are represented as one-dimensional array views.
///
/// Results are sorted by increasing distance to the query, ties broken by index.
pub trait NearestNeighbourIndex<F: Float>: Send + Sync {
    /// Returns the `k` points in the index that are the closest to the provided point, along with
    /// their positions in the original batch. If there are fewer than `k` points in the index,
    /// then all of them are returned.
    fn k_nearest<'b>(
        &self,
        point: Point<'b, F>,
        k: usize,
    ) -> Result<Vec<(Point<F>, usize)>, NnError>;

    /// Returns all the points in the index that are within `range` of the provided point, along
    /// with their positions in the original batch. The range is inclusive.
    fn within_range<'b>(
        &self,
        point: Point<'b, F>,
        range: F,
    ) -> Result<Vec<(Point<F>, usize)>, NnError>;
}

/// Enum that dispatches to one of the crate's [`NearestNeighbour`] implementations based on
/// value. This enum should be used instead of using types like `LinearSearch` and `KdTree`
/// directly.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommonNearestNeighbour {
    /// Linear search
    LinearSearch,
    /// KD Tree
    KdTree,
    /// Ball Tree
    BallTree,
}

impl Default for CommonNearestNeighbour {
    fn default() -> Self {
        Self::KdTree
    }
}

impl NearestNeighbour for CommonNearestNeighbour {
    fn from_batch_with_leaf_size<'a, F: Float, DT: Data<Elem = F>, D: 'a + Distance<F>>(
        &self,
        batch: &'a ArrayBase<DT, Ix2>,
        leaf_size: usize,
        dist_fn: D,
    ) -> Result<Box<dyn 'a + NearestNeighbourIndex<F>>, BuildError> {
        match self {
            Self::LinearSearch => LinearSearch.from_batch_with_leaf_size(batch, leaf_size, dist_fn),
            Self::KdTree => KdTree.from_batch_with_leaf_size(batch, leaf_size, dist_fn),
            Self::BallTree => BallTree.from_batch_with_leaf_size(batch, leaf_size, dist_fn),
        }
    }
}

pub(crate) fn check_batch<F: Float>(
    batch: &ArrayBase<impl Data<Elem = F>, Ix2>,
    leaf_size: usize,
) -> Result<(), BuildError> {
    if leaf_size == 0 {
        Err(BuildError::EmptyLeaf)
    } else if batch.ncols() == 0 {
        Err(BuildError::ZeroDimension)
    } else {
        Ok(())
    }
}

pub(crate) fn check_query<F: Float>(point: &Point<F>, dim: usize) -> Result<(), NnError> {
    if point.len() != dim {
        Err(NnError::WrongDimension {
            expected: dim,
            got: point.len(),
        })
    } else if !is_finite(point) {
        Err(NnError::NonFinite)
    } else {
        Ok(())
    }
}

pub(crate) fn is_finite<F: Float>(point: &Point<F>) -> bool {
    point.iter().all(|x| x.is_finite())
}

// Sort `(rdist, index)` pairs by distance then index
pub(crate) fn sort_candidates<F: Float>(candidates: &mut [(F, usize)]) {
    candidates.sort_unstable_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(Ordering::Equal)
            .then(a.1.cmp(&b.1))
    });
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;
    use ndarray::{arr1, arr2, stack, Array2, Axis};
    use ndarray_rand::{rand::SeedableRng, rand_distr::Uniform, RandomExt};
    use rand_xoshiro::Xoshiro256Plus;

    use crate::distance::{L1Dist, L2Dist};

    use super::*;

    fn sort_by_dist<'a>(
        mut res: Vec<(Point<'a, f64>, usize)>,
        query: Point<f64>,
    ) -> Vec<(Point<'a, f64>, usize)> {
        res.sort_by(|(a, i), (b, j)| {
            let da = L2Dist.rdistance(*a, query);
            let db = L2Dist.rdistance(*b, query);
            da.partial_cmp(&db).unwrap().then(i.cmp(j))
        });
        res
    }

    fn points(res: &[(Point<f64>, usize)]) -> Array2<f64> {
        let views: Vec<_> = res.iter().map(|(p, _)| p.view()).collect();
        stack(Axis(0), &views).unwrap()
    }

    fn nn_test(builder: &CommonNearestNeighbour) {
        let batch = arr2(&[[0.0, 2.0], [10.0, 4.0], [4.0, 5.0], [7.0, 1.0], [1.0, 7.2]]);
        let nn = builder
            .from_batch_with_leaf_size(&batch, 2, L2Dist)
            .unwrap();

        let out = nn.k_nearest(arr1(&[0.0, 1.0]).view(), 2).unwrap();
        assert_abs_diff_eq!(points(&out), arr2(&[[0.0, 2.0], [4.0, 5.0]]));
        assert_eq!(out.iter().map(|(_, i)| *i).collect::<Vec<_>>(), vec![0, 2]);

        let out = nn.k_nearest(arr1(&[4.0, 4.0]).view(), 3).unwrap();
        assert_abs_diff_eq!(points(&out), arr2(&[[4.0, 5.0], [7.0, 1.0], [1.0, 7.2]]));

        // more neighbours than points
        let out = nn.k_nearest(arr1(&[0.0, 0.0]).view(), 10).unwrap();
        assert_eq!(out.len(), 5);

        let out = nn.within_range(arr1(&[4.0, 4.0]).view(), 4.3).unwrap();
        assert_eq!(out.iter().map(|(_, i)| *i).collect::<Vec<_>>(), vec![2, 3]);

        // the range is inclusive
        let out = nn.within_range(arr1(&[4.0, 2.0]).view(), 3.0).unwrap();
        assert_eq!(out.iter().map(|(_, i)| *i).collect::<Vec<_>>(), vec![2]);
        let out = nn.within_range(arr1(&[0.0, 2.0]).view(), 0.0).unwrap();
        assert_eq!(out.iter().map(|(_, i)| *i).collect::<Vec<_>>(), vec![0]);

        let out = nn
            .within_range(arr1(&[0.0, 0.0]).view(), f64::INFINITY)
            .unwrap();
        assert_eq!(out.len(), 5);

        assert_eq!(
            nn.k_nearest(arr1(&[0.0]).view(), 1).unwrap_err(),
            NnError::WrongDimension {
                expected: 2,
                got: 1
            }
        );
        assert_eq!(
            nn.within_range(arr1(&[f64::NAN, 0.0]).view(), 1.0)
                .unwrap_err(),
            NnError::NonFinite
        );
    }

    fn random_agreement_test(builder: &CommonNearestNeighbour) {
        let mut rng = Xoshiro256Plus::seed_from_u64(40);
        let batch = Array2::random_using((300, 3), Uniform::new(-20., 20.), &mut rng);
        let queries = Array2::random_using((30, 3), Uniform::new(-25., 25.), &mut rng);
        let linear = LinearSearch.from_batch(&batch, L2Dist).unwrap();
        let nn = builder.from_batch(&batch, L2Dist).unwrap();

        for query in queries.rows() {
            let expected = sort_by_dist(linear.k_nearest(query, 7).unwrap(), query);
            let found = sort_by_dist(nn.k_nearest(query, 7).unwrap(), query);
            assert_eq!(
                found.iter().map(|(_, i)| *i).collect::<Vec<_>>(),
                expected.iter().map(|(_, i)| *i).collect::<Vec<_>>()
            );

            let expected = linear.within_range(query, 9.0).unwrap();
            let found = nn.within_range(query, 9.0).unwrap();
            assert_eq!(
                found.iter().map(|(_, i)| *i).collect::<Vec<_>>(),
                expected.iter().map(|(_, i)| *i).collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn linear_search() {
        nn_test(&CommonNearestNeighbour::LinearSearch);
    }

    #[test]
    fn kdtree() {
        nn_test(&CommonNearestNeighbour::KdTree);
        random_agreement_test(&CommonNearestNeighbour::KdTree);
    }

    #[test]
    fn balltree() {
        nn_test(&CommonNearestNeighbour::BallTree);
        random_agreement_test(&CommonNearestNeighbour::BallTree);
    }

    #[test]
    fn manhattan_range_queries() {
        let batch = arr2(&[[0.0, 0.0], [0.6, 0.6], [1.0, 0.0], [5.0, 5.0]]);
        for algo in [
            CommonNearestNeighbour::LinearSearch,
            CommonNearestNeighbour::KdTree,
            CommonNearestNeighbour::BallTree,
        ] {
            let nn = algo.from_batch_with_leaf_size(&batch, 1, L1Dist).unwrap();
            let out = nn.within_range(batch.row(0), 1.0).unwrap();
            // (0.6, 0.6) lies 1.2 away in L1
            assert_eq!(
                out.iter().map(|(_, i)| *i).collect::<Vec<_>>(),
                vec![0, 2],
                "{:?}",
                algo
            );
        }
    }

    #[test]
    fn non_finite_rows_are_skipped() {
        let batch = arr2(&[[0.0, 0.0], [f64::NAN, 1.0], [1.0, f64::INFINITY], [2.0, 0.0]]);
        for algo in [
            CommonNearestNeighbour::LinearSearch,
            CommonNearestNeighbour::KdTree,
            CommonNearestNeighbour::BallTree,
        ] {
            let nn = algo.from_batch(&batch, L2Dist).unwrap();
            let out = nn.k_nearest(batch.row(0), 4).unwrap();
            assert_eq!(
                out.iter().map(|(_, i)| *i).collect::<Vec<_>>(),
                vec![0, 3],
                "{:?}",
                algo
            );
            let out = nn.within_range(batch.row(0), f64::INFINITY).unwrap();
            assert_eq!(out.len(), 2);
        }
    }

    #[test]
    fn build_errors() {
        let batch = Array2::<f64>::zeros((4, 0));
        for algo in [
            CommonNearestNeighbour::LinearSearch,
            CommonNearestNeighbour::KdTree,
            CommonNearestNeighbour::BallTree,
        ] {
            assert_eq!(
                algo.from_batch(&batch, L2Dist).err(),
                Some(BuildError::ZeroDimension)
            );
            assert_eq!(
                algo.from_batch_with_leaf_size(&arr2(&[[1.0]]), 0, L2Dist)
                    .err(),
                Some(BuildError::EmptyLeaf)
            );
        }
    }

    #[test]
    fn empty_batch() {
        let batch = Array2::<f64>::zeros((0, 2));
        for algo in [
            CommonNearestNeighbour::LinearSearch,
            CommonNearestNeighbour::KdTree,
            CommonNearestNeighbour::BallTree,
        ] {
            let nn = algo.from_batch(&batch, L2Dist).unwrap();
            assert!(nn.k_nearest(arr1(&[0.0, 0.0]).view(), 3).unwrap().is_empty());
            assert!(nn.within_range(arr1(&[0.0, 0.0]).view(), 1.0).unwrap().is_empty());
        }
    }
}
