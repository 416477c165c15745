use clusterlab::Float;
use ndarray::{aview1, ArrayBase, ArrayView2, Data, Ix2};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::{
    check_batch, check_query, distance::Distance, is_finite, sort_candidates, BuildError,
    NearestNeighbour, NearestNeighbourIndex, NnError, Point,
};

/// Spatial indexing structure created by [`KdTree`]
pub struct KdTreeIndex<'a, F: Float, D: Distance<F>> {
    tree: ::kdtree::KdTree<F, usize, Vec<F>>,
    batch: ArrayView2<'a, F>,
    dist_fn: D,
}

impl<'a, F: Float, D: Distance<F>> KdTreeIndex<'a, F, D> {
    /// Creates a new `KdTreeIndex`
    pub fn new<DT: Data<Elem = F>>(
        batch: &'a ArrayBase<DT, Ix2>,
        leaf_size: usize,
        dist_fn: D,
    ) -> Result<Self, BuildError> {
        check_batch(batch, leaf_size)?;
        let mut tree = ::kdtree::KdTree::with_capacity(batch.ncols(), leaf_size);
        for (index, row) in batch.rows().into_iter().enumerate() {
            if !is_finite(&row) {
                continue;
            }
            tree.add(row.to_vec(), index).map_err(|e| BuildError::Insert {
                index,
                reason: format!("{:?}", e),
            })?;
        }
        Ok(Self {
            tree,
            batch: batch.view(),
            dist_fn,
        })
    }

    // The tree compares reduced distances
    fn rdist(&self, a: &[F], b: &[F]) -> F {
        self.dist_fn.rdistance(aview1(a), aview1(b))
    }

    fn query_within(&self, point: &[F], rrange: F) -> Result<Vec<(F, usize)>, NnError> {
        let dist = |a: &[F], b: &[F]| self.rdist(a, b);
        let mut found: Vec<_> = self
            .tree
            .within(point, rrange, &dist)
            .map_err(|e| NnError::Query(format!("{:?}", e)))?
            .into_iter()
            .filter(|&(d, _)| d <= rrange)
            .map(|(d, &i)| (d, i))
            .collect();
        sort_candidates(&mut found);
        Ok(found)
    }

    fn to_points(&self, found: Vec<(F, usize)>) -> Vec<(Point<F>, usize)> {
        found
            .into_iter()
            .map(|(_, i)| (self.batch.row(i), i))
            .collect()
    }
}

impl<'a, F: Float, D: Distance<F>> NearestNeighbourIndex<F> for KdTreeIndex<'a, F, D> {
    fn k_nearest<'b>(
        &self,
        point: Point<'b, F>,
        k: usize,
    ) -> Result<Vec<(Point<F>, usize)>, NnError> {
        check_query(&point, self.batch.ncols())?;
        if k == 0 || self.tree.size() == 0 {
            return Ok(Vec::new());
        }
        let point = point.to_vec();
        let dist = |a: &[F], b: &[F]| self.rdist(a, b);
        let nearest = self
            .tree
            .nearest(&point, k, &dist)
            .map_err(|e| NnError::Query(format!("{:?}", e)))?;
        // Re-run as a range query up to the k-th distance so that ties go to the lowest index
        let kth = nearest.iter().map(|&(d, _)| d).fold(F::zero(), F::max);
        let mut found = self.query_within(&point, kth)?;
        found.truncate(k);
        Ok(self.to_points(found))
    }

    fn within_range<'b>(
        &self,
        point: Point<'b, F>,
        range: F,
    ) -> Result<Vec<(Point<F>, usize)>, NnError> {
        check_query(&point, self.batch.ncols())?;
        if self.tree.size() == 0 {
            return Ok(Vec::new());
        }
        let found = self.query_within(&point.to_vec(), self.dist_fn.dist_to_rdist(range))?;
        Ok(self.to_points(found))
    }
}

/// Implementation of K-D tree, a fast space-partitioning data structure. For each parent node,
/// the indexed points are split with a hyperplane into two child nodes. Due to its tree-like
/// structure, the K-D tree performs spatial queries in `O(k * logN)` time, where `k` is the
/// number of points returned by the query. Calling `from_batch` returns a [`KdTreeIndex`].
///
/// More details can be found [here](https://en.wikipedia.org/wiki/K-d_tree).
///
/// Unlike other `NearestNeighbour` implementations, `KdTree` requires that points be laid out
/// contiguously in memory, so every point is copied into the tree.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct KdTree;

impl KdTree {
    /// Creates an instance of `KdTree`
    pub fn new() -> Self {
        Self
    }
}

impl NearestNeighbour for KdTree {
    fn from_batch_with_leaf_size<'a, F: Float, DT: Data<Elem = F>, D: 'a + Distance<F>>(
        &self,
        batch: &'a ArrayBase<DT, Ix2>,
        leaf_size: usize,
        dist_fn: D,
    ) -> Result<Box<dyn 'a + NearestNeighbourIndex<F>>, BuildError> {
        KdTreeIndex::new(batch, leaf_size, dist_fn).map(|v| Box::new(v) as Box<_>)
    }
}

#[cfg(test)]
mod test {
    use ndarray::{arr1, arr2};

    use crate::distance::L2Dist;

    use super::*;

    #[test]
    fn duplicate_points_keep_their_indices() {
        let batch = arr2(&[[1.0, 1.0], [0.0, 0.0], [1.0, 1.0], [1.0, 1.0], [5.0, 5.0]]);
        let nn = KdTreeIndex::new(&batch, 1, L2Dist).unwrap();
        let out = nn.k_nearest(arr1(&[1.0, 1.0]).view(), 2).unwrap();
        assert_eq!(out.iter().map(|(_, i)| *i).collect::<Vec<_>>(), vec![0, 2]);

        let out = nn.within_range(arr1(&[1.0, 1.0]).view(), 0.0).unwrap();
        assert_eq!(
            out.iter().map(|(_, i)| *i).collect::<Vec<_>>(),
            vec![0, 2, 3]
        );
    }

    #[test]
    fn non_contiguous_batch() {
        let batch = arr2(&[[0.0, 9.0, 1.0], [3.0, 9.0, 4.0], [0.5, 9.0, 0.5]]);
        let view = batch.slice(ndarray::s![.., ..;2]);
        let nn = KdTreeIndex::new(&view, 2, L2Dist).unwrap();
        let out = nn.k_nearest(arr1(&[0.0, 0.0]).view(), 1).unwrap();
        assert_eq!(out[0].1, 2);
        assert_eq!(out[0].0, arr1(&[0.5, 0.5]));
    }
}
