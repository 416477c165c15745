use std::cmp::Ordering;
use std::collections::BinaryHeap;

use clusterlab::Float;
use ndarray::{Array1, ArrayBase, ArrayView2, Data, Ix2};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::{
    check_batch, check_query,
    distance::Distance,
    heap_elem::{MaxHeapElem, MinHeapElem},
    is_finite, sort_candidates, BuildError, NearestNeighbour, NearestNeighbourIndex, NnError,
    Point,
};

// Partition the points using the median value of the dimension with the largest spread
fn partition<F: Float>(
    mut points: Vec<(Point<F>, usize)>,
) -> (Vec<(Point<F>, usize)>, Vec<(Point<F>, usize)>) {
    debug_assert!(points.len() >= 2);

    // Spread of a dimension is measured using range, which is suceptible to skew. It may be better
    // to use STD or variance.
    let max_spread_dim = (0..points[0].0.len())
        .map(|dim| {
            let (min, max) = points
                .iter()
                .fold((F::infinity(), F::neg_infinity()), |(min, max), (p, _)| {
                    (min.min(p[dim]), max.max(p[dim]))
                });
            (dim, max - min)
        })
        .fold((0, F::neg_infinity()), |best, cur| {
            if cur.1 > best.1 {
                cur
            } else {
                best
            }
        })
        .0;

    let mid = points.len() / 2;
    // Compute median on the chosen dimension in linear time
    order_stat::kth_by(&mut points, mid, |(p1, _), (p2, _)| {
        p1[max_spread_dim]
            .partial_cmp(&p2[max_spread_dim])
            .unwrap_or(Ordering::Equal)
    });
    // Splitting at the median position keeps both halves non-empty even with degenerate data
    let right = points.split_off(mid);
    (points, right)
}

fn centroid<F: Float>(points: &[(Point<F>, usize)]) -> Array1<F> {
    let mut center = Array1::zeros(points[0].0.len());
    for (p, _) in points {
        center += p;
    }
    center / F::cast(points.len())
}

#[derive(Debug, PartialEq)]
enum BallTreeInner<'a, F: Float> {
    Leaf {
        center: Array1<F>,
        radius: F,
        points: Vec<(Point<'a, F>, usize)>,
    },
    // The sphere is a bounding sphere that encompasses this node (both children)
    Branch {
        center: Array1<F>,
        radius: F,
        left: Box<BallTreeInner<'a, F>>,
        right: Box<BallTreeInner<'a, F>>,
    },
}

impl<'a, F: Float> BallTreeInner<'a, F> {
    fn new<D: Distance<F>>(
        points: Vec<(Point<'a, F>, usize)>,
        leaf_size: usize,
        dist_fn: &D,
    ) -> Self {
        let center = centroid(&points);
        let radius = points
            .iter()
            .map(|(p, _)| dist_fn.distance(center.view(), p.view()))
            .fold(F::zero(), F::max);

        if points.len() <= leaf_size {
            BallTreeInner::Leaf {
                center,
                radius,
                points,
            }
        } else {
            let (aps, bps) = partition(points);
            debug_assert!(!aps.is_empty() && !bps.is_empty());
            BallTreeInner::Branch {
                center,
                radius,
                left: Box::new(BallTreeInner::new(aps, leaf_size, dist_fn)),
                right: Box::new(BallTreeInner::new(bps, leaf_size, dist_fn)),
            }
        }
    }

    // Lower bound of the distance between `p` and any point inside the bounding sphere
    fn lower_bound<D: Distance<F>>(&self, p: &Point<F>, dist_fn: &D) -> F {
        let (center, radius) = match self {
            BallTreeInner::Leaf { center, radius, .. } => (center, *radius),
            BallTreeInner::Branch { center, radius, .. } => (center, *radius),
        };
        let to_center = dist_fn.distance(p.view(), center.view());
        // Leave some slack for the rounding of the subtraction, points are checked exactly
        // once a leaf is reached
        let slack = (to_center + radius) * F::epsilon() * F::cast(4.);
        F::max(to_center - radius - slack, F::zero())
    }
}

/// Spatial indexing structure created by [`BallTree`]
#[derive(Debug, PartialEq)]
pub struct BallTreeIndex<'a, F: Float, D: Distance<F>> {
    tree: Option<BallTreeInner<'a, F>>,
    batch: ArrayView2<'a, F>,
    dist_fn: D,
}

impl<'a, F: Float, D: Distance<F>> BallTreeIndex<'a, F, D> {
    /// Creates a `BallTreeIndex` using the K-D construction algorithm
    pub fn new<DT: Data<Elem = F>>(
        batch: &'a ArrayBase<DT, Ix2>,
        leaf_size: usize,
        dist_fn: D,
    ) -> Result<Self, BuildError> {
        check_batch(batch, leaf_size)?;
        let points: Vec<_> = batch
            .rows()
            .into_iter()
            .enumerate()
            .filter(|(_, row)| is_finite(row))
            .map(|(i, row)| (row, i))
            .collect();
        let tree = if points.is_empty() {
            None
        } else {
            Some(BallTreeInner::new(points, leaf_size, &dist_fn))
        };
        Ok(BallTreeIndex {
            tree,
            batch: batch.view(),
            dist_fn,
        })
    }

    // `(distance, index)` of every point within `range`
    fn range_candidates(&self, point: &Point<F>, range: F) -> Vec<(F, usize)> {
        let mut found = Vec::new();
        let mut stack: Vec<&BallTreeInner<F>> = self.tree.iter().collect();
        while let Some(node) = stack.pop() {
            if node.lower_bound(point, &self.dist_fn) > range {
                continue;
            }
            match node {
                BallTreeInner::Leaf { points, .. } => {
                    for (p, i) in points {
                        let dist = self.dist_fn.distance(point.view(), p.view());
                        if dist <= range {
                            found.push((dist, *i));
                        }
                    }
                }
                BallTreeInner::Branch { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        sort_candidates(&mut found);
        found
    }

    fn kth_distance(&self, point: &Point<F>, k: usize) -> Option<F> {
        let root = self.tree.as_ref()?;
        // Max-heap of the best k points found so far, min-heap of nodes left to visit
        let mut best = BinaryHeap::with_capacity(k + 1);
        let mut queue = BinaryHeap::new();
        queue.push(MinHeapElem::new(root.lower_bound(point, &self.dist_fn), root));

        while let Some(node) = queue.pop() {
            let bound = node.dist.0.raw();
            let worst = best.peek().map(|e: &MaxHeapElem<F, usize>| e.dist.raw());
            match worst {
                Some(worst) if best.len() == k && bound > worst => break,
                _ => {}
            }
            match node.elem {
                BallTreeInner::Leaf { points, .. } => {
                    for (p, i) in points {
                        let dist = self.dist_fn.distance(point.view(), p.view());
                        if !dist.is_finite() {
                            continue;
                        }
                        best.push(MaxHeapElem::new(dist, *i));
                        if best.len() > k {
                            best.pop();
                        }
                    }
                }
                BallTreeInner::Branch { left, right, .. } => {
                    for child in [left, right] {
                        let bound = child.lower_bound(point, &self.dist_fn);
                        if bound.is_finite() {
                            queue.push(MinHeapElem::new(bound, &**child));
                        }
                    }
                }
            }
        }
        best.peek().map(|e| e.dist.raw())
    }

    fn to_points(&self, found: Vec<(F, usize)>) -> Vec<(Point<F>, usize)> {
        found
            .into_iter()
            .map(|(_, i)| (self.batch.row(i), i))
            .collect()
    }
}

impl<'a, F: Float, D: Distance<F>> NearestNeighbourIndex<F> for BallTreeIndex<'a, F, D> {
    fn k_nearest<'b>(
        &self,
        point: Point<'b, F>,
        k: usize,
    ) -> Result<Vec<(Point<F>, usize)>, NnError> {
        check_query(&point, self.batch.ncols())?;
        if k == 0 {
            return Ok(Vec::new());
        }
        // The k-th distance bounds a range query, so that ties go to the lowest index
        let mut found = match self.kth_distance(&point, k) {
            Some(kth) => self.range_candidates(&point, kth),
            None => Vec::new(),
        };
        found.truncate(k);
        Ok(self.to_points(found))
    }

    fn within_range<'b>(
        &self,
        point: Point<'b, F>,
        range: F,
    ) -> Result<Vec<(Point<F>, usize)>, NnError> {
        check_query(&point, self.batch.ncols())?;
        let found = self.range_candidates(&point, range);
        Ok(self.to_points(found))
    }
}

/// Implementation of ball tree, a space partitioning data structure that partitions its points
/// into nested hyperspheres called "balls". It performs spatial queries in `O(k * logN)` time,
/// where `k` is the number of points returned by the query. Calling `from_batch` returns a
/// [`BallTreeIndex`].
///
/// Pruning relies on the triangle inequality, so the distance function has to be a true
/// metric. More details can be found [here](https://en.wikipedia.org/wiki/Ball_tree).
#[derive(Default, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct BallTree;

impl BallTree {
    /// Creates an instance of `BallTree`
    pub fn new() -> Self {
        Self
    }
}

impl NearestNeighbour for BallTree {
    fn from_batch_with_leaf_size<'a, F: Float, DT: Data<Elem = F>, D: 'a + Distance<F>>(
        &self,
        batch: &'a ArrayBase<DT, Ix2>,
        leaf_size: usize,
        dist_fn: D,
    ) -> Result<Box<dyn 'a + NearestNeighbourIndex<F>>, BuildError> {
        BallTreeIndex::new(batch, leaf_size, dist_fn).map(|v| Box::new(v) as Box<_>)
    }
}
