use std::collections::BinaryHeap;

use clusterlab::Float;
use ndarray::{ArrayBase, ArrayView2, Data, Ix2};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::{
    check_batch, check_query, distance::Distance, heap_elem::MaxHeapElem, is_finite,
    sort_candidates, BuildError, NearestNeighbour, NearestNeighbourIndex, NnError, Point,
};

/// Spatial indexing structure created by [`LinearSearch`]
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSearchIndex<'a, F: Float, D: Distance<F>> {
    batch: ArrayView2<'a, F>,
    dist_fn: D,
}

impl<'a, F: Float, D: Distance<F>> LinearSearchIndex<'a, F, D> {
    /// Creates a new `LinearSearchIndex`. Unlike the tree indices this never fails.
    pub fn new<DT: Data<Elem = F>>(batch: &'a ArrayBase<DT, Ix2>, dist_fn: D) -> Self {
        Self {
            batch: batch.view(),
            dist_fn,
        }
    }

    // Finite rows with their reduced distance to `point`
    fn candidates<'s, 'p>(
        &'s self,
        point: Point<'p, F>,
    ) -> impl Iterator<Item = (F, usize)> + use<'s, 'p, 'a, F, D> {
        self.batch
            .rows()
            .into_iter()
            .enumerate()
            .filter(|(_, row)| is_finite(row))
            .map(move |(i, row)| (self.dist_fn.rdistance(point, row), i))
    }
}

impl<'a, F: Float, D: Distance<F>> NearestNeighbourIndex<F> for LinearSearchIndex<'a, F, D> {
    fn k_nearest<'b>(
        &self,
        point: Point<'b, F>,
        k: usize,
    ) -> Result<Vec<(Point<F>, usize)>, NnError> {
        check_query(&point, self.batch.ncols())?;
        if k == 0 {
            return Ok(Vec::new());
        }

        // Max-heap holding the k best candidates seen so far
        let mut heap = BinaryHeap::with_capacity(k + 1);
        for (dist, i) in self.candidates(point) {
            if !dist.is_finite() {
                continue;
            }
            heap.push(MaxHeapElem::new(dist, i));
            if heap.len() > k {
                heap.pop();
            }
        }
        let mut found: Vec<_> = heap.into_iter().map(|e| (e.dist.raw(), e.elem)).collect();
        sort_candidates(&mut found);
        // Equal distances straddling the k-th place go to the lowest index
        let kth = found.last().map(|&(d, _)| d);
        if let Some(kth) = kth {
            let mut tied: Vec<_> = self.candidates(point).filter(|&(d, _)| d <= kth).collect();
            sort_candidates(&mut tied);
            tied.truncate(k);
            found = tied;
        }
        Ok(found
            .into_iter()
            .map(|(_, i)| (self.batch.row(i), i))
            .collect())
    }

    fn within_range<'b>(
        &self,
        point: Point<'b, F>,
        range: F,
    ) -> Result<Vec<(Point<F>, usize)>, NnError> {
        check_query(&point, self.batch.ncols())?;
        let range = self.dist_fn.dist_to_rdist(range);
        let mut found: Vec<_> = self
            .candidates(point)
            .filter(|&(d, _)| d <= range)
            .collect();
        sort_candidates(&mut found);
        Ok(found
            .into_iter()
            .map(|(_, i)| (self.batch.row(i), i))
            .collect())
    }
}

/// Implementation of linear search, which is the simplest nearest neighbour algorithm. All
/// queries are implemented by scanning through every point, so all of them are `O(N)`. Calling
/// `from_batch` returns a [`LinearSearchIndex`].
#[derive(Default, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct LinearSearch;

impl LinearSearch {
    /// Creates an instance of `LinearSearch`
    pub fn new() -> Self {
        Self
    }
}

impl NearestNeighbour for LinearSearch {
    fn from_batch_with_leaf_size<'a, F: Float, DT: Data<Elem = F>, D: 'a + Distance<F>>(
        &self,
        batch: &'a ArrayBase<DT, Ix2>,
        leaf_size: usize,
        dist_fn: D,
    ) -> Result<Box<dyn 'a + NearestNeighbourIndex<F>>, BuildError> {
        check_batch(batch, leaf_size)?;
        Ok(Box::new(LinearSearchIndex::new(batch, dist_fn)))
    }
}
