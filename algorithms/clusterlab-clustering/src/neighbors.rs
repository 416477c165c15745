//! Neighbourhood queries and the sparse graphs built from them
//!
//! Queries go through a [`clusterlab_nn`] index built once over the records. Graphs are returned
//! as CSR matrices with one row per sample.
use std::collections::VecDeque;

use clusterlab::Float;
use clusterlab_nn::{
    CommonNearestNeighbour, LinearSearchIndex, NearestNeighbour, NearestNeighbourIndex, NnError,
};
use ndarray::{Array1, Array2, ArrayBase, Data, Ix2};
use sprs::{CsMat, TriMat};
use thiserror::Error;

use crate::distance::{Distance, L2Dist};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NeighborsError {
    #[error("n_neighbors ({n_neighbors}) must be positive and leave at least one other point among {n_samples} samples")]
    TooManyNeighbors {
        n_neighbors: usize,
        n_samples: usize,
    },
    #[error("quantile should be in [0, 1], got {0}")]
    Quantile(f64),
    #[error("no samples to query")]
    NotEnoughSamples,
    #[error("neighbour query failed: {0}")]
    Query(#[from] NnError),
}

pub type Result<T> = std::result::Result<T, NeighborsError>;

/// Builds a neighbour index over `records` with `nn_algo`
///
/// Records the tree indices refuse, such as zero-dimensional ones, are scanned linearly instead.
pub fn build_index<'a, F, DT, D, N>(
    nn_algo: &N,
    records: &'a ArrayBase<DT, Ix2>,
    dist_fn: D,
) -> Box<dyn 'a + NearestNeighbourIndex<F>>
where
    F: Float,
    DT: Data<Elem = F>,
    D: 'a + Distance<F>,
    N: NearestNeighbour,
{
    match nn_algo.from_batch(records, dist_fn.clone()) {
        Ok(index) => index,
        Err(err) => {
            log::debug!("{:?} index unavailable ({}), scanning linearly", nn_algo, err);
            Box::new(LinearSearchIndex::new(records, dist_fn))
        }
    }
}

/// The `k` nearest neighbours of every record
///
/// Returns `(indices, distances)`, both of shape `(n_samples, k)` and sorted by increasing
/// distance, ties broken by index. With `include_self` every sample is its own first
/// neighbour, otherwise it is skipped.
pub fn k_nearest<F: Float>(
    records: &ArrayBase<impl Data<Elem = F>, Ix2>,
    k: usize,
    include_self: bool,
) -> Result<(Array2<usize>, Array2<F>)> {
    let n_samples = records.nrows();
    let available = if include_self {
        n_samples
    } else {
        n_samples.saturating_sub(1)
    };
    if k == 0 || k > available {
        return Err(NeighborsError::TooManyNeighbors {
            n_neighbors: k,
            n_samples,
        });
    }

    let index = build_index(&CommonNearestNeighbour::KdTree, records, L2Dist);
    let query = if include_self { k } else { k + 1 };
    let mut indices = Array2::zeros((n_samples, k));
    let mut distances = Array2::zeros((n_samples, k));
    for (i, row) in records.rows().into_iter().enumerate() {
        let mut found: Vec<usize> = index
            .k_nearest(row, query)?
            .into_iter()
            .map(|(_, j)| j)
            .collect();
        // Duplicates of the sample may rank before it
        match found.iter().position(|&j| j == i) {
            Some(pos) => {
                found.remove(pos);
            }
            None => {
                found.pop();
            }
        }
        if include_self {
            found.insert(0, i);
        }
        // Rows with non-finite values are not indexed
        if found.len() < k {
            return Err(NeighborsError::TooManyNeighbors {
                n_neighbors: k,
                n_samples,
            });
        }
        for (col, j) in found.into_iter().take(k).enumerate() {
            indices[(i, col)] = j;
            distances[(i, col)] = L2Dist.distance(row, records.row(j));
        }
    }
    Ok((indices, distances))
}

/// Connectivity graph of the `n_neighbors` nearest neighbours of every sample
///
/// Row `i` has an entry of one for each neighbour of `i`. The graph is not symmetric, use
/// [`symmetrize`] for an undirected version.
pub fn kneighbors_graph<F: Float>(
    records: &ArrayBase<impl Data<Elem = F>, Ix2>,
    n_neighbors: usize,
    include_self: bool,
) -> Result<CsMat<F>> {
    let n_samples = records.nrows();
    let (indices, _) = k_nearest(records, n_neighbors, include_self)?;

    let mut triplets = TriMat::with_capacity((n_samples, n_samples), n_samples * n_neighbors);
    for (i, row) in indices.rows().into_iter().enumerate() {
        for &j in row {
            triplets.add_triplet(i, j, F::one());
        }
    }
    Ok(triplets.to_csr())
}

/// Undirected version `(G + G^T) / 2` of a square graph
pub fn symmetrize<F: Float>(graph: &CsMat<F>) -> CsMat<F> {
    let half = F::cast(0.5);
    let transpose = graph.transpose_view().to_other_storage();
    sprs::binop::csmat_binop(graph.view(), transpose.view(), |&x, &y| (x + y) * half)
}

/// Connected components of a graph, edges taken as undirected
///
/// Returns the number of components and the component of every node. Components are numbered
/// in the order of their smallest node.
pub fn connected_components<F: Float>(graph: &CsMat<F>) -> (usize, Array1<usize>) {
    let n = graph.rows();
    let mut adjacency = vec![Vec::new(); n];
    for (i, row) in graph.outer_iterator().enumerate() {
        for (j, _) in row.iter() {
            if i != j {
                adjacency[i].push(j);
                adjacency[j].push(i);
            }
        }
    }

    let mut labels = vec![usize::MAX; n];
    let mut n_components = 0;
    let mut queue = VecDeque::new();
    for start in 0..n {
        if labels[start] != usize::MAX {
            continue;
        }
        labels[start] = n_components;
        queue.push_back(start);
        while let Some(node) = queue.pop_front() {
            for &next in &adjacency[node] {
                if labels[next] == usize::MAX {
                    labels[next] = n_components;
                    queue.push_back(next);
                }
            }
        }
        n_components += 1;
    }
    (n_components, Array1::from(labels))
}

/// Estimate the bandwidth to use with the mean-shift algorithm
///
/// The bandwidth is the distance to the `max(1, floor(n_samples * quantile))`-th nearest
/// neighbour averaged over all samples, every sample being its own first neighbour. A small
/// quantile yields a small bandwidth and many clusters.
pub fn estimate_bandwidth<F: Float>(
    records: &ArrayBase<impl Data<Elem = F>, Ix2>,
    quantile: F,
) -> Result<F> {
    if !(quantile >= F::zero() && quantile <= F::one()) {
        return Err(NeighborsError::Quantile(quantile.to_f64().unwrap_or(f64::NAN)));
    }
    let n_samples = records.nrows();
    if n_samples == 0 {
        return Err(NeighborsError::NotEnoughSamples);
    }
    let k = (F::cast(n_samples) * quantile).floor().to_usize().unwrap_or(0).max(1);
    let (_, distances) = k_nearest(records, k, true)?;
    let total = distances.column(k - 1).sum();
    Ok(total / F::cast(n_samples))
}
