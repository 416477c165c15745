use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap};

use crate::distance::{Distance, Metric};
use crate::hierarchical::{
    AgglomerativeError, AgglomerativeParams, AgglomerativeValidParams, Linkage,
};
use crate::neighbors::connected_components;
use clusterlab::traits::Fit;
use clusterlab::{DatasetBase, Float};
use ndarray::{Array1, ArrayBase, ArrayView2, Data, Ix2};
use noisy_float::{checkers::NumChecker, NoisyFloat};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};
use sprs::CsMat;

type MergeCost<F> = NoisyFloat<F, NumChecker>;

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// Agglomerative clustering builds a hierarchy bottom-up: every sample starts in its own
/// cluster and the two closest clusters are merged until `n_clusters` are left.
///
/// The distance between clusters depends on the [`Linkage`]:
/// - `Ward` merges the pair whose union increases the within-cluster variance the least, its
///   merge cost is `sqrt(2 na nb / (na + nb)) * ||ca - cb||`,
/// - `Average`, `Complete` and `Single` use the mean, largest and smallest distance between
///   members of both clusters.
///
/// With a connectivity graph only clusters containing adjacent samples may merge. A graph with
/// several connected components is completed by linking the closest samples of each pair of
/// components.
///
/// Merges are recorded in the order they happen. Cluster `i < n_samples` is sample `i`, the
/// cluster created by the `j`-th merge has id `n_samples + j`.
///
/// ## Tutorial
///
/// ```
/// use clusterlab::DatasetBase;
/// use clusterlab::traits::Fit;
/// use clusterlab_clustering::{AgglomerativeClustering, Linkage};
/// use ndarray::array;
///
/// let records = array![[0.], [1.], [5.], [6.], [20.]];
/// let model = AgglomerativeClustering::params(2)
///     .linkage(Linkage::Average)
///     .fit(&DatasetBase::from(records))
///     .unwrap();
///
/// assert_eq!(model.labels(), &array![0, 0, 0, 0, 1]);
/// assert_eq!(model.children(), &[(0, 1), (2, 3), (5, 6)]);
/// ```
pub struct AgglomerativeClustering<F> {
    labels: Array1<usize>,
    children: Vec<(usize, usize)>,
    distances: Vec<F>,
    n_connected_components: usize,
}

impl<F: Float> AgglomerativeClustering<F> {
    pub fn params(n_clusters: usize) -> AgglomerativeParams<F> {
        AgglomerativeParams::new(n_clusters)
    }

    /// Cluster of every sample, numbered in order of first appearance
    pub fn labels(&self) -> &Array1<usize> {
        &self.labels
    }

    /// Pair of clusters merged at every step
    pub fn children(&self) -> &[(usize, usize)] {
        &self.children
    }

    /// Linkage distance of every merge
    pub fn distances(&self) -> &[F] {
        &self.distances
    }

    /// Connected components of the connectivity graph before it was completed, `1` without a
    /// graph
    pub fn n_connected_components(&self) -> usize {
        self.n_connected_components
    }
}

impl<F: Float, D: Data<Elem = F>, T> Fit<ArrayBase<D, Ix2>, T, AgglomerativeError>
    for AgglomerativeValidParams<F>
{
    type Object = AgglomerativeClustering<F>;

    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<D, Ix2>, T>,
    ) -> Result<Self::Object, AgglomerativeError> {
        let records = dataset.records().view();
        let n_samples = records.nrows();
        if n_samples < self.n_clusters() {
            return Err(AgglomerativeError::NotEnoughSamples {
                n_samples,
                n_clusters: self.n_clusters(),
            });
        }
        if let Some(graph) = self.connectivity() {
            if graph.rows() != n_samples {
                return Err(AgglomerativeError::ConnectivityMismatch {
                    expected: n_samples,
                    found: graph.rows(),
                });
            }
        }

        Ok(agglomerate(
            records,
            self.n_clusters(),
            self.linkage(),
            self.metric(),
            self.connectivity(),
        ))
    }
}

/// Merge clusters of `records` until `n_clusters` are left
pub(crate) fn agglomerate<F: Float>(
    records: ArrayView2<F>,
    n_clusters: usize,
    linkage: Linkage,
    metric: Metric,
    connectivity: Option<&CsMat<F>>,
) -> AgglomerativeClustering<F> {
    let n_samples = records.nrows();
    let (mut edges, n_connected_components) = match connectivity {
        Some(graph) => connected_edges(records, graph, metric),
        None => (complete_edges(records, metric), 1),
    };

    let mut heap = BinaryHeap::new();
    for (i, neighbors) in edges.iter().enumerate() {
        for (&j, &d) in neighbors.range((i + 1)..) {
            heap.push(Reverse((MergeCost::new(d), i, j)));
        }
    }

    let mut sizes = vec![1usize; n_samples];
    let mut centroids: Vec<Array1<F>> = records.rows().into_iter().map(|r| r.to_owned()).collect();
    let mut active = vec![true; n_samples];
    let mut parent: Vec<usize> = (0..n_samples).collect();
    let mut children = Vec::with_capacity(n_samples.saturating_sub(n_clusters));
    let mut distances = Vec::with_capacity(n_samples.saturating_sub(n_clusters));

    let mut n_active = n_samples;
    while n_active > n_clusters {
        let Reverse((cost, a, b)) = match heap.pop() {
            Some(entry) => entry,
            None => break,
        };
        if !active[a] || !active[b] {
            continue;
        }

        let merged = parent.len();
        let (na, nb) = (F::cast(sizes[a]), F::cast(sizes[b]));
        let centroid = (&centroids[a] * na + &centroids[b] * nb) / (na + nb);
        let size = sizes[a] + sizes[b];

        let edges_a = std::mem::take(&mut edges[a]);
        let mut edges_b = std::mem::take(&mut edges[b]);
        edges_b.remove(&a);
        let mut neighbors: BTreeMap<usize, F> = BTreeMap::new();
        for (k, da) in edges_a.into_iter().filter(|(k, _)| *k != b) {
            let d = match edges_b.remove(&k) {
                Some(db) => match linkage {
                    Linkage::Average => (da * na + db * nb) / (na + nb),
                    Linkage::Complete => da.max(db),
                    Linkage::Single => da.min(db),
                    Linkage::Ward => da,
                },
                None => da,
            };
            neighbors.insert(k, d);
        }
        neighbors.extend(edges_b);
        if linkage == Linkage::Ward {
            for (k, d) in neighbors.iter_mut() {
                *d = ward_cost(size, &centroid, sizes[*k], &centroids[*k]);
            }
        }

        for (&k, &d) in neighbors.iter() {
            edges[k].remove(&a);
            edges[k].remove(&b);
            edges[k].insert(merged, d);
            heap.push(Reverse((MergeCost::new(d), k, merged)));
        }

        edges.push(neighbors);
        sizes.push(size);
        centroids.push(centroid);
        active[a] = false;
        active[b] = false;
        active.push(true);
        parent[a] = merged;
        parent[b] = merged;
        parent.push(merged);
        children.push((a, b));
        distances.push(cost.raw());
        n_active -= 1;
    }

    let labels = label_roots(&parent, n_samples);
    log::debug!(
        "{:?} linkage merged {} samples into {} clusters",
        linkage,
        n_samples,
        n_active
    );

    AgglomerativeClustering {
        labels,
        children,
        distances,
        n_connected_components,
    }
}

fn ward_cost<F: Float>(na: usize, ca: &Array1<F>, nb: usize, cb: &Array1<F>) -> F {
    let (na, nb) = (F::cast(na), F::cast(nb));
    let scale = (F::cast(2.) * na * nb / (na + nb)).sqrt();
    let sq_dist = ca
        .iter()
        .zip(cb.iter())
        .map(|(&x, &y)| (x - y) * (x - y))
        .sum::<F>();
    scale * sq_dist.sqrt()
}

/// Edges between every pair of samples
fn complete_edges<F: Float>(records: ArrayView2<F>, metric: Metric) -> Vec<BTreeMap<usize, F>> {
    let n = records.nrows();
    let mut edges = vec![BTreeMap::new(); n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = metric.distance(records.row(i), records.row(j));
            edges[i].insert(j, d);
            edges[j].insert(i, d);
        }
    }
    edges
}

/// Edges of the connectivity graph, completed to a single component
fn connected_edges<F: Float>(
    records: ArrayView2<F>,
    graph: &CsMat<F>,
    metric: Metric,
) -> (Vec<BTreeMap<usize, F>>, usize) {
    let n = records.nrows();
    let mut edges = vec![BTreeMap::new(); n];
    for (_, (i, j)) in graph.iter() {
        if i != j {
            let d = metric.distance(records.row(i), records.row(j));
            edges[i].insert(j, d);
            edges[j].insert(i, d);
        }
    }

    let (n_components, components) = connected_components(graph);
    if n_components > 1 {
        log::warn!(
            "the number of connected components of the connectivity matrix is {} > 1. Completing it to avoid stopping the tree early.",
            n_components
        );
        let mut members = vec![Vec::new(); n_components];
        for (i, &c) in components.iter().enumerate() {
            members[c].push(i);
        }
        for (ca, first) in members.iter().enumerate() {
            for second in members.iter().skip(ca + 1) {
                let mut closest: Option<(F, usize, usize)> = None;
                for &i in first {
                    for &j in second {
                        let d = metric.distance(records.row(i), records.row(j));
                        if closest.map_or(true, |(best, _, _)| d < best) {
                            closest = Some((d, i, j));
                        }
                    }
                }
                if let Some((d, i, j)) = closest {
                    edges[i].insert(j, d);
                    edges[j].insert(i, d);
                }
            }
        }
    }
    (edges, n_components)
}

/// Label every sample by the root of its merge tree, in order of first appearance
fn label_roots(parent: &[usize], n_samples: usize) -> Array1<usize> {
    let mut ids = HashMap::new();
    (0..n_samples)
        .map(|sample| {
            let mut root = sample;
            while parent[root] != root {
                root = parent[root];
            }
            let next = ids.len();
            *ids.entry(root).or_insert(next)
        })
        .collect()
}
