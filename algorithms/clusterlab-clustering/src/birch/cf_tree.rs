//! Clustering feature tree
//!
//! Every subcluster summarises its samples by their count, linear sum and sum of squared norms,
//! which is enough to compute its centroid and radius and to merge it with another subcluster.
use clusterlab::Float;
use ndarray::{Array1, ArrayView1};

#[derive(Clone, Debug)]
pub(crate) struct Subcluster<F> {
    n_samples: usize,
    linear_sum: Array1<F>,
    squared_sum: F,
    centroid: Array1<F>,
    sq_norm: F,
    child: Option<Box<Node<F>>>,
}

impl<F: Float> Subcluster<F> {
    pub(crate) fn from_sample(sample: ArrayView1<F>) -> Self {
        let sq_norm = sample.dot(&sample);
        Subcluster {
            n_samples: 1,
            linear_sum: sample.to_owned(),
            squared_sum: sq_norm,
            centroid: sample.to_owned(),
            sq_norm,
            child: None,
        }
    }

    fn empty(n_features: usize) -> Self {
        Subcluster {
            n_samples: 0,
            linear_sum: Array1::zeros(n_features),
            squared_sum: F::zero(),
            centroid: Array1::zeros(n_features),
            sq_norm: F::zero(),
            child: None,
        }
    }

    pub(crate) fn centroid(&self) -> &Array1<F> {
        &self.centroid
    }

    pub(crate) fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Absorb the statistics of `other`
    fn update(&mut self, other: &Subcluster<F>) {
        self.n_samples += other.n_samples;
        self.linear_sum += &other.linear_sum;
        self.squared_sum += other.squared_sum;
        self.centroid = &self.linear_sum / F::cast(self.n_samples);
        self.sq_norm = self.centroid.dot(&self.centroid);
    }

    /// Absorb `other` if the merged radius stays within `threshold`
    fn try_merge(&mut self, other: &Subcluster<F>, threshold: F) -> bool {
        let n_samples = self.n_samples + other.n_samples;
        let linear_sum = &self.linear_sum + &other.linear_sum;
        let squared_sum = self.squared_sum + other.squared_sum;
        let centroid = &linear_sum / F::cast(n_samples);
        let sq_norm = centroid.dot(&centroid);

        // squared radius, clipped at zero against rounding
        let sq_radius = (squared_sum / F::cast(n_samples) - sq_norm).max(F::zero());
        if sq_radius <= threshold * threshold {
            self.n_samples = n_samples;
            self.linear_sum = linear_sum;
            self.squared_sum = squared_sum;
            self.centroid = centroid;
            self.sq_norm = sq_norm;
            true
        } else {
            false
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node<F> {
    is_leaf: bool,
    subclusters: Vec<Subcluster<F>>,
}

impl<F: Float> Node<F> {
    pub(crate) fn leaf() -> Self {
        Node {
            is_leaf: true,
            subclusters: Vec::new(),
        }
    }

    /// Root above the two halves of a split root
    pub(crate) fn grow(first: Subcluster<F>, second: Subcluster<F>) -> Self {
        Node {
            is_leaf: false,
            subclusters: vec![first, second],
        }
    }

    /// Index of the subcluster with the closest centroid, first one on ties
    fn closest(&self, subcluster: &Subcluster<F>) -> Option<usize> {
        // |c|^2 - 2 c.x orders centroids like their distance to x
        self.subclusters
            .iter()
            .map(|sc| sc.sq_norm - F::cast(2.) * sc.centroid.dot(&subcluster.centroid))
            .enumerate()
            .fold(None, |best: Option<(usize, F)>, (i, d)| match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((i, d)),
            })
            .map(|(i, _)| i)
    }

    /// Insert `subcluster` below this node
    ///
    /// Returns `true` when the node holds more than `branching_factor` subclusters afterwards
    /// and has to be split by the caller.
    pub(crate) fn insert(
        &mut self,
        subcluster: Subcluster<F>,
        threshold: F,
        branching_factor: usize,
    ) -> bool {
        let closest = match self.closest(&subcluster) {
            Some(closest) => closest,
            None => {
                self.subclusters.push(subcluster);
                return false;
            }
        };

        let child_split = self.subclusters[closest]
            .child
            .as_mut()
            .map(|child| child.insert(subcluster.clone(), threshold, branching_factor));
        match child_split {
            Some(false) => {
                self.subclusters[closest].update(&subcluster);
                false
            }
            Some(true) => {
                if let Some(child) = self.subclusters[closest].child.take() {
                    let (first, second) = child.split();
                    self.subclusters[closest] = first;
                    self.subclusters.push(second);
                }
                self.subclusters.len() > branching_factor
            }
            None => {
                if self.subclusters[closest].try_merge(&subcluster, threshold) {
                    false
                } else {
                    self.subclusters.push(subcluster);
                    self.subclusters.len() > branching_factor
                }
            }
        }
    }

    /// Split the node in two around its farthest pair of subclusters
    ///
    /// Each subcluster joins the closer of both seeds, the first seed on ties. Returns the two
    /// subclusters summarising the new nodes.
    pub(crate) fn split(self) -> (Subcluster<F>, Subcluster<F>) {
        let n_features = self
            .subclusters
            .first()
            .map(|sc| sc.centroid.len())
            .unwrap_or(0);
        let centroids: Vec<&Array1<F>> = self.subclusters.iter().map(|sc| &sc.centroid).collect();
        let sq_dist = |a: &Array1<F>, b: &Array1<F>| -> F {
            a.iter()
                .zip(b.iter())
                .map(|(&x, &y)| (x - y) * (x - y))
                .sum()
        };

        let (mut seed1, mut seed2, mut farthest) = (0, 0, F::neg_infinity());
        for i in 0..centroids.len() {
            for j in (i + 1)..centroids.len() {
                let d = sq_dist(centroids[i], centroids[j]);
                if d > farthest {
                    seed1 = i;
                    seed2 = j;
                    farthest = d;
                }
            }
        }

        let closer_to_first: Vec<bool> = centroids
            .iter()
            .enumerate()
            .map(|(i, c)| {
                i == seed1
                    || (i != seed2 && sq_dist(c, centroids[seed1]) <= sq_dist(c, centroids[seed2]))
            })
            .collect();

        let mut first = Subcluster::empty(n_features);
        let mut second = Subcluster::empty(n_features);
        let mut first_node = Node {
            is_leaf: self.is_leaf,
            subclusters: Vec::new(),
        };
        let mut second_node = first_node.clone();
        for (sc, to_first) in self.subclusters.into_iter().zip(closer_to_first) {
            if to_first {
                first.update(&sc);
                first_node.subclusters.push(sc);
            } else {
                second.update(&sc);
                second_node.subclusters.push(sc);
            }
        }
        first.child = Some(Box::new(first_node));
        second.child = Some(Box::new(second_node));
        (first, second)
    }

    /// Subclusters of all leaves, from left to right
    pub(crate) fn leaves(&self) -> Vec<&Subcluster<F>> {
        if self.is_leaf {
            return self.subclusters.iter().collect();
        }
        self.subclusters
            .iter()
            .filter_map(|sc| sc.child.as_ref())
            .flat_map(|child| child.leaves())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn leaf_of(points: &[[f64; 2]]) -> Node<f64> {
        let mut node = Node::leaf();
        for p in points {
            node.subclusters
                .push(Subcluster::from_sample(ArrayView1::from(&p[..])));
        }
        node
    }

    #[test]
    fn merge_respects_threshold() {
        let mut sc = Subcluster::from_sample(array![0., 0.].view());
        assert!(sc.try_merge(&Subcluster::from_sample(array![1., 0.].view()), 0.5));
        assert_eq!(sc.n_samples(), 2);
        assert_abs_diff_eq!(sc.centroid(), &array![0.5, 0.]);

        // radius of {0, 1, 3} on a line is above 1
        assert!(!sc.try_merge(&Subcluster::from_sample(array![3., 0.].view()), 1.));
        assert_eq!(sc.n_samples(), 2);
    }

    #[test]
    fn split_around_farthest_pair() {
        let node = leaf_of(&[[0., 0.], [10., 0.], [1., 0.], [9., 0.], [5., 0.]]);
        let (first, second) = node.split();
        assert_eq!(first.n_samples(), 3);
        assert_eq!(second.n_samples(), 2);
        assert_abs_diff_eq!(first.centroid(), &array![2., 0.]);
        assert_abs_diff_eq!(second.centroid(), &array![9.5, 0.]);
        let leaves: Vec<_> = first
            .child
            .as_ref()
            .unwrap()
            .leaves()
            .iter()
            .map(|sc| sc.centroid()[0])
            .collect();
        assert_eq!(leaves, vec![0., 1., 5.]);
    }

    #[test]
    fn overflow_requests_split() {
        let mut node = Node::leaf();
        for x in 0..3 {
            let split = node.insert(
                Subcluster::from_sample(array![10. * x as f64, 0.].view()),
                0.5,
                2,
            );
            assert_eq!(split, x == 2);
        }
    }
}
