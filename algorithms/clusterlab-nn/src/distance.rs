//! Distance metrics between observations
use clusterlab::Float;
use ndarray::ArrayView1;
use ndarray_stats::DeviationExt;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// A single observation
pub type Point<'a, F> = ArrayView1<'a, F>;

/// A metric between two observations of equal dimension
///
/// `rdistance` is a cheaper function that keeps the order of `distance`. Nearest centroid
/// searches compare reduced distances and only convert the winner back.
pub trait Distance<F: Float>: Clone + Send + Sync {
    // Panics if a and b are not of equal dimension
    fn distance(&self, a: Point<F>, b: Point<F>) -> F;

    // Fast distance metric that keeps the order of the distance function
    fn rdistance(&self, a: Point<F>, b: Point<F>) -> F {
        self.distance(a, b)
    }

    fn rdist_to_dist(&self, rdist: F) -> F {
        rdist
    }

    fn dist_to_rdist(&self, dist: F) -> F {
        dist
    }
}

/// Manhattan (cityblock) distance
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct L1Dist;
impl<F: Float> Distance<F> for L1Dist {
    fn distance(&self, a: Point<F>, b: Point<F>) -> F {
        a.l1_dist(&b).unwrap()
    }
}

/// Euclidean distance, with the squared distance as its reduced form
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct L2Dist;
impl<F: Float> Distance<F> for L2Dist {
    fn distance(&self, a: Point<F>, b: Point<F>) -> F {
        self.rdistance(a, b).sqrt()
    }

    fn rdistance(&self, a: Point<F>, b: Point<F>) -> F {
        a.sq_l2_dist(&b).unwrap()
    }

    fn rdist_to_dist(&self, rdist: F) -> F {
        rdist.sqrt()
    }

    fn dist_to_rdist(&self, dist: F) -> F {
        dist.powi(2)
    }
}

/// Metric chosen at runtime
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    /// Manhattan distance
    L1,
    /// Euclidean distance
    L2,
}

impl<F: Float> Distance<F> for Metric {
    fn distance(&self, a: Point<F>, b: Point<F>) -> F {
        match self {
            Self::L1 => L1Dist.distance(a, b),
            Self::L2 => L2Dist.distance(a, b),
        }
    }

    fn rdistance(&self, a: Point<F>, b: Point<F>) -> F {
        match self {
            Self::L1 => L1Dist.rdistance(a, b),
            Self::L2 => L2Dist.rdistance(a, b),
        }
    }

    fn rdist_to_dist(&self, rdist: F) -> F {
        match self {
            Self::L1 => Distance::<F>::rdist_to_dist(&L1Dist, rdist),
            Self::L2 => Distance::<F>::rdist_to_dist(&L2Dist, rdist),
        }
    }

    fn dist_to_rdist(&self, dist: F) -> F {
        match self {
            Self::L1 => Distance::<F>::dist_to_rdist(&L1Dist, dist),
            Self::L2 => Distance::<F>::dist_to_rdist(&L2Dist, dist),
        }
    }
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;
    use ndarray::arr1;

    use super::*;

    fn dist_test(dist: Metric, result: f64) {
        let a = arr1(&[0.5, 6.6]);
        let b = arr1(&[4.4, 3.0]);
        let ab = dist.distance(a.view(), b.view());
        assert_abs_diff_eq!(ab, result, epsilon = 1e-3);
        assert_abs_diff_eq!(dist.rdist_to_dist(dist.dist_to_rdist(ab)), ab, epsilon = 1e-12);

        // Triangle inequality
        let c = arr1(&[-4.5, 3.3]);
        let bc = dist.distance(b.view(), c.view());
        let ac = dist.distance(a.view(), c.view());
        assert!(ab + bc > ac)
    }

    #[test]
    fn l1_dist() {
        dist_test(Metric::L1, 7.5);
    }

    #[test]
    fn l2_dist() {
        dist_test(Metric::L2, 5.3075);

        // Check squared distance
        let a = arr1(&[0.5, 6.6]);
        let b = arr1(&[4.4, 3.0]);
        assert_abs_diff_eq!(L2Dist.rdistance(a.view(), b.view()), 28.17, epsilon = 1e-3);
    }
}
