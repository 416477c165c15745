//! Utility functions for randomly generating datasets

use std::f64::consts::PI;

use ndarray::{s, stack, Array, Array1, Array2, ArrayBase, Axis, Data, Ix1, Ix2};
use ndarray_rand::{
    rand::{seq::SliceRandom, Rng},
    rand_distr::{Distribution, Normal, StandardNormal, Uniform},
    RandomExt,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenerateError>;

/// An error when a generator is called with inconsistent arguments
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerateError {
    #[error("n_samples cannot be 0")]
    NoSamples,
    #[error("at least one centre is required")]
    NoCenters,
    #[error("expected {expected} standard deviations, one per centre, got {found}")]
    StdMismatch { expected: usize, found: usize },
    #[error("standard deviations and noise levels must be finite and non-negative")]
    InvalidStd,
    #[error("scale factor between inner and outer circle must be in [0, 1), got {0}")]
    Factor(f64),
    #[error("the transformation must have {0} rows")]
    Transform(usize),
    #[error("centre box must be a finite interval with low < high, got ({0}, {1})")]
    InvalidCenterBox(f64, f64),
}

/// Special case of `blobs_with_distribution` with a standard normal distribution.
pub fn blobs(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    blobs_with_distribution(blob_size, blob_centroids, StandardNormal, rng)
}

/// Given an input matrix `blob_centroids`, with shape `(n_blobs, n_features)`,
/// generate `blob_size` data points (a "blob") around each of the blob centroids.
///
/// More specifically, each blob is formed by `blob_size` points sampled from a distribution
/// centered in the blob centroid.
///
/// `blobs` can be used to quickly assemble a synthetic dataset to test or
/// benchmark various clustering algorithms on a best-case scenario input.
pub fn blobs_with_distribution(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    distribution: impl Distribution<f64> + Clone,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let (n_centroids, n_features) = blob_centroids.dim();
    let mut blobs: Array2<f64> = Array2::zeros((n_centroids * blob_size, n_features));

    for (blob_index, blob_centroid) in blob_centroids.rows().into_iter().enumerate() {
        let blob = make_blob(blob_size, &blob_centroid, distribution.clone(), rng);

        let indexes = s![blob_index * blob_size..(blob_index + 1) * blob_size, ..];
        blobs.slice_mut(indexes).assign(&blob);
    }
    blobs
}

/// Generate `blob_size` data points (a "blob") around `blob_centroid` using the given distribution.
///
/// `blob` can be used to quickly assemble a synthetic stereotypical cluster.
fn make_blob(
    blob_size: usize,
    blob_centroid: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    distribution: impl Distribution<f64>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let shape = (blob_size, blob_centroid.len());
    let origin_blob: Array2<f64> = Array::random_using(shape, distribution, rng);
    origin_blob + blob_centroid
}

/// Gaussian blobs with one standard deviation per centre
///
/// The `n_samples` points are split as evenly as possible between the centres, the first
/// `n_samples % n_centers` centres receive one extra point. Each group is drawn from an isotropic
/// normal distribution around its centre with the corresponding entry of `cluster_std`. The
/// points are shuffled and returned together with the index of the centre they were drawn from.
pub fn make_blobs(
    n_samples: usize,
    centers: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    cluster_std: &[f64],
    rng: &mut impl Rng,
) -> Result<(Array2<f64>, Array1<usize>)> {
    let (n_centers, n_features) = centers.dim();
    if n_samples == 0 {
        return Err(GenerateError::NoSamples);
    }
    if n_centers == 0 {
        return Err(GenerateError::NoCenters);
    }
    if cluster_std.len() != n_centers {
        return Err(GenerateError::StdMismatch {
            expected: n_centers,
            found: cluster_std.len(),
        });
    }
    if cluster_std.iter().any(|std| !std.is_finite() || *std < 0.0) {
        return Err(GenerateError::InvalidStd);
    }

    let mut records = Array2::zeros((n_samples, n_features));
    let mut targets = Array1::zeros(n_samples);

    let mut offset = 0;
    for (idx, (center, &std)) in centers.rows().into_iter().zip(cluster_std).enumerate() {
        let size = n_samples / n_centers + usize::from(idx < n_samples % n_centers);
        let normal = Normal::new(0.0, std).map_err(|_| GenerateError::InvalidStd)?;
        let blob = make_blob(size, &center, normal, rng);

        records
            .slice_mut(s![offset..offset + size, ..])
            .assign(&blob);
        targets.slice_mut(s![offset..offset + size]).fill(idx);
        offset += size;
    }

    Ok(shuffle(records, targets, rng))
}

/// Gaussian blobs around `n_centers` centres drawn uniformly from `center_box`
///
/// All blobs share the same standard deviation. See [`make_blobs`] for the sampling of the
/// points themselves.
pub fn make_blobs_random_centers(
    n_samples: usize,
    n_centers: usize,
    n_features: usize,
    center_box: (f64, f64),
    cluster_std: f64,
    rng: &mut impl Rng,
) -> Result<(Array2<f64>, Array1<usize>)> {
    if n_centers == 0 {
        return Err(GenerateError::NoCenters);
    }
    let centers = random_centers(n_centers, n_features, center_box, rng)?;

    make_blobs(n_samples, &centers, &vec![cluster_std; n_centers], rng)
}

/// Centres drawn uniformly from `center_box` in every dimension
///
/// The box is the half-open interval `[low, high)` and must be finite and non-empty.
pub fn random_centers(
    n_centers: usize,
    n_features: usize,
    center_box: (f64, f64),
    rng: &mut impl Rng,
) -> Result<Array2<f64>> {
    let (low, high) = center_box;
    if !(low.is_finite() && high.is_finite() && low < high) {
        return Err(GenerateError::InvalidCenterBox(low, high));
    }
    Ok(Array2::random_using((n_centers, n_features), Uniform::new(low, high), rng))
}

/// Two concentric circles
///
/// The outer circle has radius one and holds `n_samples / 2` points, the inner circle is scaled
/// by `factor` and holds the rest. Points are evenly spaced in angle, shuffled, and perturbed by
/// gaussian noise with standard deviation `noise`. Label `0` marks the outer and `1` the inner
/// circle.
pub fn make_circles(
    n_samples: usize,
    factor: f64,
    noise: f64,
    rng: &mut impl Rng,
) -> Result<(Array2<f64>, Array1<usize>)> {
    if n_samples == 0 {
        return Err(GenerateError::NoSamples);
    }
    if !(0.0..1.0).contains(&factor) {
        return Err(GenerateError::Factor(factor));
    }
    let n_outer = n_samples / 2;
    let n_inner = n_samples - n_outer;

    let records = Array2::from_shape_fn((n_samples, 2), |(i, j)| {
        let (idx, n, radius) = if i < n_outer {
            (i, n_outer, 1.0)
        } else {
            (i - n_outer, n_inner, factor)
        };
        let angle = 2.0 * PI * idx as f64 / n as f64;
        if j == 0 {
            radius * angle.cos()
        } else {
            radius * angle.sin()
        }
    });
    let targets = (0..n_samples).map(|i| usize::from(i >= n_outer)).collect();

    let (records, targets) = shuffle(records, targets, rng);
    Ok((add_noise(records, noise, rng)?, targets))
}

/// Two interleaving half circles
///
/// The outer moon follows `(cos t, sin t)` and the inner moon `(1 - cos t, 1 - sin t - 0.5)`
/// with `t` evenly spaced in `[0, pi]`. Points are shuffled and perturbed by gaussian noise with
/// standard deviation `noise`. Label `0` marks the outer and `1` the inner moon.
pub fn make_moons(
    n_samples: usize,
    noise: f64,
    rng: &mut impl Rng,
) -> Result<(Array2<f64>, Array1<usize>)> {
    if n_samples == 0 {
        return Err(GenerateError::NoSamples);
    }
    let n_outer = n_samples / 2;
    let n_inner = n_samples - n_outer;

    let outer = Array1::linspace(0.0, PI, n_outer);
    let inner = Array1::linspace(0.0, PI, n_inner);

    let xs = outer
        .iter()
        .map(|t| t.cos())
        .chain(inner.iter().map(|t| 1.0 - t.cos()));
    let ys = outer
        .iter()
        .map(|t| t.sin())
        .chain(inner.iter().map(|t| 1.0 - t.sin() - 0.5));
    let xs = xs.collect::<Array1<_>>();
    let ys = ys.collect::<Array1<_>>();
    let records = stack![Axis(1), xs, ys];
    let targets = (0..n_samples).map(|i| usize::from(i >= n_outer)).collect();

    let (records, targets) = shuffle(records, targets, rng);
    Ok((add_noise(records, noise, rng)?, targets))
}

/// Points drawn uniformly from the unit hypercube `[0, 1)^n_features`
pub fn uniform(n_samples: usize, n_features: usize, rng: &mut impl Rng) -> Array2<f64> {
    Array2::random_using((n_samples, n_features), Uniform::new(0.0, 1.0), rng)
}

/// Stretch a point cloud by a linear transformation
///
/// Returns `points . transformation`, the transformation must have one row per feature.
pub fn anisotropic(
    points: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    transformation: &ArrayBase<impl Data<Elem = f64>, Ix2>,
) -> Result<Array2<f64>> {
    if points.ncols() != transformation.nrows() {
        return Err(GenerateError::Transform(points.ncols()));
    }

    Ok(points.dot(transformation))
}

fn add_noise(records: Array2<f64>, noise: f64, rng: &mut impl Rng) -> Result<Array2<f64>> {
    if !noise.is_finite() || noise < 0.0 {
        return Err(GenerateError::InvalidStd);
    }
    if noise == 0.0 {
        return Ok(records);
    }
    let normal = Normal::new(0.0, noise).map_err(|_| GenerateError::InvalidStd)?;

    let perturbation = Array2::random_using(records.dim(), normal, rng);

    Ok(records + perturbation)
}

fn shuffle(
    records: Array2<f64>,
    targets: Array1<usize>,
    rng: &mut impl Rng,
) -> (Array2<f64>, Array1<usize>) {
    let mut indices = (0..records.nrows()).collect::<Vec<_>>();
    indices.shuffle(rng);

    (
        records.select(Axis(0), &indices),
        targets.select(Axis(0), &indices),
    )
}
