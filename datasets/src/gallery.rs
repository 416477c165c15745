//! The six toy datasets of the clustering comparison
//!
//! Every dataset is two dimensional and chosen to expose a different weakness: non convex
//! shapes (circles, moons), clusters of different density (varied), stretched clusters
//! (aniso), the easy case (blobs), and data without any cluster structure at all.

use std::fmt;
use std::str::FromStr;

use clusterlab::Dataset;
use ndarray::{array, Array1};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

use crate::generate::{self, Result};

/// Seed of the blobs that `Varied` and `Aniso` are built from. It is kept fixed so that the
/// stretched clusters stay separable whatever the run seed is.
pub const STRETCHED_BLOBS_SEED: u64 = 170;

/// One of the six datasets, in the order they are drawn as rows of the comparison grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GalleryDataset {
    NoisyCircles,
    NoisyMoons,
    Varied,
    Aniso,
    Blobs,
    NoStructure,
}

impl GalleryDataset {
    /// All datasets in grid order
    pub fn all() -> [GalleryDataset; 6] {
        [
            GalleryDataset::NoisyCircles,
            GalleryDataset::NoisyMoons,
            GalleryDataset::Varied,
            GalleryDataset::Aniso,
            GalleryDataset::Blobs,
            GalleryDataset::NoStructure,
        ]
    }

    /// Snake case identifier, used on the command line and in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            GalleryDataset::NoisyCircles => "noisy_circles",
            GalleryDataset::NoisyMoons => "noisy_moons",
            GalleryDataset::Varied => "varied",
            GalleryDataset::Aniso => "aniso",
            GalleryDataset::Blobs => "blobs",
            GalleryDataset::NoStructure => "no_structure",
        }
    }

    /// Generate `n_samples` points of this dataset
    ///
    /// The targets hold the generation labels. `NoStructure` has no clusters and labels every
    /// point with `0`.
    pub fn generate(&self, n_samples: usize, seed: u64) -> Result<Dataset<f64, usize>> {
        let mut rng = Xoshiro256Plus::seed_from_u64(seed);
        let mut stretched_rng = Xoshiro256Plus::seed_from_u64(STRETCHED_BLOBS_SEED);

        let (records, targets) = match self {
            GalleryDataset::NoisyCircles => generate::make_circles(n_samples, 0.5, 0.05, &mut rng)?,
            GalleryDataset::NoisyMoons => generate::make_moons(n_samples, 0.05, &mut rng)?,
            GalleryDataset::Varied => {
                let centers = generate::random_centers(3, 2, (-10.0, 10.0), &mut stretched_rng)?;
                generate::make_blobs(n_samples, &centers, &[1.0, 2.5, 0.5], &mut stretched_rng)?
            }
            GalleryDataset::Aniso => {
                let (records, targets) = generate::make_blobs_random_centers(
                    n_samples,
                    3,
                    2,
                    (-10.0, 10.0),
                    1.0,
                    &mut stretched_rng,
                )?;
                let transformation = array![[0.6, -0.6], [-0.4, 0.8]];
                (generate::anisotropic(&records, &transformation)?, targets)
            }
            GalleryDataset::Blobs => generate::make_blobs_random_centers(
                n_samples,
                3,
                2,
                (-10.0, 10.0),
                1.0,
                &mut rng,
            )?,
            GalleryDataset::NoStructure => {
                if n_samples == 0 {
                    return Err(generate::GenerateError::NoSamples);
                }
                (
                    generate::uniform(n_samples, 2, &mut rng),
                    Array1::zeros(n_samples),
                )
            }
        };

        Ok(Dataset::new(records, targets).with_feature_names(vec!["x", "y"]))
    }
}

impl fmt::Display for GalleryDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GalleryDataset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        GalleryDataset::all()
            .iter()
            .copied()
            .find(|dataset| dataset.name() == s)
            .ok_or_else(|| format!("unknown dataset `{}`", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clusterlab::dataset::Labels;

    #[test]
    fn every_dataset_has_requested_shape() {
        for dataset in GalleryDataset::all().iter() {
            let generated = dataset.generate(150, 30).unwrap();
            assert_eq!(generated.records().dim(), (150, 2), "{}", dataset);
            assert_eq!(generated.targets().len(), 150);
        }
    }

    #[test]
    fn generation_labels_match_dataset_kind() {
        let circles = GalleryDataset::NoisyCircles.generate(100, 30).unwrap();
        assert_eq!(circles.label_count().len(), 2);

        let varied = GalleryDataset::Varied.generate(100, 30).unwrap();
        assert_eq!(varied.label_count().len(), 3);

        let uniform = GalleryDataset::NoStructure.generate(100, 30).unwrap();
        assert_eq!(uniform.label_count().len(), 1);
        assert!(uniform.records().iter().all(|x| (0.0..1.0).contains(x)));
    }

    #[test]
    fn stretched_datasets_ignore_run_seed() {
        let a = GalleryDataset::Aniso.generate(60, 1).unwrap();
        let b = GalleryDataset::Aniso.generate(60, 2).unwrap();
        assert_eq!(a.records(), b.records());

        let a = GalleryDataset::Blobs.generate(60, 1).unwrap();
        let b = GalleryDataset::Blobs.generate(60, 2).unwrap();
        assert_ne!(a.records(), b.records());
    }

    #[test]
    fn names_round_trip() {
        for dataset in GalleryDataset::all().iter() {
            assert_eq!(dataset.name().parse::<GalleryDataset>().unwrap(), *dataset);
        }
        assert!("spirals".parse::<GalleryDataset>().is_err());
    }
}
