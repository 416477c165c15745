//! `clusterlab-datasets` provides the synthetic datasets used to compare clustering algorithms.
//!
//! ## The Big Picture
//!
//! `clusterlab-datasets` is a crate in the `clusterlab` workspace, a small toolkit of classical
//! clustering algorithms implemented in pure Rust, akin to Python's `scikit-learn`.
//!
//! ## Current State
//!
//! The [`generate`] module contains seeded generators for the classic toy shapes:
//!
//! * blobs of gaussian points around given or random centres
//! * two concentric circles
//! * two interleaving half moons
//! * uniform noise without structure
//!
//! The [`gallery`] module assembles the six two dimensional datasets compared side by side by
//! the gallery binary. Each is returned as a [`clusterlab::Dataset`] whose targets are the
//! labels the points were generated with.
//!
//! ## Using a dataset
//!
//! ```
//! use clusterlab_datasets::gallery::GalleryDataset;
//!
//! let moons = GalleryDataset::NoisyMoons.generate(200, 30).unwrap();
//! assert_eq!(moons.records().dim(), (200, 2));
//! ```

pub mod gallery;
pub mod generate;

pub use generate::GenerateError;
