//! Command line of the gallery
use std::path::PathBuf;

use clap::Parser;
use clusterlab_datasets::gallery::GalleryDataset;

use crate::algorithms::Algorithm;

/// Compare clustering algorithms on six 2D toy datasets and draw the result as a grid of
/// scatter plots
#[derive(Debug, Parser)]
#[command(name = "clusterlab-gallery", version)]
pub struct Args {
    /// Image to write, PNG or SVG depending on the extension
    #[arg(short, long, default_value = "clustering_comparison.png")]
    pub output: PathBuf,

    /// Number of points of every dataset
    #[arg(short, long, default_value_t = 500)]
    pub n_samples: usize,

    /// Seed of the generated datasets
    #[arg(short, long, default_value_t = 30)]
    pub seed: u64,

    /// JSON file overriding the hyperparameters
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write a JSON summary of every cell to this file
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Comma separated datasets to draw, all of them by default
    #[arg(long, value_delimiter = ',')]
    pub datasets: Vec<GalleryDataset>,

    /// Comma separated algorithms to run, all of them by default
    #[arg(long, value_delimiter = ',', value_enum)]
    pub algorithms: Vec<Algorithm>,

    /// Show the warnings of the clustering algorithms, such as disconnected neighbour graphs
    #[arg(long)]
    pub show_warnings: bool,
}

impl Args {
    /// Selected datasets in grid order
    pub fn datasets(&self) -> Vec<GalleryDataset> {
        GalleryDataset::all()
            .iter()
            .copied()
            .filter(|d| self.datasets.is_empty() || self.datasets.contains(d))
            .collect()
    }

    /// Selected algorithms in grid order
    pub fn algorithms(&self) -> Vec<Algorithm> {
        Algorithm::all()
            .iter()
            .copied()
            .filter(|a| self.algorithms.is_empty() || self.algorithms.contains(a))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_select_everything() {
        let args = Args::parse_from(["clusterlab-gallery"]);
        assert_eq!(args.n_samples, 500);
        assert_eq!(args.seed, 30);
        assert_eq!(args.output, PathBuf::from("clustering_comparison.png"));
        assert!(!args.show_warnings);
        assert_eq!(args.datasets().len(), 6);
        assert_eq!(args.algorithms().len(), 10);
    }

    #[test]
    fn selections_keep_grid_order() {
        let args = Args::parse_from([
            "clusterlab-gallery",
            "--datasets",
            "blobs,noisy_circles",
            "--algorithms",
            "gaussian-mixture,dbscan",
            "--show-warnings",
        ]);
        assert_eq!(
            args.datasets(),
            vec![GalleryDataset::NoisyCircles, GalleryDataset::Blobs]
        );
        assert_eq!(
            args.algorithms(),
            vec![Algorithm::Dbscan, Algorithm::GaussianMixture]
        );
        assert!(args.show_warnings);
    }

    #[test]
    fn rejects_unknown_dataset() {
        assert!(Args::try_parse_from(["clusterlab-gallery", "--datasets", "spirals"]).is_err());
    }
}
