//! Hand tuned hyperparameters of the comparison
//!
//! Every dataset starts from the same base parameters and overrides a few of them. A JSON file
//! passed with `--config` is applied on top of both layers:
//!
//! ```json
//! {
//!     "base": { "eps": 0.25 },
//!     "datasets": { "noisy_moons": { "n_clusters": 3 } }
//! }
//! ```
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clusterlab_datasets::gallery::GalleryDataset;
use serde::{Deserialize, Serialize};

/// Parameters shared by the algorithms of one dataset row
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Params {
    /// Quantile of the neighbour distances used to estimate the MeanShift bandwidth
    pub quantile: f64,
    /// DBSCAN neighbourhood radius
    pub eps: f64,
    /// Affinity Propagation damping
    pub damping: f64,
    /// Affinity Propagation preference
    pub preference: f64,
    /// Neighbours of the connectivity graph used by the agglomerative algorithms
    pub n_neighbors: usize,
    pub n_clusters: usize,
    /// OPTICS minimum number of points
    pub min_samples: usize,
    /// OPTICS steepness
    pub xi: f64,
    /// OPTICS minimum cluster size, as a fraction of the samples
    pub min_cluster_size: f64,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            quantile: 0.3,
            eps: 0.3,
            damping: 0.9,
            preference: -200.,
            n_neighbors: 3,
            n_clusters: 3,
            min_samples: 7,
            xi: 0.05,
            min_cluster_size: 0.1,
        }
    }
}

/// A partial set of parameters, the missing ones are inherited
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantile: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damping: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preference: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_neighbors: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_clusters: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_samples: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_cluster_size: Option<f64>,
}

impl Params {
    /// Copy of `self` with every value set in `overrides` replaced
    pub fn merged(&self, overrides: &Overrides) -> Params {
        Params {
            quantile: overrides.quantile.unwrap_or(self.quantile),
            eps: overrides.eps.unwrap_or(self.eps),
            damping: overrides.damping.unwrap_or(self.damping),
            preference: overrides.preference.unwrap_or(self.preference),
            n_neighbors: overrides.n_neighbors.unwrap_or(self.n_neighbors),
            n_clusters: overrides.n_clusters.unwrap_or(self.n_clusters),
            min_samples: overrides.min_samples.unwrap_or(self.min_samples),
            xi: overrides.xi.unwrap_or(self.xi),
            min_cluster_size: overrides.min_cluster_size.unwrap_or(self.min_cluster_size),
        }
    }
}

impl Overrides {
    /// Values of `other` take precedence over the ones of `self`
    pub fn merged(&self, other: &Overrides) -> Overrides {
        Overrides {
            quantile: other.quantile.or(self.quantile),
            eps: other.eps.or(self.eps),
            damping: other.damping.or(self.damping),
            preference: other.preference.or(self.preference),
            n_neighbors: other.n_neighbors.or(self.n_neighbors),
            n_clusters: other.n_clusters.or(self.n_clusters),
            min_samples: other.min_samples.or(self.min_samples),
            xi: other.xi.or(self.xi),
            min_cluster_size: other.min_cluster_size.or(self.min_cluster_size),
        }
    }
}

/// Layout of a `--config` file
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    base: Overrides,
    datasets: BTreeMap<String, Overrides>,
}

/// Base parameters and per dataset overrides
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    base: Params,
    datasets: HashMap<GalleryDataset, Overrides>,
}

impl Default for Config {
    fn default() -> Self {
        let mut datasets = HashMap::new();
        datasets.insert(
            GalleryDataset::NoisyCircles,
            Overrides {
                damping: Some(0.77),
                preference: Some(-240.),
                quantile: Some(0.2),
                n_clusters: Some(2),
                min_samples: Some(7),
                xi: Some(0.08),
                ..Default::default()
            },
        );
        datasets.insert(
            GalleryDataset::NoisyMoons,
            Overrides {
                damping: Some(0.75),
                preference: Some(-220.),
                n_clusters: Some(2),
                min_samples: Some(7),
                xi: Some(0.1),
                ..Default::default()
            },
        );
        datasets.insert(
            GalleryDataset::Varied,
            Overrides {
                eps: Some(0.18),
                n_neighbors: Some(2),
                min_samples: Some(7),
                xi: Some(0.01),
                min_cluster_size: Some(0.2),
                ..Default::default()
            },
        );
        datasets.insert(
            GalleryDataset::Aniso,
            Overrides {
                eps: Some(0.15),
                n_neighbors: Some(2),
                min_samples: Some(7),
                xi: Some(0.1),
                min_cluster_size: Some(0.2),
                ..Default::default()
            },
        );
        datasets.insert(
            GalleryDataset::Blobs,
            Overrides {
                min_samples: Some(7),
                xi: Some(0.1),
                min_cluster_size: Some(0.2),
                ..Default::default()
            },
        );

        Config {
            base: Params::default(),
            datasets,
        }
    }
}

impl Config {
    /// Default configuration updated with the JSON file at `path`
    pub fn from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read configuration {}", path.display()))?;
        Config::default()
            .with_json(&content)
            .with_context(|| format!("invalid configuration {}", path.display()))
    }

    /// Apply a JSON configuration on top of this one
    pub fn with_json(mut self, content: &str) -> Result<Config> {
        let file: ConfigFile = serde_json::from_str(content)?;
        self.base = self.base.merged(&file.base);
        for (name, overrides) in file.datasets {
            let dataset: GalleryDataset = name.parse().map_err(|e: String| anyhow!(e))?;
            let merged = self
                .datasets
                .get(&dataset)
                .map(|current| current.merged(&overrides))
                .unwrap_or(overrides);
            self.datasets.insert(dataset, merged);
        }
        Ok(self)
    }

    pub fn base(&self) -> &Params {
        &self.base
    }

    /// Base parameters overridden by the ones of `dataset`
    pub fn params_for(&self, dataset: GalleryDataset) -> Params {
        match self.datasets.get(&dataset) {
            Some(overrides) => self.base.merged(overrides),
            None => self.base.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_overrides_base() {
        let config = Config::default();
        let circles = config.params_for(GalleryDataset::NoisyCircles);
        assert_eq!(circles.n_clusters, 2);
        assert_eq!(circles.quantile, 0.2);
        assert_eq!(circles.damping, 0.77);
        // inherited
        assert_eq!(circles.eps, 0.3);
        assert_eq!(circles.n_neighbors, 3);

        let aniso = config.params_for(GalleryDataset::Aniso);
        assert_eq!(aniso.eps, 0.15);
        assert_eq!(aniso.n_neighbors, 2);
        assert_eq!(aniso.n_clusters, 3);
    }

    #[test]
    fn no_structure_uses_base() {
        let config = Config::default();
        assert_eq!(
            config.params_for(GalleryDataset::NoStructure),
            Params::default()
        );
    }

    #[test]
    fn json_layers_on_top() {
        let config = Config::default()
            .with_json(
                r#"{
                    "base": { "eps": 0.25, "min_samples": 5 },
                    "datasets": { "noisy_circles": { "xi": 0.2 }, "no_structure": { "n_clusters": 4 } }
                }"#,
            )
            .unwrap();

        assert_eq!(config.base().eps, 0.25);
        let circles = config.params_for(GalleryDataset::NoisyCircles);
        assert_eq!(circles.xi, 0.2);
        // kept from the built in overrides
        assert_eq!(circles.n_clusters, 2);
        assert_eq!(circles.min_samples, 7);
        assert_eq!(circles.eps, 0.25);

        let varied = config.params_for(GalleryDataset::Varied);
        assert_eq!(varied.eps, 0.18);
        let no_structure = config.params_for(GalleryDataset::NoStructure);
        assert_eq!(no_structure.n_clusters, 4);
        assert_eq!(no_structure.min_samples, 5);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Config::default()
            .with_json(r#"{ "base": { "epsilon": 0.2 } }"#)
            .is_err());
        assert!(Config::default()
            .with_json(r#"{ "datasets": { "spirals": {} } }"#)
            .is_err());
    }
}
