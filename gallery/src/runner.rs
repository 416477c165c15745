//! The double loop of the comparison: every algorithm on every dataset
use std::time::Instant;

use anyhow::{Context, Result};
use clusterlab::traits::{Fit, Transformer};
use clusterlab_clustering::neighbors::{estimate_bandwidth, kneighbors_graph, symmetrize};
use clusterlab_datasets::gallery::GalleryDataset;
use clusterlab_preprocessing::LinearScaler;
use ndarray::{Array1, Array2};

use crate::algorithms::{Algorithm, Inputs};
use crate::config::Config;

/// Labels found by one algorithm on one dataset
#[derive(Clone, Debug)]
pub struct Cell {
    pub algorithm: Algorithm,
    pub labels: Array1<Option<usize>>,
    /// Wall time of the fit, in seconds
    pub seconds: f64,
}

impl Cell {
    /// Number of distinct clusters, noise excluded
    pub fn n_clusters(&self) -> usize {
        let mut found: Vec<usize> = self.labels.iter().filter_map(|l| *l).collect();
        found.sort_unstable();
        found.dedup();
        found.len()
    }

    pub fn n_noise(&self) -> usize {
        self.labels.iter().filter(|l| l.is_none()).count()
    }
}

/// One row of the comparison grid
#[derive(Clone, Debug)]
pub struct Row {
    pub dataset: GalleryDataset,
    /// Standard scaled records
    pub records: Array2<f64>,
    /// Labels the records were generated with
    pub truth: Array1<usize>,
    pub cells: Vec<Cell>,
}

/// Settings of a whole run
pub struct Run<'a> {
    pub config: &'a Config,
    pub datasets: &'a [GalleryDataset],
    pub algorithms: &'a [Algorithm],
    pub n_samples: usize,
    pub seed: u64,
}

impl<'a> Run<'a> {
    /// Generate every dataset and run every algorithm on it, rows in grid order
    pub fn execute(&self) -> Result<Vec<Row>> {
        self.datasets
            .iter()
            .map(|&dataset| {
                self.row(dataset)
                    .with_context(|| format!("dataset {}", dataset))
            })
            .collect()
    }

    fn row(&self, dataset: GalleryDataset) -> Result<Row> {
        let params = self.config.params_for(dataset);
        let generated = dataset.generate(self.n_samples, self.seed)?;
        let truth = generated.targets().clone();

        // normalize dataset for easier parameter selection
        let scaler = LinearScaler::standard().fit(&generated)?;
        let records = scaler.transform(generated).records().to_owned();

        let bandwidth = estimate_bandwidth(&records, params.quantile)?;
        let connectivity = symmetrize(&kneighbors_graph(&records, params.n_neighbors, false)?);
        log::debug!(
            "{}: bandwidth {:.3}, {} connectivity edges",
            dataset,
            bandwidth,
            connectivity.nnz()
        );

        let inputs = Inputs {
            records: &records,
            bandwidth,
            connectivity: &connectivity,
            params: &params,
        };
        let mut cells = Vec::with_capacity(self.algorithms.len());
        for &algorithm in self.algorithms {
            let start = Instant::now();
            let labels = algorithm
                .fit_labels(&inputs)
                .with_context(|| format!("fitting {} on {}", algorithm, dataset))?;
            let seconds = start.elapsed().as_secs_f64();
            let cell = Cell {
                algorithm,
                labels,
                seconds,
            };
            log::info!(
                "{} on {}: {} clusters, {} noise points in {:.2}s",
                algorithm,
                dataset,
                cell.n_clusters(),
                cell.n_noise(),
                seconds
            );
            cells.push(cell);
        }

        Ok(Row {
            dataset,
            records,
            truth,
            cells,
        })
    }
}
