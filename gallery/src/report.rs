//! JSON summary of a run, one entry per cell of the grid
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clusterlab::metrics::adjusted_rand_index;
use serde::{Deserialize, Serialize};

use crate::runner::Row;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellReport {
    pub dataset: String,
    pub algorithm: String,
    pub seconds: f64,
    pub n_clusters: usize,
    pub n_noise: usize,
    /// Adjusted Rand index against the labels the dataset was generated with
    pub ari: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub n_samples: usize,
    pub seed: u64,
    pub cells: Vec<CellReport>,
}

impl Report {
    pub fn new(rows: &[Row], n_samples: usize, seed: u64) -> Result<Report> {
        let mut cells = Vec::new();
        for row in rows {
            let truth = row.truth.to_vec();
            for cell in &row.cells {
                let labels = cell.labels.to_vec();
                let ari = adjusted_rand_index(truth.as_slice(), labels.as_slice())
                    .with_context(|| format!("scoring {} on {}", cell.algorithm, row.dataset))?;
                cells.push(CellReport {
                    dataset: row.dataset.name().to_string(),
                    algorithm: cell.algorithm.title().to_string(),
                    seconds: cell.seconds,
                    n_clusters: cell.n_clusters(),
                    n_noise: cell.n_noise(),
                    ari,
                });
            }
        }
        Ok(Report {
            n_samples,
            seed,
            cells,
        })
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("cannot create report {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        log::info!("report written to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::Algorithm;
    use crate::runner::Cell;
    use approx::assert_abs_diff_eq;
    use clusterlab_datasets::gallery::GalleryDataset;
    use ndarray::{array, Array2};

    fn row() -> Row {
        Row {
            dataset: GalleryDataset::Blobs,
            records: Array2::zeros((4, 2)),
            truth: array![0, 0, 1, 1],
            cells: vec![
                Cell {
                    algorithm: Algorithm::Dbscan,
                    labels: array![Some(1), Some(1), Some(0), None],
                    seconds: 0.25,
                },
                Cell {
                    algorithm: Algorithm::Birch,
                    labels: array![Some(2), Some(2), Some(0), Some(0)],
                    seconds: 0.5,
                },
            ],
        }
    }

    #[test]
    fn one_entry_per_cell() {
        let report = Report::new(&[row()], 4, 30).unwrap();
        assert_eq!(report.cells.len(), 2);

        let dbscan = &report.cells[0];
        assert_eq!(dbscan.dataset, "blobs");
        assert_eq!(dbscan.algorithm, "DBSCAN");
        assert_eq!(dbscan.n_clusters, 2);
        assert_eq!(dbscan.n_noise, 1);
        assert!(dbscan.ari < 1.);

        let birch = &report.cells[1];
        assert_eq!(birch.n_noise, 0);
        assert_abs_diff_eq!(birch.ari, 1.);
    }

    #[test]
    fn serialises_to_json() {
        let report = Report::new(&[row()], 4, 30).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["seed"], 30);
        assert_eq!(json["cells"][1]["algorithm"], "BIRCH");
        assert_eq!(json["cells"][1]["n_clusters"], 2);

        let back: Report = serde_json::from_value(json).unwrap();
        assert_eq!(back.cells.len(), 2);
        assert_eq!(back.cells[0].dataset, "blobs");
    }
}
