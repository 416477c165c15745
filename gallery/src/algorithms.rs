//! The ten compared algorithms and how each one is configured from [`Params`]
use std::fmt;

use anyhow::Result;
use clap::ValueEnum;
use clusterlab::traits::{Fit, Predict, Transformer};
use clusterlab::DatasetBase;
use clusterlab_clustering::distance::Metric;
use clusterlab_clustering::{
    AffinityPropagation, AgglomerativeClustering, Birch, ClusterSize, Dbscan,
    GaussianMixtureModel, KMeans, Linkage, MeanShift, Optics, SpectralClustering,
};
use ndarray::{Array1, Array2};
use sprs::CsMat;

use crate::config::Params;

/// Samples drawn by every Mini-Batch K-Means iteration
pub const MINI_BATCH_SIZE: usize = 1024;
/// Neighbourhood size of DBSCAN core points, the point itself included
pub const DBSCAN_MIN_POINTS: usize = 5;

/// One column of the comparison grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum Algorithm {
    #[value(name = "minibatch-kmeans")]
    MiniBatchKMeans,
    #[value(name = "affinity-propagation")]
    AffinityPropagation,
    #[value(name = "meanshift")]
    MeanShift,
    #[value(name = "spectral")]
    SpectralClustering,
    #[value(name = "ward")]
    Ward,
    #[value(name = "agglomerative")]
    AgglomerativeClustering,
    #[value(name = "dbscan")]
    Dbscan,
    #[value(name = "optics")]
    Optics,
    #[value(name = "birch")]
    Birch,
    #[value(name = "gaussian-mixture")]
    GaussianMixture,
}

/// What every algorithm of a dataset row gets to work with
pub struct Inputs<'a> {
    /// Standard scaled records
    pub records: &'a Array2<f64>,
    /// MeanShift bandwidth estimated from the records
    pub bandwidth: f64,
    /// Symmetrised k-nearest neighbours graph of the records
    pub connectivity: &'a CsMat<f64>,
    pub params: &'a Params,
}

impl Algorithm {
    /// All algorithms in grid order
    pub fn all() -> [Algorithm; 10] {
        [
            Algorithm::MiniBatchKMeans,
            Algorithm::AffinityPropagation,
            Algorithm::MeanShift,
            Algorithm::SpectralClustering,
            Algorithm::Ward,
            Algorithm::AgglomerativeClustering,
            Algorithm::Dbscan,
            Algorithm::Optics,
            Algorithm::Birch,
            Algorithm::GaussianMixture,
        ]
    }

    /// Column title
    pub fn title(&self) -> &'static str {
        match self {
            Algorithm::MiniBatchKMeans => "MiniBatch KMeans",
            Algorithm::AffinityPropagation => "Affinity Propagation",
            Algorithm::MeanShift => "MeanShift",
            Algorithm::SpectralClustering => "Spectral Clustering",
            Algorithm::Ward => "Ward",
            Algorithm::AgglomerativeClustering => "Agglomerative Clustering",
            Algorithm::Dbscan => "DBSCAN",
            Algorithm::Optics => "OPTICS",
            Algorithm::Birch => "BIRCH",
            Algorithm::GaussianMixture => "Gaussian Mixture",
        }
    }

    /// Fit the algorithm and label every record, `None` marking noise
    pub fn fit_labels(&self, inputs: &Inputs) -> Result<Array1<Option<usize>>> {
        let params = inputs.params;
        let dataset = DatasetBase::from(inputs.records.view());

        let labels = match self {
            Algorithm::MiniBatchKMeans => {
                let model = KMeans::params(params.n_clusters)
                    .batch_size(MINI_BATCH_SIZE)
                    .fit(&dataset)?;
                let memberships: Array1<usize> = model.predict(inputs.records);
                assigned(&memberships)
            }
            Algorithm::AffinityPropagation => AffinityPropagation::params()
                .damping(params.damping)
                .preference(params.preference)
                .fit(&dataset)?
                .labels()
                .clone(),
            Algorithm::MeanShift => MeanShift::params(inputs.bandwidth)
                .bin_seeding(true)
                .fit(&dataset)?
                .labels()
                .clone(),
            Algorithm::SpectralClustering => assigned(
                SpectralClustering::params(params.n_clusters)
                    .fit(&dataset)?
                    .labels(),
            ),
            Algorithm::Ward => assigned(
                AgglomerativeClustering::params(params.n_clusters)
                    .linkage(Linkage::Ward)
                    .connectivity(inputs.connectivity.clone())
                    .fit(&dataset)?
                    .labels(),
            ),
            Algorithm::AgglomerativeClustering => assigned(
                AgglomerativeClustering::params(params.n_clusters)
                    .linkage(Linkage::Average)
                    .metric(Metric::L1)
                    .connectivity(inputs.connectivity.clone())
                    .fit(&dataset)?
                    .labels(),
            ),
            Algorithm::Dbscan => Dbscan::params(DBSCAN_MIN_POINTS)
                .tolerance(params.eps)
                .transform(inputs.records)?,
            Algorithm::Optics => Optics::params(params.min_samples)
                .transform(inputs.records.view())?
                .extract_xi(
                    params.xi,
                    ClusterSize::Fraction(params.min_cluster_size),
                    true,
                )?,
            Algorithm::Birch => assigned(
                Birch::params()
                    .n_clusters(Some(params.n_clusters))
                    .fit(&dataset)?
                    .labels(),
            ),
            Algorithm::GaussianMixture => assigned(
                GaussianMixtureModel::params(params.n_clusters)
                    .fit(&dataset)?
                    .labels(),
            ),
        };
        Ok(labels)
    }
}

/// Memberships of an algorithm that assigns every record
fn assigned(labels: &Array1<usize>) -> Array1<Option<usize>> {
    labels.mapv(Some)
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clusterlab::metrics::adjusted_rand_index;
    use clusterlab_clustering::neighbors::{kneighbors_graph, symmetrize};
    use clusterlab_datasets::generate;
    use ndarray::array;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn grid_order() {
        let titles: Vec<_> = Algorithm::all().iter().map(|a| a.title()).collect();
        assert_eq!(titles[0], "MiniBatch KMeans");
        assert_eq!(titles[4], "Ward");
        assert_eq!(titles[9], "Gaussian Mixture");
    }

    #[test]
    fn parses_command_line_names() {
        assert_eq!(Algorithm::from_str("dbscan", false), Ok(Algorithm::Dbscan));
        assert_eq!(
            Algorithm::from_str("minibatch-kmeans", false),
            Ok(Algorithm::MiniBatchKMeans)
        );
        assert!(Algorithm::from_str("hdbscan", false).is_err());
    }

    #[test]
    fn every_algorithm_labels_every_record() {
        let mut rng = Xoshiro256Plus::seed_from_u64(3);
        let centers = array![[-1.5, -1.5], [1.5, -1.5], [0., 1.5]];
        let (records, truth) =
            generate::make_blobs(120, &centers, &[0.15, 0.15, 0.15], &mut rng).unwrap();
        let connectivity = symmetrize(&kneighbors_graph(&records, 3, false).unwrap());
        let params = Params {
            preference: -20.,
            ..Params::default()
        };
        let inputs = Inputs {
            records: &records,
            bandwidth: 0.8,
            connectivity: &connectivity,
            params: &params,
        };

        for algorithm in Algorithm::all().iter() {
            let labels = algorithm.fit_labels(&inputs).unwrap();
            assert_eq!(labels.len(), 120, "{}", algorithm);
            if *algorithm != Algorithm::Optics {
                let labels = labels.as_slice().unwrap();
                let ari = adjusted_rand_index(truth.as_slice().unwrap(), labels).unwrap();
                assert!(ari > 0.95, "{} has ari {}", algorithm, ari);
            }
        }
    }
}
