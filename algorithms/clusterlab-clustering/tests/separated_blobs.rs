use clusterlab::metrics::adjusted_rand_index;
use clusterlab::traits::{Fit, Predict, Transformer};
use clusterlab::{DatasetBase, Label};
use clusterlab_clustering::{
    AffinityPropagation, AgglomerativeClustering, Birch, Dbscan, GaussianMixtureModel, KMeans,
    Linkage, MeanShift, Optics, SpectralClustering,
};
use clusterlab_datasets::generate;
use ndarray::{array, Array1, Array2};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

fn separated_blobs() -> (Array2<f64>, Array1<usize>) {
    let mut rng = Xoshiro256Plus::seed_from_u64(5);
    let centers = array![[-2., -2.], [2., -2.], [0., 2.]];
    generate::make_blobs(150, &centers, &[0.2, 0.2, 0.2], &mut rng).unwrap()
}

fn assert_recovers<L: Label>(name: &str, truth: &Array1<usize>, labels: &Array1<L>) {
    assert_eq!(labels.len(), truth.len(), "{}", name);
    let ari = adjusted_rand_index(truth.as_slice().unwrap(), labels.as_slice().unwrap()).unwrap();
    assert!((ari - 1.).abs() < 1e-9, "{} has ari {}", name, ari);
}

#[test]
fn centroid_based_estimators() {
    let (records, truth) = separated_blobs();
    let dataset = DatasetBase::from(records.clone());

    let kmeans = KMeans::params(3).fit(&dataset).unwrap();
    let labels: Array1<usize> = kmeans.predict(&records);
    assert_recovers("k-means", &truth, &labels);

    let mini_batch = KMeans::params(3).batch_size(50).fit(&dataset).unwrap();
    let labels: Array1<usize> = mini_batch.predict(&records);
    assert_recovers("mini-batch k-means", &truth, &labels);

    let gmm = GaussianMixtureModel::params(3).fit(&dataset).unwrap();
    assert_recovers("gaussian mixture", &truth, gmm.labels());

    let birch = Birch::params().fit(&dataset).unwrap();
    assert_recovers("birch", &truth, birch.labels());
}

#[test]
fn message_passing_and_mode_seeking() {
    let (records, truth) = separated_blobs();
    let dataset = DatasetBase::from(records);

    let affinity = AffinityPropagation::params()
        .damping(0.9)
        .preference(-20.)
        .fit(&dataset)
        .unwrap();
    assert!(affinity.converged());
    assert_recovers("affinity propagation", &truth, affinity.labels());

    let mean_shift = MeanShift::params(1.).fit(&dataset).unwrap();
    assert_eq!(mean_shift.cluster_centers().nrows(), 3);
    assert_recovers("mean shift", &truth, mean_shift.labels());
}

#[test]
fn graph_and_hierarchy_based_estimators() {
    let (records, truth) = separated_blobs();
    let dataset = DatasetBase::from(records);

    let spectral = SpectralClustering::params(3).fit(&dataset).unwrap();
    assert_recovers("spectral", &truth, spectral.labels());

    for linkage in [Linkage::Ward, Linkage::Average] {
        let model = AgglomerativeClustering::params(3)
            .linkage(linkage)
            .fit(&dataset)
            .unwrap();
        assert_recovers(&format!("{:?} linkage", linkage), &truth, model.labels());
    }
}

#[test]
fn density_based_estimators() {
    let (records, truth) = separated_blobs();

    // With a std of 0.2 a sample 1.0 away from its centre is a 5 sigma draw, while the closest
    // centres are 4.0 apart: every sample has a dense neighbourhood and the blobs never chain.
    let dbscan = Dbscan::params(5)
        .tolerance(1.0)
        .transform(&records)
        .unwrap();
    assert!(dbscan.iter().all(|label| label.is_some()));
    assert_recovers("dbscan", &truth, &dbscan);

    let analysis = Optics::params(5).transform(records.view()).unwrap();
    let optics = analysis.extract_dbscan(1.0);
    assert!(optics.iter().all(|label| label.is_some()));
    assert_recovers("optics", &truth, &optics);
}
