use super::AgglomerativeParamsError;
use crate::distance::Metric;
use clusterlab::{Float, ParamGuard};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};
use sprs::CsMat;

/// How the distance between two clusters is derived from the distances of their members
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Linkage {
    /// Increase of the within-cluster variance caused by the merge
    Ward,
    /// Mean distance between the members of both clusters
    Average,
    /// Largest distance between the members of both clusters
    Complete,
    /// Smallest distance between the members of both clusters
    Single,
}

#[derive(Clone, Debug, PartialEq)]
/// The set of hyperparameters that can be specified for the execution of
/// the [agglomerative clustering algorithm](crate::AgglomerativeClustering).
pub struct AgglomerativeValidParams<F: Float> {
    /// Number of clusters left when merging stops
    n_clusters: usize,
    linkage: Linkage,
    metric: Metric,
    /// Only clusters adjacent in this graph may be merged
    connectivity: Option<CsMat<F>>,
}

#[derive(Clone, Debug, PartialEq)]
/// An helper struct used to construct a set of [valid hyperparameters](AgglomerativeValidParams)
/// for the [agglomerative clustering algorithm](crate::AgglomerativeClustering) (using the
/// builder pattern).
pub struct AgglomerativeParams<F: Float>(AgglomerativeValidParams<F>);

impl<F: Float> AgglomerativeParams<F> {
    /// Defaults are provided if optional parameters are not specified:
    /// * `linkage = Linkage::Ward`
    /// * `metric = Metric::L2`
    /// * `connectivity = None` (every pair of clusters may be merged)
    pub fn new(n_clusters: usize) -> Self {
        Self(AgglomerativeValidParams {
            n_clusters,
            linkage: Linkage::Ward,
            metric: Metric::L2,
            connectivity: None,
        })
    }

    pub fn linkage(mut self, linkage: Linkage) -> Self {
        self.0.linkage = linkage;
        self
    }

    pub fn metric(mut self, metric: Metric) -> Self {
        self.0.metric = metric;
        self
    }

    /// Restrict merges to clusters containing samples adjacent in `connectivity`
    ///
    /// The graph has one row per sample and is taken as undirected.
    pub fn connectivity(mut self, connectivity: CsMat<F>) -> Self {
        self.0.connectivity = Some(connectivity);
        self
    }
}

impl<F: Float> ParamGuard for AgglomerativeParams<F> {
    type Checked = AgglomerativeValidParams<F>;
    type Error = AgglomerativeParamsError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if self.0.n_clusters == 0 {
            return Err(AgglomerativeParamsError::NClusters);
        }
        if self.0.linkage == Linkage::Ward && self.0.metric != Metric::L2 {
            return Err(AgglomerativeParamsError::WardMetric);
        }
        match &self.0.connectivity {
            Some(graph) if graph.rows() != graph.cols() => Err(
                AgglomerativeParamsError::ConnectivityShape(graph.rows(), graph.cols()),
            ),
            _ => Ok(&self.0),
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float> AgglomerativeValidParams<F> {
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    pub fn linkage(&self) -> Linkage {
        self.linkage
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn connectivity(&self) -> Option<&CsMat<F>> {
        self.connectivity.as_ref()
    }
}
