//! `clusterlab-clustering` provides pure Rust implementations of the clustering algorithms
//! compared by the `clusterlab` gallery.
//!
//! ## The big picture
//!
//! `clusterlab-clustering` is a crate in the `clusterlab` workspace. Every estimator is
//! configured through a builder, validated with [`ParamGuard`](clusterlab::ParamGuard) and
//! fitted through the [`Fit`](clusterlab::traits::Fit) or
//! [`Transformer`](clusterlab::traits::Transformer) traits of the core crate.
//!
//! ## Current state
//!
//! Right now `clusterlab-clustering` provides the following clustering algorithms:
//! * [K-Means](KMeans), including its mini-batch variant
//! * [Affinity Propagation](AffinityPropagation)
//! * [MeanShift](MeanShift)
//! * [Spectral Clustering](SpectralClustering)
//! * [Agglomerative Clustering](AgglomerativeClustering) with Ward, average, complete and
//! single linkage
//! * [DBSCAN](Dbscan)
//! * [OPTICS](OpticsAnalysis)
//! * [BIRCH](Birch)
//! * [Gaussian-Mixture-Model](GaussianMixtureModel)
//!
//! The [`neighbors`] module holds the neighbour queries and graphs shared by the estimators,
//! such as the k-nearest-neighbours connectivity graph and the MeanShift bandwidth estimate.
//! They run on the spatial indices of `clusterlab-nn`, whose distance metrics are re-exported
//! as [`distance`].
//!
//! Implementation choices, algorithmic details and tutorials can be found in the page dedicated to the specific algorithms.
mod affinity_propagation;
mod birch;
mod dbscan;
mod gaussian_mixture;
mod hierarchical;
#[allow(clippy::new_ret_no_self)]
mod k_means;
mod mean_shift;
pub mod neighbors;
mod optics;
mod spectral;

pub use affinity_propagation::*;
pub use birch::*;
pub use dbscan::*;
pub use gaussian_mixture::*;
pub use hierarchical::*;
pub use k_means::*;
pub use mean_shift::*;
pub use optics::*;
pub use spectral::*;

pub use clusterlab_nn::distance;
pub use clusterlab_nn::CommonNearestNeighbour;
