//! Logger set up for the gallery binary
use env_logger::Builder;
use log::LevelFilter;

/// Target of the clustering crate, which warns about disconnected neighbour graphs
pub const CLUSTERING_TARGET: &str = "clusterlab_clustering";

/// Logger showing `info` and above
///
/// Unless `show_warnings` is set, records of the clustering crate are kept only from `error`
/// up. `directives` use the `RUST_LOG` syntax and are applied last, so they override both.
pub fn builder(show_warnings: bool, directives: Option<&str>) -> Builder {
    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Info);
    if !show_warnings {
        // disconnected neighbour graphs are expected on some datasets
        builder.filter_module(CLUSTERING_TARGET, LevelFilter::Error);
    }
    if let Some(directives) = directives {
        builder.parse_filters(directives);
    }
    builder
}
