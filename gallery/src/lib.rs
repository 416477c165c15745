//! `clusterlab-gallery` draws the classic side by side comparison of clustering algorithms:
//! six two dimensional toy datasets, each clustered by ten algorithms with hand tuned
//! hyperparameters, rendered as a grid of scatter plots.
//!
//! The steps of a run are
//!
//! * generating and standard scaling every dataset ([`runner`])
//! * merging the base and per dataset hyperparameters ([`config`])
//! * fitting every algorithm and timing it ([`algorithms`])
//! * drawing the grid ([`plot`]) and optionally summarising it as JSON ([`report`])
//!
//! [`logging`] keeps the expected library warnings out of the output unless asked for.
pub mod algorithms;
pub mod cli;
pub mod config;
pub mod logging;
pub mod plot;
pub mod report;
pub mod runner;
