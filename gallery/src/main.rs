use std::env;

use anyhow::Result;
use clap::Parser;

use clusterlab_gallery::cli::Args;
use clusterlab_gallery::config::Config;
use clusterlab_gallery::logging;
use clusterlab_gallery::plot;
use clusterlab_gallery::report::Report;
use clusterlab_gallery::runner::Run;

fn main() -> Result<()> {
    let args = Args::parse();
    let directives = env::var(env_logger::DEFAULT_FILTER_ENV).ok();
    logging::builder(args.show_warnings, directives.as_deref()).init();

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let datasets = args.datasets();
    let algorithms = args.algorithms();

    let rows = Run {
        config: &config,
        datasets: &datasets,
        algorithms: &algorithms,
        n_samples: args.n_samples,
        seed: args.seed,
    }
    .execute()?;

    plot::render(&rows, &args.output)?;
    if let Some(path) = &args.report {
        Report::new(&rows, args.n_samples, args.seed)?.write(path)?;
    }
    Ok(())
}
