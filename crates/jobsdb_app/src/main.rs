use std::process::ExitCode;

use clap::Parser;
use engine_logging::{engine_error, engine_warn, LogDestination};
use jobsdb_app::cli::Cli;
use jobsdb_app::{run_crawl, settings};
use log::LevelFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let destination = match &cli.log_file {
        Some(path) => LogDestination::Both(path.clone()),
        None => LogDestination::Terminal,
    };
    engine_logging::initialize(destination, level);

    let result = settings::resolve(&cli).and_then(|settings| run_crawl(settings, &cli.output_dir));
    match result {
        Ok(stats) if stats.failures > 0 => {
            engine_warn!(
                "{} requests failed; see {}",
                stats.failures,
                cli.output_dir.join(jobsdb_app::FAILURES_FILENAME).display()
            );
            ExitCode::SUCCESS
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            engine_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
