use std::path::PathBuf;

use clap::Parser;

/// Harvest job listings from the board's GraphQL search API.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "jobsdb-crawl", version)]
pub struct Cli {
    /// RON settings file; flags given here override its values.
    #[arg(long, short = 'c', env = "JOBSDB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory receiving items.jsonl, failed_requests.jsonl and the crawl summary.
    #[arg(long, short = 'o', default_value = "output")]
    pub output_dir: PathBuf,

    /// GraphQL endpoint, without query parameters.
    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(long)]
    pub country: Option<String>,

    #[arg(long)]
    pub locale: Option<String>,

    /// Stop after this many list pages.
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Retries per request before it is written to the failure file.
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Fixed delay before each retry, in milliseconds.
    #[arg(long)]
    pub backoff_ms: Option<u64>,

    /// Maximum requests in flight.
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Also write logs to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(long, short = 'v')]
    pub verbose: bool,
}
