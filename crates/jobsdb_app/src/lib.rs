//! Crawl driver: feeds engine completions through the core state machine and
//! executes the resulting effects.
pub mod cli;
mod runner;
pub mod settings;
mod summary;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use engine_logging::{engine_error, engine_info};
use jobsdb_core::{update, CrawlState, CrawlStats, Msg};
use jobsdb_engine::{ensure_output_dir, EngineHandle, JsonLinesWriter};

use runner::EffectRunner;
pub use settings::RunSettings;
pub use summary::CrawlSummary;

pub const ITEMS_FILENAME: &str = "items.jsonl";
pub const FAILURES_FILENAME: &str = "failed_requests.jsonl";
pub const SUMMARY_FILENAME: &str = "crawl_summary.json";

/// Runs one crawl to completion, writing its output under `output_dir`.
///
/// Only startup problems are errors. Failed fetches end up in the failure
/// file and never stop the crawl.
pub fn run_crawl(settings: RunSettings, output_dir: &Path) -> Result<CrawlStats> {
    ensure_output_dir(output_dir)
        .with_context(|| format!("output directory {} is unusable", output_dir.display()))?;
    let state = CrawlState::new(settings.crawl).context("invalid crawl settings")?;
    let endpoint = state.config().endpoint.clone();
    let engine = EngineHandle::new(settings.fetch).context("failed to start fetch engine")?;
    let items = JsonLinesWriter::open(output_dir.join(ITEMS_FILENAME))
        .context("failed to open items file")?;
    let failures = JsonLinesWriter::open(output_dir.join(FAILURES_FILENAME))
        .context("failed to open failure file")?;
    let mut runner = EffectRunner::new(engine, items, failures);

    let started_utc = Utc::now().to_rfc3339();
    engine_info!("Crawl started against {}", endpoint);

    let (mut state, effects) = update(state, Msg::Start);
    let mut finished = runner.apply(effects);
    let stats = loop {
        if let Some(stats) = finished {
            break stats;
        }
        let Some(msg) = runner.next_msg() else {
            anyhow::bail!(
                "fetch engine stopped with {} requests in flight",
                state.in_flight_count()
            );
        };
        let (next, effects) = update(state, msg);
        state = next;
        finished = runner.apply(effects);
    };

    engine_info!(
        "Crawl finished: pages={} items={} retries={} failures={} skipped={}",
        stats.pages_fetched,
        stats.items_emitted,
        stats.retries,
        stats.failures,
        stats.jobs_skipped
    );

    let report = CrawlSummary {
        started_utc,
        finished_utc: Utc::now().to_rfc3339(),
        endpoint,
        total_pages: state.pagination().total_pages(),
        stats,
    };
    if let Err(err) = summary::write_summary(output_dir, SUMMARY_FILENAME, &report) {
        engine_error!("Failed to write crawl summary: {}", err);
    }

    Ok(stats)
}
