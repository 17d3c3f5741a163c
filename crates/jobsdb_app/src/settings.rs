//! Crawl settings: built-in defaults, then an optional RON file, then CLI flags.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use engine_logging::engine_info;
use jobsdb_core::CrawlConfig;
use jobsdb_engine::FetchSettings;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Every field is optional; absent fields keep the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub endpoint: Option<String>,
    pub country: Option<String>,
    pub locale: Option<String>,
    pub job_per_page: Option<u32>,
    pub max_pages: Option<u32>,
    pub max_attempts: Option<u32>,
    pub backoff_ms: Option<u64>,
    pub retryable_statuses: Option<Vec<u16>>,
    pub concurrency: Option<usize>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub crawl: CrawlConfig,
    pub fetch: FetchSettings,
}

pub fn load_settings_file(path: &Path) -> Result<SettingsFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file {}", path.display()))?;
    let file: SettingsFile = ron::from_str(&content)
        .with_context(|| format!("failed to parse settings file {}", path.display()))?;
    engine_info!("Loaded crawl settings from {:?}", path);
    Ok(file)
}

/// Resolves the settings for a run from `cli` and the file it points at, if any.
pub fn resolve(cli: &Cli) -> Result<RunSettings> {
    let file = match &cli.config {
        Some(path) => load_settings_file(path)?,
        None => SettingsFile::default(),
    };
    file.overlay(cli).into_run_settings()
}

impl SettingsFile {
    /// Flags given on the command line win over file values.
    pub fn overlay(self, cli: &Cli) -> Self {
        Self {
            endpoint: cli.endpoint.clone().or(self.endpoint),
            country: cli.country.clone().or(self.country),
            locale: cli.locale.clone().or(self.locale),
            max_pages: cli.max_pages.or(self.max_pages),
            max_attempts: cli.max_attempts.or(self.max_attempts),
            backoff_ms: cli.backoff_ms.or(self.backoff_ms),
            concurrency: cli.concurrency.or(self.concurrency),
            ..self
        }
    }

    pub fn into_run_settings(self) -> Result<RunSettings> {
        let mut crawl = CrawlConfig::default();
        if let Some(endpoint) = self.endpoint {
            crawl.endpoint = endpoint;
        }
        if let Some(country) = self.country {
            crawl.country = country;
        }
        if let Some(locale) = self.locale {
            crawl.locale = locale;
        }
        if let Some(job_per_page) = self.job_per_page {
            crawl.job_per_page = job_per_page;
        }
        crawl.max_pages = self.max_pages;
        if let Some(max_attempts) = self.max_attempts {
            crawl.retry.max_attempts = max_attempts;
        }
        if let Some(backoff_ms) = self.backoff_ms {
            crawl.retry.backoff_delay = Duration::from_millis(backoff_ms);
        }
        if let Some(statuses) = self.retryable_statuses {
            crawl.retry.retryable_statuses = statuses.into_iter().collect();
        }
        crawl.validate().context("invalid crawl settings")?;

        let mut fetch = FetchSettings::default();
        if let Some(concurrency) = self.concurrency {
            anyhow::ensure!(concurrency > 0, "concurrency must be at least 1");
            fetch.max_concurrency = concurrency;
        }
        if let Some(secs) = self.request_timeout_secs {
            fetch.request_timeout = Duration::from_secs(secs);
        }

        Ok(RunSettings { crawl, fetch })
    }
}
