use std::path::{Path, PathBuf};

use jobsdb_core::CrawlStats;
use jobsdb_engine::{AtomicFileWriter, PersistError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlSummary {
    pub started_utc: String,
    pub finished_utc: String,
    pub endpoint: String,
    pub total_pages: Option<u32>,
    pub stats: CrawlStats,
}

pub(crate) fn write_summary(
    output_dir: &Path,
    filename: &str,
    summary: &CrawlSummary,
) -> Result<PathBuf, PersistError> {
    let content = serde_json::to_string_pretty(summary)?;
    AtomicFileWriter::new(output_dir.to_path_buf()).write(filename, &content)
}
