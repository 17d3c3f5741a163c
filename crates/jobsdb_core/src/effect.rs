use crate::{CrawlRequest, CrawlStats, FailureRecord, JobItem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Hand a request to the fetcher. Retries arrive here too and must not be deduplicated.
    Submit(CrawlRequest),
    /// A fully merged job; the only visible result of a successful detail fetch.
    EmitItem(JobItem),
    /// Append to the failure sink.
    RecordFailure(FailureRecord),
    /// Nothing is in flight any more.
    Finished(CrawlStats),
}
