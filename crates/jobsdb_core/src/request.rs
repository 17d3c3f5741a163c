use std::time::Duration;

use crate::{JobSummary, PageQuery};

pub type RequestId = u64;

/// What a response must be merged into once it arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestContext {
    ListPage(PageQuery),
    Detail(JobSummary),
}

/// A request descriptor handed to the fetcher. Always sent as a POST.
///
/// The fetcher returns it untouched alongside the response, so everything the
/// core needs to resume lives here rather than in shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    pub id: RequestId,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub context: RequestContext,
    /// Failures seen so far for this fetch; 0 when first issued.
    pub attempt: u32,
    /// How long the fetcher should wait before sending.
    pub delay: Duration,
}

impl CrawlRequest {
    pub(crate) fn retried(&self, backoff: Duration) -> Self {
        Self {
            attempt: self.attempt + 1,
            delay: backoff,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Response { status: u16, body: String },
    TransportError { message: String },
}
