//! Crawl core: pure pagination, fan-out and retry state machine.
mod config;
mod effect;
pub mod graphql;
mod model;
mod msg;
mod request;
mod retry;
mod state;
mod update;

pub use config::{
    ConfigError, CrawlConfig, DEFAULT_COUNTRY, DEFAULT_ENDPOINT, DEFAULT_JOB_PER_PAGE,
    DEFAULT_LOCALE,
};
pub use effect::Effect;
pub use graphql::{ListPage, ParseError};
pub use model::{FailureRecord, JobItem, JobSummary, PageQuery};
pub use msg::Msg;
pub use request::{CrawlRequest, FetchOutcome, RequestContext, RequestId};
pub use retry::{
    FailedAttempt, ResponseClass, RetryDecision, RetryPolicy, DEFAULT_BACKOFF_DELAY,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRYABLE_STATUSES,
};
pub use state::{pages_for, CrawlPhase, CrawlState, CrawlStats, PaginationState};
pub use update::update;
