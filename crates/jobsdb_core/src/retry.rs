use std::collections::BTreeSet;
use std::time::Duration;

use crate::{CrawlRequest, FailureRecord};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_BACKOFF_DELAY: Duration = Duration::from_millis(133);
/// The board answers 400/403/404 intermittently for valid queries, so these
/// client errors are retried like server errors.
pub const DEFAULT_RETRYABLE_STATUSES: [u16; 4] = [400, 403, 404, 500];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed per fetch; the fetch is exhausted on the failure after the last one.
    pub max_attempts: u32,
    /// Fixed wait before each retry. Not exponential.
    pub backoff_delay: Duration,
    pub retryable_statuses: BTreeSet<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_delay: DEFAULT_BACKOFF_DELAY,
            retryable_statuses: DEFAULT_RETRYABLE_STATUSES.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    Success,
    Retryable,
    /// Non-2xx outside the retryable set.
    Permanent,
}

/// A failed attempt, as it will appear in the failure record if it is the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAttempt {
    pub status: Option<u16>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    Retry(CrawlRequest),
    Exhausted(FailureRecord),
}

impl RetryPolicy {
    pub fn classify(&self, status: u16) -> ResponseClass {
        if self.retryable_statuses.contains(&status) {
            ResponseClass::Retryable
        } else if (200..300).contains(&status) {
            ResponseClass::Success
        } else {
            ResponseClass::Permanent
        }
    }

    pub fn on_failure(&self, request: &CrawlRequest, failure: FailedAttempt) -> RetryDecision {
        if request.attempt < self.max_attempts {
            RetryDecision::Retry(request.retried(self.backoff_delay))
        } else {
            RetryDecision::Exhausted(FailureRecord {
                url: request.url.clone(),
                status: failure.status,
                body: failure.body,
            })
        }
    }
}
