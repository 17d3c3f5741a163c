use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::graphql;
use crate::{
    ConfigError, CrawlConfig, CrawlRequest, PageQuery, RequestContext, RequestId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrawlPhase {
    #[default]
    Idle,
    Running,
    Finished,
}

/// Page count of the crawl, settled by the first successful list response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    total_pages: Option<u32>,
    job_per_page: u32,
}

impl PaginationState {
    pub fn new(job_per_page: u32) -> Self {
        Self {
            total_pages: None,
            job_per_page,
        }
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// First write wins; later totals are ignored. Returns the settled page count.
    pub fn discover(&mut self, total_jobs: u64) -> u32 {
        let per_page = self.job_per_page;
        *self
            .total_pages
            .get_or_insert_with(|| pages_for(total_jobs, per_page))
    }

    pub fn has_page_after(&self, page: u32) -> bool {
        self.total_pages.is_some_and(|total| page < total)
    }
}

/// `ceil(total_jobs / job_per_page)`, saturating at `u32::MAX`.
pub fn pages_for(total_jobs: u64, job_per_page: u32) -> u32 {
    if job_per_page == 0 {
        return 0;
    }
    let pages = total_jobs.div_ceil(u64::from(job_per_page));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CrawlStats {
    pub pages_fetched: u64,
    pub items_emitted: u64,
    pub jobs_skipped: u64,
    pub retries: u64,
    pub failures: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlState {
    config: CrawlConfig,
    request_url: String,
    phase: CrawlPhase,
    pagination: PaginationState,
    /// Outstanding fetches and the attempt each one is currently on.
    in_flight: BTreeMap<RequestId, u32>,
    next_request_id: RequestId,
    stats: CrawlStats,
}

impl CrawlState {
    pub fn new(config: CrawlConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let request_url = config.request_url()?;
        Ok(Self {
            pagination: PaginationState::new(config.job_per_page),
            config,
            request_url,
            phase: CrawlPhase::Idle,
            in_flight: BTreeMap::new(),
            next_request_id: 0,
            stats: CrawlStats::default(),
        })
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    pub(crate) fn begin(&mut self) {
        self.phase = CrawlPhase::Running;
    }

    pub(crate) fn finish(&mut self) {
        self.phase = CrawlPhase::Finished;
    }

    /// True when `request` is the attempt currently awaited for its fetch.
    pub(crate) fn is_awaiting(&self, request: &CrawlRequest) -> bool {
        self.phase == CrawlPhase::Running
            && self.in_flight.get(&request.id) == Some(&request.attempt)
    }

    pub(crate) fn list_request(&mut self, page: u32) -> CrawlRequest {
        let query = PageQuery {
            page,
            locale: self.config.locale.clone(),
        };
        self.issue(RequestContext::ListPage(query))
    }

    pub(crate) fn issue(&mut self, context: RequestContext) -> CrawlRequest {
        self.next_request_id += 1;
        let id = self.next_request_id;
        let body = match &context {
            RequestContext::ListPage(query) => graphql::list_query_body(query),
            RequestContext::Detail(summary) => {
                graphql::detail_query_body(&summary.id, &self.config.locale, &self.config.country)
            }
        };
        self.in_flight.insert(id, 0);
        CrawlRequest {
            id,
            url: self.request_url.clone(),
            headers: graphql::request_headers(),
            body,
            context,
            attempt: 0,
            delay: Duration::ZERO,
        }
    }

    pub(crate) fn track_retry(&mut self, request: &CrawlRequest) {
        self.in_flight.insert(request.id, request.attempt);
        self.stats.retries += 1;
    }

    pub(crate) fn settle(&mut self, id: RequestId) {
        self.in_flight.remove(&id);
    }

    pub(crate) fn record_page(&mut self, total_jobs: Option<u64>, skipped: usize) {
        self.stats.pages_fetched += 1;
        self.stats.jobs_skipped += skipped as u64;
        if let Some(total_jobs) = total_jobs {
            self.pagination.discover(total_jobs);
        }
    }

    pub(crate) fn record_item(&mut self) {
        self.stats.items_emitted += 1;
    }

    pub(crate) fn record_failure(&mut self) {
        self.stats.failures += 1;
    }

    /// Whether the list page after `page` exists and is within the optional page cap.
    pub(crate) fn wants_page_after(&self, page: u32) -> bool {
        self.pagination.has_page_after(page) && self.config.max_pages.map_or(true, |cap| page < cap)
    }
}
