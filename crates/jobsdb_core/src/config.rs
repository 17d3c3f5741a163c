use url::Url;

use crate::RetryPolicy;

pub const DEFAULT_ENDPOINT: &str = "https://xapi.supercharge-srp.co/job-search/graphql";
pub const DEFAULT_COUNTRY: &str = "hk";
pub const DEFAULT_LOCALE: &str = "en";
/// Page size the board uses for its search results; it cannot be requested.
pub const DEFAULT_JOB_PER_PAGE: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    pub endpoint: String,
    pub country: String,
    pub locale: String,
    pub job_per_page: u32,
    /// Optional cap on how many list pages are walked.
    pub max_pages: Option<u32>,
    pub retry: RetryPolicy,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            job_per_page: DEFAULT_JOB_PER_PAGE,
            max_pages: None,
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid endpoint {endpoint}: {message}")]
    InvalidEndpoint { endpoint: String, message: String },
    #[error("job_per_page must be at least 1")]
    ZeroJobsPerPage,
    #[error("max_pages must be at least 1 when set")]
    ZeroMaxPages,
}

impl CrawlConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.job_per_page == 0 {
            return Err(ConfigError::ZeroJobsPerPage);
        }
        if self.max_pages == Some(0) {
            return Err(ConfigError::ZeroMaxPages);
        }
        self.request_url().map(|_| ())
    }

    /// Endpoint with the board's `country` and `isSmartSearch` query parameters.
    ///
    /// Both list and detail queries are POSTed to this same URL.
    pub fn request_url(&self) -> Result<String, ConfigError> {
        let mut url = Url::parse(&self.endpoint).map_err(|err| ConfigError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            message: err.to_string(),
        })?;
        url.query_pairs_mut()
            .append_pair("country", &self.country)
            .append_pair("isSmartSearch", "true");
        Ok(url.to_string())
    }
}
