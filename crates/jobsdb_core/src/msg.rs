#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Begin the crawl with the page-1 list query.
    Start,
    /// The fetcher finished a submitted request, successfully or not.
    FetchCompleted {
        request: crate::CrawlRequest,
        outcome: crate::FetchOutcome,
    },
}
