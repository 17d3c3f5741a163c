#![allow(dead_code)]

use std::sync::Once;

use jobsdb_core::{
    update, CrawlConfig, CrawlRequest, CrawlState, Effect, FailureRecord, FetchOutcome, JobItem,
    Msg, RequestContext,
};
use serde_json::json;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

/// Starts a crawl and returns the page-1 list request.
pub fn started(config: CrawlConfig) -> (CrawlState, CrawlRequest) {
    let state = CrawlState::new(config).expect("valid config");
    let (state, effects) = update(state, Msg::Start);
    let mut requests = submitted(&effects);
    assert_eq!(requests.len(), 1, "start submits exactly the first page");
    (state, requests.remove(0))
}

/// Starts a crawl whose first page holds a single job and returns that job's detail request.
pub fn with_one_detail(config: CrawlConfig) -> (CrawlState, CrawlRequest) {
    let (state, page_one) = started(config);
    let (state, effects) = respond(state, &page_one, 200, list_body(1, ["job-1"]));
    let mut details = detail_requests(&effects);
    assert_eq!(details.len(), 1);
    (state, details.remove(0))
}

pub fn respond(
    state: CrawlState,
    request: &CrawlRequest,
    status: u16,
    body: impl Into<String>,
) -> (CrawlState, Vec<Effect>) {
    update(
        state,
        Msg::FetchCompleted {
            request: request.clone(),
            outcome: FetchOutcome::Response {
                status,
                body: body.into(),
            },
        },
    )
}

pub fn submitted(effects: &[Effect]) -> Vec<CrawlRequest> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Submit(request) => Some(request.clone()),
            _ => None,
        })
        .collect()
}

pub fn detail_requests(effects: &[Effect]) -> Vec<CrawlRequest> {
    submitted(effects)
        .into_iter()
        .filter(|request| matches!(request.context, RequestContext::Detail(_)))
        .collect()
}

pub fn list_pages(effects: &[Effect]) -> Vec<u32> {
    submitted(effects)
        .into_iter()
        .filter_map(|request| match request.context {
            RequestContext::ListPage(query) => Some(query.page),
            RequestContext::Detail(_) => None,
        })
        .collect()
}

pub fn items(effects: &[Effect]) -> Vec<JobItem> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::EmitItem(item) => Some(item.clone()),
            _ => None,
        })
        .collect()
}

pub fn failures(effects: &[Effect]) -> Vec<FailureRecord> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::RecordFailure(record) => Some(record.clone()),
            _ => None,
        })
        .collect()
}

pub fn job_ids(range: std::ops::Range<u32>) -> Vec<String> {
    range.map(|n| format!("job-{n}")).collect()
}

pub fn list_body<I, S>(total: u64, ids: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let jobs: Vec<_> = ids
        .into_iter()
        .map(|id| {
            let id = id.as_ref();
            json!({
                "id": id,
                "jobTitle": format!("Title {id}"),
                "companyMeta": { "name": "Acme Ltd" },
                "jobUrl": format!("https://hk.example.com/job/{id}"),
                "employmentTypes": [{ "name": "Full Time" }, { "name": "Permanent" }],
                "categories": [{ "name": "Information Technology" }, { "name": "Banking" }],
                "careerLevelName": "Entry Level",
                "qualificationName": "Degree",
                "industry": { "name": "Finance" },
                "workExperienceName": "2 years"
            })
        })
        .collect();
    json!({ "data": { "jobs": { "total": total, "jobs": jobs } } }).to_string()
}

pub fn detail_body(benefits: &[&str]) -> String {
    json!({
        "data": { "jobDetail": { "jobDetail": { "jobRequirement": { "benefits": benefits } } } }
    })
    .to_string()
}
