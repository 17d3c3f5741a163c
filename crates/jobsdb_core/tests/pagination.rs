mod common;

use common::{
    detail_requests, init_logging, items, job_ids, list_body, list_pages, respond, started,
    submitted,
};
use jobsdb_core::{
    pages_for, update, CrawlConfig, CrawlPhase, CrawlStats, Effect, Msg, PageQuery,
    RequestContext,
};
use pretty_assertions::assert_eq;

#[test]
fn start_issues_first_list_query() {
    init_logging();
    let (state, request) = started(CrawlConfig::default());

    assert_eq!(state.phase(), CrawlPhase::Running);
    assert_eq!(state.pagination().total_pages(), None);
    assert_eq!(
        request.url,
        "https://xapi.supercharge-srp.co/job-search/graphql?country=hk&isSmartSearch=true"
    );
    assert_eq!(
        request.context,
        RequestContext::ListPage(PageQuery {
            page: 1,
            locale: "en".to_string(),
        })
    );
    assert!(request.body.contains(r#"jobs(page: 1, locale: \"en\")"#));
    assert_eq!(request.attempt, 0);
}

#[test]
fn start_is_ignored_once_running() {
    init_logging();
    let (state, _) = started(CrawlConfig::default());
    let (state, effects) = update(state, Msg::Start);

    assert!(effects.is_empty());
    assert_eq!(state.in_flight_count(), 1);
}

#[test]
fn sixty_one_jobs_span_three_pages() {
    init_logging();
    let (state, page_one) = started(CrawlConfig::default());

    let (state, effects) = respond(state, &page_one, 200, list_body(61, job_ids(0..30)));
    assert_eq!(state.pagination().total_pages(), Some(3));
    assert_eq!(detail_requests(&effects).len(), 30);
    assert_eq!(list_pages(&effects), vec![2]);

    let page_two = submitted(&effects).pop().unwrap();
    let (state, effects) = respond(state, &page_two, 200, list_body(61, job_ids(30..60)));
    assert_eq!(detail_requests(&effects).len(), 30);
    assert_eq!(list_pages(&effects), vec![3]);

    let page_three = submitted(&effects).pop().unwrap();
    let (state, effects) = respond(state, &page_three, 200, list_body(61, job_ids(60..61)));
    assert_eq!(detail_requests(&effects).len(), 1);
    assert!(list_pages(&effects).is_empty());
    assert_eq!(state.stats().pages_fetched, 3);
    assert_eq!(state.in_flight_count(), 61);
}

#[test]
fn total_pages_is_settled_by_first_response_only() {
    init_logging();
    let (state, page_one) = started(CrawlConfig::default());
    let (state, effects) = respond(state, &page_one, 200, list_body(61, job_ids(0..30)));
    let page_two = submitted(&effects).pop().unwrap();

    // The board's total grows mid-crawl; pagination must not follow it.
    let (state, effects) = respond(state, &page_two, 200, list_body(900, job_ids(30..60)));
    assert_eq!(state.pagination().total_pages(), Some(3));
    let page_three = submitted(&effects).pop().unwrap();

    let (state, effects) = respond(state, &page_three, 200, list_body(900, job_ids(60..90)));
    assert_eq!(state.pagination().total_pages(), Some(3));
    assert!(list_pages(&effects).is_empty());
}

#[test]
fn page_count_is_ceiling_of_total_over_page_size() {
    assert_eq!(pages_for(0, 30), 0);
    assert_eq!(pages_for(1, 30), 1);
    assert_eq!(pages_for(30, 30), 1);
    assert_eq!(pages_for(31, 30), 2);
    assert_eq!(pages_for(61, 30), 3);
    assert_eq!(pages_for(u64::MAX, 1), u32::MAX);
}

#[test]
fn empty_first_page_finishes_without_looping() {
    init_logging();
    let (state, page_one) = started(CrawlConfig::default());
    let (state, effects) = respond(state, &page_one, 200, list_body(0, Vec::<String>::new()));

    assert_eq!(state.pagination().total_pages(), Some(0));
    assert!(submitted(&effects).is_empty());
    assert_eq!(state.phase(), CrawlPhase::Finished);
    assert_eq!(
        effects,
        vec![Effect::Finished(CrawlStats {
            pages_fetched: 1,
            ..CrawlStats::default()
        })]
    );
}

#[test]
fn later_page_without_total_is_still_harvested() {
    init_logging();
    let (state, page_one) = started(CrawlConfig::default());
    let (state, effects) = respond(state, &page_one, 200, list_body(61, job_ids(0..30)));
    let page_two = submitted(&effects).pop().unwrap();

    let body = r#"{"data":{"jobs":{"total":null,"jobs":[{"id":"x1"}]}}}"#;
    let (state, effects) = respond(state, &page_two, 200, body);

    let details = detail_requests(&effects);
    assert_eq!(details.len(), 1);
    match &details[0].context {
        RequestContext::Detail(summary) => assert_eq!(summary.id, "x1"),
        other => panic!("unexpected context {other:?}"),
    }
    assert_eq!(list_pages(&effects), vec![3]);
    assert_eq!(state.pagination().total_pages(), Some(3));
    assert_eq!(state.stats().retries, 0);
}

#[test]
fn first_page_without_total_is_retried() {
    init_logging();
    let (state, page_one) = started(CrawlConfig::default());
    let body = r#"{"data":{"jobs":{"total":null,"jobs":[{"id":"x1"}]}}}"#;
    let (state, effects) = respond(state, &page_one, 200, body);

    let retried = submitted(&effects);
    assert_eq!(retried.len(), 1);
    assert_eq!(retried[0].id, page_one.id);
    assert_eq!(retried[0].attempt, 1);
    assert!(detail_requests(&effects).is_empty());
    assert_eq!(state.pagination().total_pages(), None);
    assert_eq!(state.stats().pages_fetched, 0);
}

#[test]
fn entries_without_id_are_skipped() {
    init_logging();
    let (state, page_one) = started(CrawlConfig::default());
    let body = serde_json::json!({
        "data": { "jobs": { "total": 3, "jobs": [
            { "id": "", "jobTitle": "blank" },
            { "jobTitle": "missing" },
            { "id": 4242, "jobTitle": "numeric" }
        ] } }
    })
    .to_string();

    let (state, effects) = respond(state, &page_one, 200, body);
    let details = detail_requests(&effects);
    assert_eq!(details.len(), 1);
    match &details[0].context {
        RequestContext::Detail(summary) => assert_eq!(summary.id, "4242"),
        other => panic!("unexpected context {other:?}"),
    }
    assert_eq!(state.stats().jobs_skipped, 2);
}

#[test]
fn detail_request_carries_summary_snapshot() {
    init_logging();
    let (state, page_one) = started(CrawlConfig::default());
    let (_state, effects) = respond(state, &page_one, 200, list_body(1, ["abc"]));
    let detail = detail_requests(&effects).pop().unwrap();

    assert!(detail
        .body
        .contains(r#"jobDetail(jobId: \"abc\", locale: \"en\", country: \"hk\")"#));
    match detail.context {
        RequestContext::Detail(summary) => {
            assert_eq!(summary.id, "abc");
            assert_eq!(summary.title.as_deref(), Some("Title abc"));
            assert_eq!(summary.company.as_deref(), Some("Acme Ltd"));
            assert_eq!(summary.job_function, "Information Technology, Banking");
            assert_eq!(summary.job_type, "Full Time, Permanent");
        }
        other => panic!("unexpected context {other:?}"),
    }
}

#[test]
fn max_pages_caps_pagination() {
    init_logging();
    let config = CrawlConfig {
        max_pages: Some(1),
        ..CrawlConfig::default()
    };
    let (state, page_one) = started(config);
    let (state, effects) = respond(state, &page_one, 200, list_body(61, job_ids(0..30)));

    assert_eq!(state.pagination().total_pages(), Some(3));
    assert!(list_pages(&effects).is_empty());
    assert_eq!(detail_requests(&effects).len(), 30);
}

#[test]
fn crawl_finishes_after_last_detail_settles() {
    init_logging();
    let (state, page_one) = started(CrawlConfig::default());
    let (state, effects) = respond(state, &page_one, 200, list_body(2, ["a", "b"]));
    let details = detail_requests(&effects);

    let (state, effects) = respond(state, &details[1], 200, common::detail_body(&["Bonus"]));
    assert_eq!(items(&effects).len(), 1);
    assert_eq!(state.phase(), CrawlPhase::Running);

    let (state, effects) = respond(state, &details[0], 200, common::detail_body(&[]));
    assert_eq!(state.phase(), CrawlPhase::Finished);
    assert_eq!(
        effects.last(),
        Some(&Effect::Finished(CrawlStats {
            pages_fetched: 1,
            items_emitted: 2,
            ..CrawlStats::default()
        }))
    );

    // Late duplicates after the crawl has ended change nothing.
    let (state, effects) = respond(state, &details[0], 200, common::detail_body(&[]));
    assert!(effects.is_empty());
    assert_eq!(state.stats().items_emitted, 2);
}
