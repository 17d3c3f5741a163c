use crate::graphql::{self, ListPage};
use crate::{
    CrawlPhase, CrawlRequest, CrawlState, Effect, FailedAttempt, FailureRecord, FetchOutcome, Msg,
    RequestContext, ResponseClass, RetryDecision,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: CrawlState, msg: Msg) -> (CrawlState, Vec<Effect>) {
    let mut effects = match msg {
        Msg::Start => {
            if state.phase() != CrawlPhase::Idle {
                return (state, Vec::new());
            }
            state.begin();
            vec![Effect::Submit(state.list_request(1))]
        }
        Msg::FetchCompleted { request, outcome } => {
            // Completions for settled fetches or superseded attempts are stale.
            if !state.is_awaiting(&request) {
                return (state, Vec::new());
            }
            on_fetch_completed(&mut state, &request, outcome)
        }
    };

    if state.phase() == CrawlPhase::Running && state.in_flight_count() == 0 {
        state.finish();
        effects.push(Effect::Finished(*state.stats()));
    }

    (state, effects)
}

fn on_fetch_completed(
    state: &mut CrawlState,
    request: &CrawlRequest,
    outcome: FetchOutcome,
) -> Vec<Effect> {
    let (status, body) = match outcome {
        FetchOutcome::Response { status, body } => (status, body),
        FetchOutcome::TransportError { message } => {
            let failure = FailedAttempt {
                status: None,
                body: message,
            };
            return retry_or_exhaust(state, request, failure);
        }
    };

    let failure = |body: String| FailedAttempt {
        status: Some(status),
        body,
    };
    match state.config().retry.classify(status) {
        ResponseClass::Retryable => retry_or_exhaust(state, request, failure(body)),
        ResponseClass::Permanent => {
            state.settle(request.id);
            state.record_failure();
            vec![Effect::RecordFailure(FailureRecord {
                url: request.url.clone(),
                status: Some(status),
                body,
            })]
        }
        // A 2xx whose body lacks the expected envelope is retried like a failed status.
        ResponseClass::Success => match &request.context {
            RequestContext::ListPage(query) => match graphql::parse_list_response(&body) {
                // The page count is taken from the first response that carries a total.
                Ok(list)
                    if list.total.is_some() || state.pagination().total_pages().is_some() =>
                {
                    state.settle(request.id);
                    on_list_page(state, query.page, list)
                }
                _ => retry_or_exhaust(state, request, failure(body)),
            },
            RequestContext::Detail(summary) => match graphql::parse_detail_response(&body) {
                Ok(benefits) => {
                    state.settle(request.id);
                    state.record_item();
                    vec![Effect::EmitItem(summary.clone().into_item(benefits))]
                }
                Err(_) => retry_or_exhaust(state, request, failure(body)),
            },
        },
    }
}

fn on_list_page(state: &mut CrawlState, page: u32, list: ListPage) -> Vec<Effect> {
    state.record_page(list.total, list.skipped);

    let mut effects = Vec::with_capacity(list.jobs.len() + 1);
    for summary in list.jobs {
        effects.push(Effect::Submit(state.issue(RequestContext::Detail(summary))));
    }
    if state.wants_page_after(page) {
        effects.push(Effect::Submit(state.list_request(page + 1)));
    }
    effects
}

fn retry_or_exhaust(
    state: &mut CrawlState,
    request: &CrawlRequest,
    failure: FailedAttempt,
) -> Vec<Effect> {
    let decision = state.config().retry.on_failure(request, failure);
    match decision {
        RetryDecision::Retry(next) => {
            state.track_retry(&next);
            vec![Effect::Submit(next)]
        }
        RetryDecision::Exhausted(record) => {
            state.settle(request.id);
            state.record_failure();
            vec![Effect::RecordFailure(record)]
        }
    }
}
