use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use jobsdb_core::{CrawlRequest, CrawlStats, Effect, FetchOutcome, Msg, RequestContext};
use jobsdb_engine::{
    EngineEvent, EngineHandle, FetchError, HttpMethod, HttpRequest, HttpResponse,
    JsonLinesWriter,
};

/// Executes core effects against the engine and the output sinks.
pub(crate) struct EffectRunner {
    engine: EngineHandle<CrawlRequest>,
    items: JsonLinesWriter,
    failures: JsonLinesWriter,
}

impl EffectRunner {
    pub(crate) fn new(
        engine: EngineHandle<CrawlRequest>,
        items: JsonLinesWriter,
        failures: JsonLinesWriter,
    ) -> Self {
        Self {
            engine,
            items,
            failures,
        }
    }

    /// Returns the final stats once the effects include the end of the crawl.
    pub(crate) fn apply(&mut self, effects: Vec<Effect>) -> Option<CrawlStats> {
        let mut finished = None;
        for effect in effects {
            match effect {
                Effect::Submit(request) => self.submit(request),
                Effect::EmitItem(item) => {
                    engine_debug!("item job_id={}", item.job_id);
                    if let Err(err) = self.items.append(&item) {
                        engine_error!(
                            "Failed to write item {} to {}: {}",
                            item.job_id,
                            self.items.path().display(),
                            err
                        );
                    }
                }
                Effect::RecordFailure(record) => {
                    engine_warn!(
                        "Giving up on {} (status {:?})",
                        record.url,
                        record.status
                    );
                    if let Err(err) = self.failures.append(&record) {
                        engine_error!(
                            "Failed to write failure record to {}: {}",
                            self.failures.path().display(),
                            err
                        );
                    }
                }
                Effect::Finished(stats) => finished = Some(stats),
            }
        }
        finished
    }

    /// Blocks until the engine reports the next completed fetch.
    pub(crate) fn next_msg(&self) -> Option<Msg> {
        self.engine.recv().map(|event| match event {
            EngineEvent::Completed { context, result } => Msg::FetchCompleted {
                request: context,
                outcome: map_outcome(result),
            },
        })
    }

    fn submit(&self, request: CrawlRequest) {
        if request.attempt > 0 {
            engine_info!(
                "Retrying {} attempt {} after {}ms",
                describe(&request.context),
                request.attempt,
                request.delay.as_millis()
            );
        }
        let http = HttpRequest {
            method: HttpMethod::Post,
            url: request.url.clone(),
            headers: request.headers.clone(),
            body: Some(request.body.clone()),
        };
        let delay = request.delay;
        self.engine.submit(http, delay, request);
    }
}

fn describe(context: &RequestContext) -> String {
    match context {
        RequestContext::ListPage(query) => format!("list page {}", query.page),
        RequestContext::Detail(summary) => format!("detail for job {}", summary.id),
    }
}

fn map_outcome(result: Result<HttpResponse, FetchError>) -> FetchOutcome {
    match result {
        Ok(response) => FetchOutcome::Response {
            status: response.status,
            body: response.body,
        },
        Err(err) => FetchOutcome::TransportError {
            message: err.to_string(),
        },
    }
}
