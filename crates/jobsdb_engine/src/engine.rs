use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_debug, engine_warn};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::{EngineEvent, FailureKind, FetchError, HttpRequest, HttpResponse};

enum EngineCommand<C> {
    Submit {
        request: HttpRequest,
        delay: Duration,
        context: C,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(FetchError),
}

/// Runs fetches on a background tokio runtime and reports completions over a channel.
///
/// `C` is opaque caller context. It travels with the request and comes back
/// unchanged in [`EngineEvent::Completed`]. Submissions are never deduplicated.
pub struct EngineHandle<C> {
    cmd_tx: mpsc::Sender<EngineCommand<C>>,
    event_rx: mpsc::Receiver<EngineEvent<C>>,
    shutdown: CancellationToken,
}

impl<C: Send + 'static> EngineHandle<C> {
    pub fn new(settings: FetchSettings) -> Result<Self, EngineError> {
        let max_concurrency = settings.max_concurrency;
        let fetcher = ReqwestFetcher::new(settings).map_err(EngineError::Client)?;
        Self::with_fetcher(Arc::new(fetcher), max_concurrency)
    }

    pub fn with_fetcher(
        fetcher: Arc<dyn Fetcher>,
        max_concurrency: usize,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand<C>>();
        let (event_tx, event_rx) = mpsc::channel();
        let permits = Arc::new(Semaphore::new(max_concurrency.max(1)));
        let shutdown = CancellationToken::new();
        let cancelled = shutdown.clone();

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let fetcher = fetcher.clone();
                let permits = permits.clone();
                let event_tx = event_tx.clone();
                let cancelled = cancelled.clone();
                runtime.spawn(async move {
                    tokio::select! {
                        _ = cancelled.cancelled() => {}
                        _ = handle_command(fetcher, &permits, command, event_tx) => {}
                    }
                });
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx,
            shutdown,
        })
    }

    /// Queue `request`; the engine waits `delay` before sending it.
    pub fn submit(&self, request: HttpRequest, delay: Duration, context: C) {
        engine_debug!(
            "submit {:?} {} delay={}ms",
            request.method,
            request.url,
            delay.as_millis()
        );
        let command = EngineCommand::Submit {
            request,
            delay,
            context,
        };
        if self.cmd_tx.send(command).is_err() {
            engine_warn!("engine thread is gone; request dropped");
        }
    }

    /// Blocks until the next completion.
    pub fn recv(&self) -> Option<EngineEvent<C>> {
        self.event_rx.recv().ok()
    }
}

/// Dropping the handle abandons everything still in flight.
impl<C> Drop for EngineHandle<C> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_command<C>(
    fetcher: Arc<dyn Fetcher>,
    permits: &Semaphore,
    command: EngineCommand<C>,
    event_tx: mpsc::Sender<EngineEvent<C>>,
) {
    match command {
        EngineCommand::Submit {
            request,
            delay,
            context,
        } => {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let result = match permits.acquire().await {
                Ok(_permit) => run_fetch(fetcher, request.clone()).await,
                Err(_) => Err(FetchError::new(FailureKind::Cancelled, "engine closed")),
            };
            if let Err(err) = &result {
                engine_debug!("fetch {} failed: {}", request.url, err);
            }
            let _ = event_tx.send(EngineEvent::Completed { context, result });
        }
    }
}

/// Runs the fetch on its own task so a panicking fetcher still yields a completion.
async fn run_fetch(
    fetcher: Arc<dyn Fetcher>,
    request: HttpRequest,
) -> Result<HttpResponse, FetchError> {
    let url = request.url.clone();
    match tokio::spawn(async move { fetcher.fetch(&request).await }).await {
        Ok(result) => result,
        Err(err) => {
            engine_warn!("fetch task for {} failed: {}", url, err);
            Err(FetchError::new(FailureKind::Panicked, err.to_string()))
        }
    }
}
