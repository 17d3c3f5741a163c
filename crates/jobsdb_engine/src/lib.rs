//! Crawl engine: HTTP fetching, background execution and on-disk sinks.
mod decode;
mod engine;
mod fetch;
mod persist;
mod types;

pub use decode::decode_body;
pub use engine::{EngineError, EngineHandle};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use persist::{ensure_output_dir, AtomicFileWriter, JsonLinesWriter, PersistError};
pub use types::{EngineEvent, FailureKind, FetchError, HttpMethod, HttpRequest, HttpResponse};
