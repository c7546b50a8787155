//! cnpj-scan engine: server client, retry, simulation timer and local IO.
mod client;
mod engine;
mod estimate;
mod persist;
mod registry;
mod retry;
mod settings;
mod ticker;
mod types;

pub use client::{AnalysisClient, ReqwestAnalysisClient};
pub use engine::{EngineError, EngineHandle};
pub use estimate::{estimate_directory, EstimateError, LocalEstimate};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use registry::{RegistryError, SqliteRegistry};
pub use retry::{retry_with_backoff, NullStatusSink, RetryPolicy, StatusSink};
pub use settings::{ClientSettings, DEFAULT_SERVER_URL};
pub use ticker::Ticker;
pub use types::{ClientError, EngineEvent, FailureKind};
