use std::fmt;
use std::path::PathBuf;

use cnpj_scan_core::{AnalysisReport, DirectoryStats, RequestFailure, RunId};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Human-readable progress for a run (retry attempts).
    Status { run_id: RunId, text: String },
    PreAnalysisCompleted {
        run_id: RunId,
        result: Result<DirectoryStats, ClientError>,
    },
    AnalysisCompleted {
        run_id: RunId,
        result: Result<AnalysisReport, ClientError>,
    },
    /// One period of the simulation timer elapsed.
    SimulationTick,
    DownloadCompleted {
        excel_file: String,
        result: Result<PathBuf, ClientError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ClientError {
    pub kind: FailureKind,
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The server could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        self.kind == FailureKind::Connect
    }

    pub fn into_failure(self) -> RequestFailure {
        if self.is_unreachable() {
            RequestFailure::unreachable(self.message)
        } else {
            RequestFailure::new(self.message)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Connect,
    Network,
    /// The response body was not the expected JSON.
    Decode,
    /// The server answered with an `error` field.
    Application,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Connect => write!(f, "connection failed"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "invalid response body"),
            FailureKind::Application => write!(f, "server error"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Io => write!(f, "io error"),
        }
    }
}
