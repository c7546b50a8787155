//! cnpj-scan core: pure wizard state machine, progress simulation, result
//! view-models and CNPJ checks.
pub mod cnpj;
mod effect;
mod model;
mod msg;
pub mod render;
pub mod simulator;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use model::{AnalysisReport, DirectoryStats, ImpactFinding, RequestFailure, RunId, Severity};
pub use msg::Msg;
pub use state::{AppState, Banner, DownloadState, Step, BANNER_TIMEOUT, EMPTY_DIRECTORY_MESSAGE};
pub use update::update;
pub use view_model::{AppViewModel, ProgressView, SummaryView};
