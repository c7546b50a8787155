use std::time::Duration;

use crate::{AnalysisReport, DirectoryStats, RequestFailure, RunId, Step};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the directory input.
    DirectoryChanged(String),
    /// User submitted the analysis form.
    Submitted,
    /// Human-readable progress from the engine (retry attempts and the like).
    StatusChanged { run_id: RunId, text: String },
    /// Server pre-analysis summary arrived.
    PreAnalysisDone { run_id: RunId, stats: DirectoryStats },
    /// Server analysis finished.
    AnalysisDone { run_id: RunId, report: AnalysisReport },
    /// Pre-analysis or analysis failed for good.
    RequestFailed {
        run_id: RunId,
        failure: RequestFailure,
    },
    /// Periodic timer tick for the progress simulation.
    SimulationTick,
    /// User asked for the report spreadsheet.
    DownloadClicked,
    /// Report download finished with the saved path or an error message.
    DownloadFinished { result: Result<String, String> },
    /// User picked a wizard step from the navigation.
    StepSelected(Step),
    /// User reset the analysis.
    ResetClicked,
    /// User closed the error banner.
    BannerDismissed,
    /// UI/render tick carrying the time since the previous one.
    Tick { elapsed: Duration },
    /// Fallback for placeholder wiring.
    NoOp,
}
