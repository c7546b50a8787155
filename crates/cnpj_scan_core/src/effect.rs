use std::time::Duration;

use crate::RunId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST the directory to `/pre-analyze`.
    PreAnalyze { run_id: RunId, directory: String },
    /// POST the directory to `/analyze` through the retrying client.
    Analyze { run_id: RunId, directory: String },
    /// Schedule the simulation timer, replacing any timer already running.
    StartTicker { interval: Duration },
    /// Release the simulation timer. Safe to repeat.
    StopTicker,
    /// Fetch `/download/{excel_file}`.
    DownloadReport { excel_file: String },
    /// Persist the directory as the default for the next run.
    RememberDirectory { directory: String },
}
