use std::time::Duration;

use crate::simulator::{LabelPicker, ProgressSimulator, SimulationStart, SimulatorConfig, TickOutcome};
use crate::view_model::{AppViewModel, ProgressView, SummaryView};
use crate::{render, AnalysisReport, DirectoryStats, RequestFailure, RunId};

/// How long the error banner stays up unless dismissed.
pub const BANNER_TIMEOUT: Duration = Duration::from_secs(10);

const BANNER_PREFIX: &str = "Connection to the server failed. ";
const UNREACHABLE_HINT: &str = "Check your connection and that the server is running.";
pub const EMPTY_DIRECTORY_MESSAGE: &str = "Please select a directory";

/// Wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    Select,
    Analyze,
    Results,
}

impl Step {
    pub fn number(self) -> u8 {
        match self {
            Step::Select => 1,
            Step::Analyze => 2,
            Step::Results => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub shown_for: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DownloadState {
    #[default]
    NotRequested,
    InProgress,
    Saved(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    step: Step,
    directory_input: String,
    active_directory: Option<String>,
    last_run_id: RunId,
    current_run: Option<RunId>,
    status: String,
    inline_error: Option<String>,
    banner: Option<Banner>,
    stats: Option<DirectoryStats>,
    report: Option<AnalysisReport>,
    simulator: ProgressSimulator,
    download: DownloadState,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_simulator(config: SimulatorConfig, labels: LabelPicker) -> Self {
        Self {
            simulator: ProgressSimulator::new(config, labels),
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        let analyzing = self.step == Step::Analyze;
        let summary = self
            .stats
            .as_ref()
            .filter(|_| analyzing)
            .map(SummaryView::from_stats);
        let progress = if analyzing && self.stats.is_some() {
            let state = self.simulator.state();
            Some(ProgressView {
                processed: state.processed,
                total: state.total,
                percent: state.percent(),
                label: state.label.clone(),
                running: self.simulator.is_running(),
            })
        } else {
            None
        };
        let results = self
            .report
            .as_ref()
            .filter(|_| self.step == Step::Results)
            .map(|report| render::build_results(&report.findings));

        AppViewModel {
            step: self.step,
            directory: self.directory_input.clone(),
            status: self.status.clone(),
            inline_error: self.inline_error.clone(),
            banner: self.banner.as_ref().map(|b| b.message.clone()),
            summary,
            progress,
            results,
            excel_file: self.report.as_ref().and_then(|r| r.excel_file.clone()),
            download: self.download.clone(),
            dirty: self.dirty,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn current_run(&self) -> Option<RunId> {
        self.current_run
    }

    pub fn simulator(&self) -> &ProgressSimulator {
        &self.simulator
    }

    pub fn stats(&self) -> Option<&DirectoryStats> {
        self.stats.as_ref()
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Returns whether a render is needed and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_directory_input(&mut self, text: String) {
        self.directory_input = text;
        self.inline_error = None;
        self.mark_dirty();
    }

    pub(crate) fn set_status(&mut self, text: impl Into<String>) {
        self.status = text.into();
        self.mark_dirty();
    }

    /// A reply belongs to the live run regardless of which step is shown.
    pub(crate) fn is_current(&self, run_id: RunId) -> bool {
        self.current_run == Some(run_id)
    }

    /// Validates the input and moves to step 2. Returns the run id and the
    /// trimmed directory, or `None` when the input was rejected.
    pub(crate) fn begin_run(&mut self) -> Option<(RunId, String)> {
        let directory = self.directory_input.trim().to_string();
        if directory.is_empty() {
            self.inline_error = Some(EMPTY_DIRECTORY_MESSAGE.to_string());
            self.mark_dirty();
            return None;
        }

        self.simulator.cancel();
        self.last_run_id += 1;
        let run_id = self.last_run_id;
        self.current_run = Some(run_id);
        self.active_directory = Some(directory.clone());
        self.stats = None;
        self.report = None;
        self.banner = None;
        self.inline_error = None;
        self.download = DownloadState::NotRequested;
        self.step = Step::Analyze;
        self.set_status("Analyzing project structure...");
        Some((run_id, directory))
    }

    /// Stores the summary and starts the simulation. Returns the directory
    /// to analyse and whether the timer must be scheduled.
    pub(crate) fn accept_stats(&mut self, stats: DirectoryStats) -> (Option<String>, bool) {
        let total = if stats.methods == 0 {
            self.simulator.config().fallback_total
        } else {
            stats.methods
        };
        let total = i64::try_from(total).unwrap_or(i64::MAX);
        let started = self.simulator.start(total);
        self.stats = Some(stats);
        self.set_status("Analyzing impacts with AI...");
        (
            self.active_directory.clone(),
            matches!(started, SimulationStart::Running { .. }),
        )
    }

    pub(crate) fn tick_interval(&self) -> Duration {
        self.simulator.config().tick_interval
    }

    pub(crate) fn tick_simulation(&mut self) -> TickOutcome {
        let outcome = self.simulator.tick();
        if outcome != TickOutcome::Ignored {
            self.mark_dirty();
        }
        outcome
    }

    pub(crate) fn accept_report(&mut self, report: AnalysisReport) {
        self.simulator.cancel();
        self.current_run = None;
        self.report = Some(report);
        self.step = Step::Results;
        self.set_status("Analysis complete");
    }

    pub(crate) fn fail_run(&mut self, failure: RequestFailure) {
        self.simulator.cancel();
        self.current_run = None;
        self.stats = None;
        let detail = if failure.unreachable {
            UNREACHABLE_HINT.to_string()
        } else {
            failure.message
        };
        self.banner = Some(Banner {
            message: format!("{BANNER_PREFIX}{detail}"),
            shown_for: Duration::ZERO,
        });
        self.step = Step::Select;
        self.set_status(String::new());
    }

    /// Returns the spreadsheet name when a download may start.
    pub(crate) fn request_download(&mut self) -> Option<String> {
        if self.step != Step::Results || self.download == DownloadState::InProgress {
            return None;
        }
        let excel_file = self.report.as_ref()?.excel_file.clone()?;
        self.download = DownloadState::InProgress;
        self.mark_dirty();
        Some(excel_file)
    }

    pub(crate) fn finish_download(&mut self, result: Result<String, String>) {
        if self.download != DownloadState::InProgress {
            return;
        }
        self.download = match result {
            Ok(path) => DownloadState::Saved(path),
            Err(message) => DownloadState::Failed(message),
        };
        self.mark_dirty();
    }

    pub(crate) fn go_to(&mut self, step: Step) {
        if self.step != step {
            self.step = step;
            self.mark_dirty();
        }
    }

    pub(crate) fn reset(&mut self) {
        self.simulator.cancel();
        self.current_run = None;
        self.stats = None;
        self.report = None;
        self.download = DownloadState::NotRequested;
        self.step = Step::Select;
        self.set_status(String::new());
    }

    pub(crate) fn dismiss_banner(&mut self) {
        if self.banner.take().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn advance_clock(&mut self, elapsed: Duration) {
        let expired = match self.banner.as_mut() {
            Some(banner) => {
                banner.shown_for += elapsed;
                banner.shown_for >= BANNER_TIMEOUT
            }
            None => false,
        };
        if expired {
            self.dismiss_banner();
        }
    }
}
