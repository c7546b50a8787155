use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use cnpj_scan_core::simulator::LabelPicker;
use cnpj_scan_core::{update, AppState, DownloadState, Msg, Step, SummaryView};
use cnpj_scan_engine::{EngineEvent, EngineHandle};
use scan_logging::{scan_info, scan_warn};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::ui::render::{render, summary_commands};
use super::ui::terminal::TerminalUi;

/// How long the loop waits for an engine event before advancing the clock.
const POLL_INTERVAL: Duration = Duration::from_millis(75);
const PRE_ANALYSIS_RUN: u64 = 1;

pub struct WizardOptions {
    pub directory: String,
    /// Where the spreadsheet goes; no download when `None`.
    pub download_dir: Option<PathBuf>,
    /// Where the last directory is remembered.
    pub state_dir: PathBuf,
}

/// Drives the core state machine from engine events until the wizard
/// reaches the results step or a run fails.
struct Wizard<W: Write> {
    state: AppState,
    runner: EffectRunner,
    ui: TerminalUi<W>,
}

impl<W: Write> Wizard<W> {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let view = state.consume_dirty().then(|| state.view());
        self.state = state;

        self.runner.enqueue(effects);
        if let Some(view) = view {
            self.ui.apply(render(&view));
        }
    }

    fn run(&mut self, directory: String, wants_download: bool) -> Result<()> {
        self.dispatch(Msg::DirectoryChanged(directory));
        self.dispatch(Msg::Submitted);
        if self.state.step() == Step::Select {
            bail!(cnpj_scan_core::EMPTY_DIRECTORY_MESSAGE);
        }

        let mut download_requested = false;
        let mut last = Instant::now();
        loop {
            if let Some(msg) = self.runner.next_msg(POLL_INTERVAL) {
                self.dispatch(msg);
            }
            let now = Instant::now();
            self.dispatch(Msg::Tick {
                elapsed: now - last,
            });
            last = now;

            match self.state.step() {
                Step::Select => {
                    let message = self
                        .state
                        .banner()
                        .map(|banner| banner.message.clone())
                        .unwrap_or_else(|| "analysis was cancelled".to_string());
                    return Err(anyhow!(message));
                }
                Step::Analyze => {}
                Step::Results => {
                    if !wants_download {
                        return Ok(());
                    }
                    if !download_requested {
                        download_requested = true;
                        self.dispatch(Msg::DownloadClicked);
                    }
                    match self.state.view().download {
                        DownloadState::NotRequested => {
                            scan_warn!("server did not name a report to download");
                            return Ok(());
                        }
                        DownloadState::InProgress => {}
                        DownloadState::Saved(_) => return Ok(()),
                        DownloadState::Failed(message) => bail!("download failed: {message}"),
                    }
                }
            }
        }
    }
}

pub fn run_wizard(config: &AppConfig, options: WizardOptions) -> Result<()> {
    let engine = EngineHandle::new(config.client.clone())?;
    let wants_download = options.download_dir.is_some();
    let download_dir = options.download_dir.unwrap_or_else(|| PathBuf::from("."));
    let runner = EffectRunner::new(engine, download_dir, options.state_dir);

    let mut wizard = Wizard {
        state: AppState::with_simulator(config.simulator, LabelPicker::new(label_seed())),
        runner,
        ui: TerminalUi::stdout(),
    };
    scan_info!("Starting analysis of {}", options.directory);
    wizard.run(options.directory, wants_download)
}

/// Asks the server for the directory summary only and prints it with the
/// language chart and insights.
pub fn run_pre_analysis(config: &AppConfig, directory: &str) -> Result<()> {
    let directory = directory.trim();
    if directory.is_empty() {
        bail!(cnpj_scan_core::EMPTY_DIRECTORY_MESSAGE);
    }

    let engine = EngineHandle::new(config.client.clone())?;
    engine.pre_analyze(PRE_ANALYSIS_RUN, directory);
    let timeout = config.client.request_timeout + config.client.connect_timeout;
    let result = loop {
        match engine.recv_timeout(timeout) {
            Some(EngineEvent::PreAnalysisCompleted { result, .. }) => break result,
            Some(_) => continue,
            None => bail!("no answer from the server within {timeout:?}"),
        }
    };

    let stats = result.map_err(|err| {
        let failure = err.into_failure();
        if failure.unreachable {
            anyhow!("{}: is the server running?", failure.message)
        } else {
            anyhow!(failure.message)
        }
    })?;
    let mut ui = TerminalUi::stdout();
    ui.apply(summary_commands(&SummaryView::from_stats(&stats)));
    Ok(())
}

fn label_seed() -> u64 {
    let micros = Utc::now().timestamp_micros().unsigned_abs();
    micros ^ (u64::from(std::process::id()) << 32)
}
