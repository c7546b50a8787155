use std::path::PathBuf;
use std::time::Duration;

use cnpj_scan_core::{Effect, Msg};
use cnpj_scan_engine::{EngineEvent, EngineHandle};
use scan_logging::{scan_info, scan_warn};

use super::persistence;

/// Carries core effects to the engine and engine events back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
    download_dir: PathBuf,
    state_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, download_dir: PathBuf, state_dir: PathBuf) -> Self {
        Self {
            engine,
            download_dir,
            state_dir,
        }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::PreAnalyze { run_id, directory } => {
                    scan_info!("PreAnalyze run_id={} directory={}", run_id, directory);
                    self.engine.pre_analyze(run_id, directory);
                }
                Effect::Analyze { run_id, directory } => {
                    scan_info!("Analyze run_id={} directory={}", run_id, directory);
                    self.engine.analyze(run_id, directory);
                }
                Effect::StartTicker { interval } => self.engine.start_ticker(interval),
                Effect::StopTicker => self.engine.stop_ticker(),
                Effect::DownloadReport { excel_file } => {
                    scan_info!("Download {} into {:?}", excel_file, self.download_dir);
                    self.engine.download(excel_file, self.download_dir.clone());
                }
                Effect::RememberDirectory { directory } => {
                    persistence::save_last_directory(&self.state_dir, &directory);
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine event.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(map_event)
    }
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Status { run_id, text } => Msg::StatusChanged { run_id, text },
        EngineEvent::PreAnalysisCompleted { run_id, result } => match result {
            Ok(stats) => Msg::PreAnalysisDone { run_id, stats },
            Err(err) => {
                scan_warn!("Pre-analysis {} failed ({}): {}", run_id, err.kind, err);
                Msg::RequestFailed {
                    run_id,
                    failure: err.into_failure(),
                }
            }
        },
        EngineEvent::AnalysisCompleted { run_id, result } => match result {
            Ok(report) => Msg::AnalysisDone { run_id, report },
            Err(err) => {
                scan_warn!("Analysis {} failed ({}): {}", run_id, err.kind, err);
                Msg::RequestFailed {
                    run_id,
                    failure: err.into_failure(),
                }
            }
        },
        EngineEvent::SimulationTick => Msg::SimulationTick,
        EngineEvent::DownloadCompleted { excel_file, result } => Msg::DownloadFinished {
            result: match result {
                Ok(path) => Ok(path.display().to_string()),
                Err(err) => {
                    scan_warn!("Download of {} failed: {}", excel_file, err);
                    Err(err.to_string())
                }
            },
        },
    }
}
