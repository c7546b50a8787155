use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use cnpj_scan_core::RunId;
use scan_logging::{scan_info, scan_warn};

use crate::client::{AnalysisClient, ReqwestAnalysisClient};
use crate::retry::StatusSink;
use crate::ticker::Ticker;
use crate::{ClientError, ClientSettings, EngineEvent};

enum EngineCommand {
    PreAnalyze { run_id: RunId, directory: String },
    Analyze { run_id: RunId, directory: String },
    StartTicker { interval: Duration },
    StopTicker,
    Download { excel_file: String, dest_dir: PathBuf },
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Runs requests and the simulation timer on a background tokio runtime and
/// reports back through [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

struct ChannelStatusSink {
    run_id: RunId,
    tx: mpsc::Sender<EngineEvent>,
}

impl StatusSink for ChannelStatusSink {
    fn status(&self, text: String) {
        let _ = self.tx.send(EngineEvent::Status {
            run_id: self.run_id,
            text,
        });
    }
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        let client = ReqwestAnalysisClient::new(settings)?;
        Self::with_client(Arc::new(client))
    }

    pub fn with_client(client: Arc<dyn AnalysisClient>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            let mut ticker = Ticker::new(runtime.handle().clone());
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::StartTicker { interval } => {
                        let tx = event_tx.clone();
                        ticker.start(interval, move || {
                            let _ = tx.send(EngineEvent::SimulationTick);
                        });
                    }
                    EngineCommand::StopTicker => ticker.stop(),
                    request => {
                        let client = client.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            handle_request(client.as_ref(), request, event_tx).await;
                        });
                    }
                }
            }
            ticker.stop();
            scan_info!("engine command channel closed");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn pre_analyze(&self, run_id: RunId, directory: impl Into<String>) {
        self.send(EngineCommand::PreAnalyze {
            run_id,
            directory: directory.into(),
        });
    }

    pub fn analyze(&self, run_id: RunId, directory: impl Into<String>) {
        self.send(EngineCommand::Analyze {
            run_id,
            directory: directory.into(),
        });
    }

    pub fn start_ticker(&self, interval: Duration) {
        self.send(EngineCommand::StartTicker { interval });
    }

    pub fn stop_ticker(&self) {
        self.send(EngineCommand::StopTicker);
    }

    pub fn download(&self, excel_file: impl Into<String>, dest_dir: PathBuf) {
        self.send(EngineCommand::Download {
            excel_file: excel_file.into(),
            dest_dir,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            scan_warn!("engine thread is gone; command dropped");
        }
    }
}

async fn handle_request(
    client: &dyn AnalysisClient,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::PreAnalyze { run_id, directory } => EngineEvent::PreAnalysisCompleted {
            run_id,
            result: client.pre_analyze(&directory).await,
        },
        EngineCommand::Analyze { run_id, directory } => {
            let sink = ChannelStatusSink {
                run_id,
                tx: event_tx.clone(),
            };
            EngineEvent::AnalysisCompleted {
                run_id,
                result: client.analyze(&directory, &sink).await,
            }
        }
        EngineCommand::Download {
            excel_file,
            dest_dir,
        } => {
            let result = client.download_report(&excel_file, &dest_dir).await;
            EngineEvent::DownloadCompleted { excel_file, result }
        }
        EngineCommand::StartTicker { .. } | EngineCommand::StopTicker => return,
    };
    let _ = event_tx.send(event);
}
