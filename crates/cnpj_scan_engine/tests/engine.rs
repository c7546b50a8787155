use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use cnpj_scan_core::{AnalysisReport, DirectoryStats};
use cnpj_scan_engine::{AnalysisClient, ClientError, EngineEvent, EngineHandle, StatusSink};

const WAIT: Duration = Duration::from_secs(2);

struct FakeClient;

#[async_trait::async_trait]
impl AnalysisClient for FakeClient {
    async fn pre_analyze(&self, directory: &str) -> Result<DirectoryStats, ClientError> {
        Ok(DirectoryStats {
            files: directory.len() as u64,
            ..DirectoryStats::default()
        })
    }

    async fn analyze(
        &self,
        _directory: &str,
        sink: &dyn StatusSink,
    ) -> Result<AnalysisReport, ClientError> {
        sink.status("Attempt 2 of 3...".to_string());
        Ok(AnalysisReport {
            findings: Vec::new(),
            excel_file: Some("out.xlsx".to_string()),
        })
    }

    async fn download_report(
        &self,
        excel_file: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, ClientError> {
        Ok(dest_dir.join(excel_file))
    }
}

fn engine() -> EngineHandle {
    EngineHandle::with_client(Arc::new(FakeClient)).expect("engine")
}

fn next_non_tick(engine: &EngineHandle) -> EngineEvent {
    loop {
        match engine.recv_timeout(WAIT).expect("event") {
            EngineEvent::SimulationTick => continue,
            event => return event,
        }
    }
}

#[test]
fn pre_analysis_result_carries_run_id() {
    let engine = engine();
    engine.pre_analyze(7, "/abc");

    match next_non_tick(&engine) {
        EngineEvent::PreAnalysisCompleted { run_id, result } => {
            assert_eq!(run_id, 7);
            assert_eq!(result.expect("stats").files, 4);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn analysis_status_lines_precede_the_result() {
    let engine = engine();
    engine.analyze(3, "/abc");

    assert_eq!(
        next_non_tick(&engine),
        EngineEvent::Status {
            run_id: 3,
            text: "Attempt 2 of 3...".to_string()
        }
    );
    match next_non_tick(&engine) {
        EngineEvent::AnalysisCompleted { run_id, result } => {
            assert_eq!(run_id, 3);
            assert_eq!(result.expect("report").excel_file.as_deref(), Some("out.xlsx"));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn download_reports_saved_path() {
    let engine = engine();
    engine.download("out.xlsx", PathBuf::from("/tmp/reports"));

    assert_eq!(
        next_non_tick(&engine),
        EngineEvent::DownloadCompleted {
            excel_file: "out.xlsx".to_string(),
            result: Ok(PathBuf::from("/tmp/reports/out.xlsx")),
        }
    );
}

#[test]
fn ticker_emits_until_stopped() {
    let engine = engine();
    engine.start_ticker(Duration::from_millis(10));

    assert_eq!(engine.recv_timeout(WAIT), Some(EngineEvent::SimulationTick));
    engine.stop_ticker();

    // Drain ticks that raced the stop, then expect silence.
    std::thread::sleep(Duration::from_millis(50));
    while engine.try_recv().is_some() {}
    assert_eq!(engine.recv_timeout(Duration::from_millis(100)), None);
}
