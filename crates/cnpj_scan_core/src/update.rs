use crate::simulator::TickOutcome;
use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::DirectoryChanged(text) => {
            state.set_directory_input(text);
            Vec::new()
        }
        Msg::Submitted => match state.begin_run() {
            // The previous run's timer (if any) goes first, whatever step we were on.
            Some((run_id, directory)) => vec![
                Effect::StopTicker,
                Effect::RememberDirectory {
                    directory: directory.clone(),
                },
                Effect::PreAnalyze { run_id, directory },
            ],
            None => Vec::new(),
        },
        Msg::StatusChanged { run_id, text } => {
            if state.is_current(run_id) {
                state.set_status(text);
            }
            Vec::new()
        }
        Msg::PreAnalysisDone { run_id, stats } => {
            if !state.is_current(run_id) {
                return (state, Vec::new());
            }
            let (directory, start_ticker) = state.accept_stats(stats);
            let mut effects = Vec::with_capacity(2);
            if start_ticker {
                effects.push(Effect::StartTicker {
                    interval: state.tick_interval(),
                });
            }
            if let Some(directory) = directory {
                effects.push(Effect::Analyze { run_id, directory });
            }
            effects
        }
        Msg::SimulationTick => match state.tick_simulation() {
            TickOutcome::Finished => vec![Effect::StopTicker],
            TickOutcome::Advanced | TickOutcome::Ignored => Vec::new(),
        },
        Msg::AnalysisDone { run_id, report } => {
            if !state.is_current(run_id) {
                return (state, Vec::new());
            }
            state.accept_report(report);
            vec![Effect::StopTicker]
        }
        Msg::RequestFailed { run_id, failure } => {
            if !state.is_current(run_id) {
                return (state, Vec::new());
            }
            state.fail_run(failure);
            vec![Effect::StopTicker]
        }
        Msg::DownloadClicked => match state.request_download() {
            Some(excel_file) => vec![Effect::DownloadReport { excel_file }],
            None => Vec::new(),
        },
        Msg::DownloadFinished { result } => {
            state.finish_download(result);
            Vec::new()
        }
        Msg::StepSelected(step) => {
            state.go_to(step);
            Vec::new()
        }
        Msg::ResetClicked => {
            state.reset();
            vec![Effect::StopTicker]
        }
        Msg::BannerDismissed => {
            state.dismiss_banner();
            Vec::new()
        }
        Msg::Tick { elapsed } => {
            state.advance_clock(elapsed);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
