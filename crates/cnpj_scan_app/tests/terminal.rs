use cnpj_scan_app::platform::ui::render::TerminalCommand;
use cnpj_scan_app::platform::ui::terminal::TerminalUi;
use cnpj_scan_core::render::{ChartKind, ChartSlice, DoughnutChart};
use indicatif::ProgressDrawTarget;

fn ui() -> TerminalUi<Vec<u8>> {
    TerminalUi::new(Vec::new(), ProgressDrawTarget::hidden)
}

fn output(ui: TerminalUi<Vec<u8>>) -> String {
    String::from_utf8(ui.into_inner()).unwrap()
}

fn step(number: u8, title: &'static str) -> TerminalCommand {
    TerminalCommand::ShowStep { number, title }
}

fn chart(kind: ChartKind, value: u64) -> DoughnutChart {
    DoughnutChart {
        kind,
        title: format!("{kind:?} chart"),
        slices: vec![ChartSlice {
            label: "Java".to_string(),
            value,
            percent: 100,
        }],
    }
}

#[test]
fn repeated_commands_print_once() {
    let mut ui = ui();
    let frame = vec![
        step(2, "Analysis"),
        TerminalCommand::SetStatus("Analyzing impacts with AI...".to_string()),
        TerminalCommand::ShowSummary(vec!["Files: 3".to_string()]),
    ];
    ui.apply(frame.clone());
    ui.apply(frame);

    let text = output(ui);
    assert_eq!(text.matches("Step 2/3: Analysis").count(), 1);
    assert_eq!(text.matches("Analyzing impacts with AI...").count(), 1);
    assert_eq!(text.matches("Files: 3").count(), 1);
}

#[test]
fn changed_slot_value_prints_again() {
    let mut ui = ui();
    ui.apply(vec![TerminalCommand::SetStatus("Attempt 2 of 3...".to_string())]);
    ui.apply(vec![TerminalCommand::SetStatus("Attempt 3 of 3...".to_string())]);

    let text = output(ui);
    assert!(text.contains("Attempt 2 of 3..."));
    assert!(text.contains("Attempt 3 of 3..."));
}

#[test]
fn step_change_forgets_previous_output() {
    let mut ui = ui();
    let summary = TerminalCommand::ShowSummary(vec!["Files: 3".to_string()]);
    ui.apply(vec![step(2, "Analysis"), summary.clone()]);
    ui.apply(vec![step(1, "Select directory")]);
    ui.apply(vec![step(2, "Analysis"), summary]);

    assert_eq!(output(ui).matches("Files: 3").count(), 2);
}

#[test]
fn redrawing_a_chart_keeps_one_live_instance_per_kind() {
    let mut ui = ui();
    ui.apply(vec![TerminalCommand::DrawChart(chart(ChartKind::Language, 1))]);
    ui.apply(vec![TerminalCommand::DrawChart(chart(ChartKind::Language, 2))]);
    ui.apply(vec![TerminalCommand::DrawChart(chart(ChartKind::Severity, 5))]);
    assert_eq!(ui.live_charts(), 2);

    ui.apply(vec![step(1, "Select directory")]);
    assert_eq!(ui.live_charts(), 0);
}

#[test]
fn finished_progress_prints_its_summary_line() {
    let mut ui = ui();
    ui.apply(vec![TerminalCommand::SetProgress {
        position: 5,
        length: 10,
        message: "Analyzing Invoice.validate()".to_string(),
    }]);
    ui.apply(vec![TerminalCommand::FinishProgress {
        message: "Analysis complete! Generating report... (10/10, 100%)".to_string(),
    }]);

    assert!(output(ui).contains("Analysis complete! Generating report... (10/10, 100%)"));
}
