use cnpj_scan_core::render::{DoughnutChart, FindingRow, ResultsView};
use cnpj_scan_core::{AppViewModel, DirectoryStats, DownloadState, ProgressView, Step, SummaryView};

/// One thing for the terminal to show. Commands for the same slot replace
/// each other; see [`TerminalCommand::slot`].
#[derive(Debug, Clone, PartialEq)]
pub enum TerminalCommand {
    ShowStep { number: u8, title: &'static str },
    SetStatus(String),
    ShowInlineError(String),
    ShowBanner(String),
    HideBanner,
    ShowSummary(Vec<String>),
    DrawChart(DoughnutChart),
    ShowInsights(Vec<String>),
    SetProgress {
        position: u64,
        length: u64,
        message: String,
    },
    FinishProgress { message: String },
    ShowResults(Vec<String>),
    ShowDownload(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Step,
    Status,
    InlineError,
    Banner,
    Summary,
    Chart(cnpj_scan_core::render::ChartKind),
    Insights,
    Progress,
    Results,
    Download,
}

impl TerminalCommand {
    pub fn slot(&self) -> Slot {
        match self {
            TerminalCommand::ShowStep { .. } => Slot::Step,
            TerminalCommand::SetStatus(_) => Slot::Status,
            TerminalCommand::ShowInlineError(_) => Slot::InlineError,
            TerminalCommand::ShowBanner(_) | TerminalCommand::HideBanner => Slot::Banner,
            TerminalCommand::ShowSummary(_) => Slot::Summary,
            TerminalCommand::DrawChart(chart) => Slot::Chart(chart.kind),
            TerminalCommand::ShowInsights(_) => Slot::Insights,
            TerminalCommand::SetProgress { .. } | TerminalCommand::FinishProgress { .. } => {
                Slot::Progress
            }
            TerminalCommand::ShowResults(_) => Slot::Results,
            TerminalCommand::ShowDownload(_) => Slot::Download,
        }
    }
}

pub fn step_title(step: Step) -> &'static str {
    match step {
        Step::Select => "Select directory",
        Step::Analyze => "Analysis",
        Step::Results => "Results",
    }
}

#[allow(clippy::vec_init_then_push)]
pub fn render(view: &AppViewModel) -> Vec<TerminalCommand> {
    let mut cmds = Vec::new();

    cmds.push(TerminalCommand::ShowStep {
        number: view.step.number(),
        title: step_title(view.step),
    });

    cmds.push(match &view.banner {
        Some(message) => TerminalCommand::ShowBanner(message.clone()),
        None => TerminalCommand::HideBanner,
    });

    if let Some(error) = &view.inline_error {
        cmds.push(TerminalCommand::ShowInlineError(error.clone()));
    }

    if !view.status.is_empty() {
        cmds.push(TerminalCommand::SetStatus(view.status.clone()));
    }

    if let Some(summary) = &view.summary {
        cmds.extend(summary_commands(summary));
    }

    if let Some(progress) = &view.progress {
        cmds.push(progress_command(progress));
    }

    if let Some(results) = &view.results {
        cmds.push(TerminalCommand::ShowResults(results_table(results)));
        cmds.push(TerminalCommand::DrawChart(results.severity_chart.clone()));
        if let Some(text) = download_text(view.excel_file.as_deref(), &view.download) {
            cmds.push(TerminalCommand::ShowDownload(text));
        }
    }

    cmds
}

pub fn summary_commands(summary: &SummaryView) -> Vec<TerminalCommand> {
    vec![
        TerminalCommand::ShowSummary(summary_lines(&summary.stats)),
        TerminalCommand::DrawChart(summary.language_chart.clone()),
        TerminalCommand::ShowInsights(
            summary
                .insights
                .iter()
                .map(|insight| format!("{}: {}", insight.title, insight.text))
                .collect(),
        ),
    ]
}

pub fn summary_lines(stats: &DirectoryStats) -> Vec<String> {
    vec![
        format!("Subdirectories: {}", format_with_commas(stats.subdirs)),
        format!("Files:          {}", format_with_commas(stats.files)),
        format!("Lines of code:  {}", format_with_commas(stats.lines)),
        format!("Methods:        {}", format_with_commas(stats.methods)),
    ]
}

fn progress_command(progress: &ProgressView) -> TerminalCommand {
    if progress.running {
        TerminalCommand::SetProgress {
            position: progress.processed,
            length: progress.total,
            message: progress.label.clone(),
        }
    } else {
        TerminalCommand::FinishProgress {
            message: format!(
                "{} ({}/{}, {}%)",
                progress.label, progress.processed, progress.total, progress.percent
            ),
        }
    }
}

const RESULT_HEADERS: [&str; 8] = [
    "File", "Method", "Line", "Usage", "Severity", "Dev h", "Test h", "Total h",
];

/// Findings as aligned text rows with a header, a severity count line and
/// the hour totals as the last row.
pub fn results_table(results: &ResultsView) -> Vec<String> {
    let mut table: Vec<[String; 8]> = Vec::with_capacity(results.rows.len() + 2);
    table.push(RESULT_HEADERS.map(str::to_string));
    table.extend(results.rows.iter().map(row_cells));
    let [dev, test, total] = results.footer.clone();
    table.push([
        "Total".to_string(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        dev,
        test,
        total,
    ]);

    let mut widths = [0usize; 8];
    for row in &table {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines: Vec<String> = table
        .iter()
        .map(|row| {
            row.iter()
                .zip(widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        })
        .collect();

    let counts = results.counts;
    let mut tally = format!(
        "HIGH: {}  MEDIUM: {}  LOW: {}",
        counts.high, counts.medium, counts.low
    );
    if counts.unrated > 0 {
        tally.push_str(&format!("  N/A: {}", counts.unrated));
    }
    lines.push(tally);
    lines
}

fn row_cells(row: &FindingRow) -> [String; 8] {
    [
        row.file.clone(),
        row.method.clone(),
        row.line.clone(),
        row.usage_type.clone(),
        row.severity.to_string(),
        row.dev_hours.clone(),
        row.test_hours.clone(),
        row.total_hours.clone(),
    ]
}

fn download_text(excel_file: Option<&str>, download: &DownloadState) -> Option<String> {
    match download {
        DownloadState::NotRequested => excel_file.map(|name| format!("Report available: {name}")),
        DownloadState::InProgress => Some("Downloading report...".to_string()),
        DownloadState::Saved(path) => Some(format!("Report saved to {path}")),
        DownloadState::Failed(message) => Some(format!("Download failed: {message}")),
    }
}

pub fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}
