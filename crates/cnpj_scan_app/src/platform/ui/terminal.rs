use std::collections::HashMap;
use std::io::{self, Write};

use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use scan_logging::scan_warn;

use super::charts::{ChartSurface, TextChartBackend};
use super::render::{Slot, TerminalCommand};

const BAR_TEMPLATE: &str = "  [{bar:30.cyan/dim}] {pos}/{len} {msg}";

/// Applies [`TerminalCommand`]s to a line-oriented terminal.
///
/// The renderer re-emits the whole view every time, so commands equal to the
/// last one applied for their slot are skipped. A step change forgets
/// everything else, letting the next run print its own summary again.
pub struct TerminalUi<W: Write> {
    out: W,
    draw_target: fn() -> ProgressDrawTarget,
    last: HashMap<Slot, TerminalCommand>,
    bar: Option<ProgressBar>,
    charts: ChartSurface<TextChartBackend>,
}

impl TerminalUi<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout(), ProgressDrawTarget::stderr)
    }
}

impl<W: Write> TerminalUi<W> {
    pub fn new(out: W, draw_target: fn() -> ProgressDrawTarget) -> Self {
        Self {
            out,
            draw_target,
            last: HashMap::new(),
            bar: None,
            charts: ChartSurface::new(TextChartBackend::default()),
        }
    }

    pub fn apply(&mut self, commands: Vec<TerminalCommand>) {
        for command in commands {
            let slot = command.slot();
            if self.last.get(&slot) == Some(&command) {
                continue;
            }
            if slot == Slot::Step {
                self.last.clear();
                self.finish_bar(None);
                self.charts.clear();
            }
            if let Err(err) = self.execute(&command) {
                scan_warn!("terminal write failed: {}", err);
            }
            self.last.insert(slot, command);
        }
    }

    pub fn live_charts(&self) -> usize {
        self.charts.live_count()
    }

    pub fn into_inner(mut self) -> W {
        self.finish_bar(None);
        self.out
    }

    fn execute(&mut self, command: &TerminalCommand) -> io::Result<()> {
        match command {
            TerminalCommand::ShowStep { number, title } => {
                let heading = format!("Step {number}/3: {title}");
                self.print(&[String::new(), style(heading).bold().to_string()])
            }
            TerminalCommand::SetStatus(text) => {
                self.print(&[style(text).cyan().to_string()])
            }
            TerminalCommand::ShowInlineError(text) => {
                self.print(&[style(text).yellow().to_string()])
            }
            TerminalCommand::ShowBanner(text) => {
                self.print(&[style(text).red().bold().to_string()])
            }
            TerminalCommand::HideBanner => Ok(()),
            TerminalCommand::ShowSummary(lines)
            | TerminalCommand::ShowInsights(lines)
            | TerminalCommand::ShowResults(lines) => self.print(lines),
            TerminalCommand::DrawChart(chart) => {
                self.charts.draw(chart);
                let lines = self.charts.backend_mut().take_pending();
                self.print(&lines)
            }
            TerminalCommand::SetProgress {
                position,
                length,
                message,
            } => {
                let draw_target = self.draw_target;
                let bar = self.bar.get_or_insert_with(|| {
                    let bar = ProgressBar::with_draw_target(Some(*length), draw_target());
                    if let Ok(bar_style) = ProgressStyle::with_template(BAR_TEMPLATE) {
                        bar.set_style(bar_style.progress_chars("━╸─"));
                    }
                    bar
                });
                bar.set_length(*length);
                bar.set_position(*position);
                bar.set_message(message.clone());
                Ok(())
            }
            TerminalCommand::FinishProgress { message } => {
                let had_bar = self.bar.is_some();
                self.finish_bar(Some(message));
                if had_bar {
                    Ok(())
                } else {
                    self.print(&[message.clone()])
                }
            }
            TerminalCommand::ShowDownload(text) => self.print(&[text.clone()]),
        }
    }

    fn finish_bar(&mut self, message: Option<&String>) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
            if let Some(message) = message {
                let _ = self.print(&[message.clone()]);
            }
        }
    }

    fn print(&mut self, lines: &[String]) -> io::Result<()> {
        let out = &mut self.out;
        let mut write_all = || -> io::Result<()> {
            for line in lines {
                writeln!(out, "{line}")?;
            }
            out.flush()
        };
        match &self.bar {
            Some(bar) => bar.suspend(write_all),
            None => write_all(),
        }
    }
}
