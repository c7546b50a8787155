//! Chart lifetimes: one live chart per kind, the previous instance disposed
//! before its replacement is drawn.

use std::collections::HashMap;

use cnpj_scan_core::render::{ChartKind, DoughnutChart};
use scan_logging::scan_debug;

const BAR_WIDTH: usize = 20;

/// Something that can draw a chart and later release it.
pub trait ChartBackend {
    type Handle;

    fn draw(&mut self, chart: &DoughnutChart) -> Self::Handle;
    fn dispose(&mut self, handle: Self::Handle);
}

pub struct ChartSurface<B: ChartBackend> {
    backend: B,
    live: HashMap<ChartKind, B::Handle>,
}

impl<B: ChartBackend> ChartSurface<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            live: HashMap::new(),
        }
    }

    pub fn draw(&mut self, chart: &DoughnutChart) {
        if let Some(previous) = self.live.remove(&chart.kind) {
            scan_debug!("disposing previous {:?} chart", chart.kind);
            self.backend.dispose(previous);
        }
        let handle = self.backend.draw(chart);
        self.live.insert(chart.kind, handle);
    }

    pub fn clear(&mut self) {
        for (_, handle) in self.live.drain() {
            self.backend.dispose(handle);
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

/// Renders charts as text blocks. Drawn lines wait in a queue until the
/// terminal prints them.
#[derive(Debug, Default)]
pub struct TextChartBackend {
    next_id: u64,
    pending: Vec<String>,
}

impl TextChartBackend {
    pub fn take_pending(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }
}

impl ChartBackend for TextChartBackend {
    type Handle = u64;

    fn draw(&mut self, chart: &DoughnutChart) -> u64 {
        self.pending.extend(chart_lines(chart));
        self.next_id += 1;
        self.next_id
    }

    // Printed text stays on screen; dropping the handle is all there is.
    fn dispose(&mut self, _handle: u64) {}
}

pub fn chart_lines(chart: &DoughnutChart) -> Vec<String> {
    let width = chart
        .slices
        .iter()
        .map(|slice| slice.label.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::with_capacity(chart.slices.len() + 1);
    lines.push(chart.title.clone());
    for slice in &chart.slices {
        let filled = (slice.percent.min(100) as usize * BAR_WIDTH + 50) / 100;
        lines.push(format!(
            "  {label:<width$} {bar}{rest} {value} ({percent}%)",
            label = slice.label,
            bar = "█".repeat(filled),
            rest = "░".repeat(BAR_WIDTH - filled),
            value = slice.value,
            percent = slice.percent,
        ));
    }
    lines
}
