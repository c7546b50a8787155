use cnpj_scan_app::platform::ui::charts::{chart_lines, ChartBackend, ChartSurface};
use cnpj_scan_core::render::{ChartKind, ChartSlice, DoughnutChart};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct RecordingBackend {
    next: u32,
    drawn: Vec<(u32, ChartKind)>,
    disposed: Vec<u32>,
}

impl ChartBackend for RecordingBackend {
    type Handle = u32;

    fn draw(&mut self, chart: &DoughnutChart) -> u32 {
        self.next += 1;
        self.drawn.push((self.next, chart.kind));
        self.next
    }

    fn dispose(&mut self, handle: u32) {
        self.disposed.push(handle);
    }
}

fn chart(kind: ChartKind) -> DoughnutChart {
    DoughnutChart {
        kind,
        title: "Impact by severity".to_string(),
        slices: vec![
            ChartSlice {
                label: "High impact".to_string(),
                value: 1,
                percent: 25,
            },
            ChartSlice {
                label: "Low impact".to_string(),
                value: 3,
                percent: 75,
            },
        ],
    }
}

#[test]
fn redraw_disposes_previous_instance_of_same_kind() {
    let mut surface = ChartSurface::new(RecordingBackend::default());
    surface.draw(&chart(ChartKind::Severity));
    surface.draw(&chart(ChartKind::Language));
    surface.draw(&chart(ChartKind::Severity));

    assert_eq!(surface.backend().disposed, vec![1]);
    assert_eq!(surface.live_count(), 2);
}

#[test]
fn clear_disposes_everything() {
    let mut surface = ChartSurface::new(RecordingBackend::default());
    surface.draw(&chart(ChartKind::Severity));
    surface.draw(&chart(ChartKind::Language));
    surface.clear();

    let mut disposed = surface.backend().disposed.clone();
    disposed.sort();
    assert_eq!(disposed, vec![1, 2]);
    assert_eq!(surface.live_count(), 0);
}

#[test]
fn text_lines_scale_bars_to_percent() {
    let lines = chart_lines(&chart(ChartKind::Severity));
    assert_eq!(lines[0], "Impact by severity");
    assert_eq!(
        lines[1],
        format!("  High impact {}{} 1 (25%)", "█".repeat(5), "░".repeat(15))
    );
    assert_eq!(
        lines[2],
        format!("  Low impact  {}{} 3 (75%)", "█".repeat(15), "░".repeat(5))
    );
}
