use crate::render::{self, DoughnutChart, Insight, ResultsView};
use crate::{DirectoryStats, DownloadState, Step};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub step: Step,
    pub directory: String,
    pub status: String,
    pub inline_error: Option<String>,
    pub banner: Option<String>,
    pub summary: Option<SummaryView>,
    pub progress: Option<ProgressView>,
    pub results: Option<ResultsView>,
    pub excel_file: Option<String>,
    pub download: DownloadState,
    pub dirty: bool,
}

/// Pre-analysis numbers shown while the analysis runs.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView {
    pub stats: DirectoryStats,
    pub language_chart: DoughnutChart,
    pub insights: Vec<Insight>,
}

impl SummaryView {
    pub fn from_stats(stats: &DirectoryStats) -> Self {
        Self {
            stats: stats.clone(),
            language_chart: render::language_chart(stats),
            insights: render::insights(stats),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub processed: u64,
    pub total: u64,
    pub percent: u8,
    pub label: String,
    pub running: bool,
}
