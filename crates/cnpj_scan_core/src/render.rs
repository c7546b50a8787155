//! Pure conversion of analysis data into what the UI draws.

use crate::{DirectoryStats, ImpactFinding, Severity};

const NO_DATA_LABEL: &str = "No data";
/// Share of files above which one language is called dominant.
const MONOLITH_THRESHOLD_PCT: u64 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeverityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub unrated: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HourTotals {
    pub dev: f64,
    pub test: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindingRow {
    pub file: String,
    pub method: String,
    pub line: String,
    pub usage_type: String,
    pub severity: Severity,
    pub dev_hours: String,
    pub test_hours: String,
    pub total_hours: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Severity,
    Language,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSlice {
    pub label: String,
    pub value: u64,
    /// Rounded share of the chart total, 0..=100.
    pub percent: u64,
}

/// Data for one doughnut chart.
#[derive(Debug, Clone, PartialEq)]
pub struct DoughnutChart {
    pub kind: ChartKind,
    pub title: String,
    pub slices: Vec<ChartSlice>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    /// One row per finding, in the order the server returned them.
    pub rows: Vec<FindingRow>,
    pub counts: SeverityCounts,
    pub totals: HourTotals,
    /// Dev, test and total hours with one decimal.
    pub footer: [String; 3],
    pub severity_chart: DoughnutChart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insight {
    pub title: String,
    pub text: String,
}

pub fn build_results(findings: &[ImpactFinding]) -> ResultsView {
    let mut counts = SeverityCounts::default();
    let mut totals = HourTotals::default();
    let mut rows = Vec::with_capacity(findings.len());

    for finding in findings {
        rows.push(FindingRow {
            file: finding.file.clone(),
            method: finding.method.clone(),
            line: finding.line.to_string(),
            usage_type: finding.usage_type.clone(),
            severity: finding.severity,
            dev_hours: finding.dev_hours.to_string(),
            test_hours: finding.test_hours.to_string(),
            total_hours: finding.total_hours.to_string(),
        });

        match finding.severity {
            Severity::High => counts.high += 1,
            Severity::Medium => counts.medium += 1,
            Severity::Low => counts.low += 1,
            Severity::Unrated => counts.unrated += 1,
        }
        totals.dev += finding.dev_hours;
        totals.test += finding.test_hours;
        totals.total += finding.total_hours;
    }

    ResultsView {
        rows,
        counts,
        totals,
        footer: [
            format!("{:.1}", totals.dev),
            format!("{:.1}", totals.test),
            format!("{:.1}", totals.total),
        ],
        severity_chart: severity_chart(&counts),
    }
}

pub fn severity_chart(counts: &SeverityCounts) -> DoughnutChart {
    let values = [
        ("High impact", counts.high as u64),
        ("Medium impact", counts.medium as u64),
        ("Low impact", counts.low as u64),
    ];
    let sum: u128 = values.iter().map(|(_, v)| u128::from(*v)).sum();
    DoughnutChart {
        kind: ChartKind::Severity,
        title: "Impact by severity".to_string(),
        slices: values
            .iter()
            .map(|(label, value)| ChartSlice {
                label: (*label).to_string(),
                value: *value,
                percent: percent_of(*value, sum),
            })
            .collect(),
    }
}

/// Languages with at least one file; a single "No data" slice otherwise.
pub fn language_chart(stats: &DirectoryStats) -> DoughnutChart {
    let present: Vec<(&String, u64)> = stats
        .by_language
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(lang, count)| (lang, *count))
        .collect();
    let sum: u128 = present.iter().map(|(_, count)| u128::from(*count)).sum();

    let slices = if present.is_empty() {
        vec![ChartSlice {
            label: NO_DATA_LABEL.to_string(),
            value: 1,
            percent: 100,
        }]
    } else {
        present
            .into_iter()
            .map(|(lang, count)| ChartSlice {
                label: capitalize(lang),
                value: count,
                percent: percent_of(count, sum),
            })
            .collect()
    };

    DoughnutChart {
        kind: ChartKind::Language,
        title: "Files by language".to_string(),
        slices,
    }
}

/// Template-generated remarks about the pre-analysis summary.
pub fn insights(stats: &DirectoryStats) -> Vec<Insight> {
    vec![
        Insight {
            title: "Code distribution".to_string(),
            text: distribution_insight(stats),
        },
        Insight {
            title: "Estimated complexity".to_string(),
            text: complexity_insight(stats),
        },
        Insight {
            title: "CNPJ usage".to_string(),
            text: format!(
                "Found {} methods handling CNPJ across {} subdirectories.",
                stats.methods, stats.subdirs
            ),
        },
    ]
}

fn distribution_insight(stats: &DirectoryStats) -> String {
    let mut top: Option<(&String, u64)> = None;
    for (lang, count) in &stats.by_language {
        if *count > top.map_or(0, |(_, c)| c) {
            top = Some((lang, *count));
        }
    }

    match top {
        Some((lang, count)) => {
            let pct = percent_of(count, u128::from(stats.files.max(1)));
            let shape = if pct > MONOLITH_THRESHOLD_PCT {
                "a monolithic system"
            } else {
                "a multi-language architecture"
            };
            format!("{lang} dominates ({pct}% of files). This distribution suggests {shape}.")
        }
        None => "Could not determine a dominant language.".to_string(),
    }
}

fn complexity_insight(stats: &DirectoryStats) -> String {
    let files_per_method = stats.files as f64 / stats.methods.max(1) as f64;
    if files_per_method < 2.0 {
        "High concentration of CNPJ usage. Files contain several affected methods, \
         which points to tight coupling."
            .to_string()
    } else if files_per_method < 5.0 {
        "Moderate CNPJ usage. Impact points are spread across the system.".to_string()
    } else {
        "Low CNPJ density. Impact points are isolated, which points to good encapsulation."
            .to_string()
    }
}

/// `total` is a u128 sum of u64 counts.
fn percent_of(value: u64, total: u128) -> u64 {
    if total == 0 {
        return 0;
    }
    let pct = (u128::from(value) * 100 + total / 2) / total;
    u64::try_from(pct).unwrap_or(u64::MAX)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
