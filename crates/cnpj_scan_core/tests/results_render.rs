use std::collections::BTreeMap;

use cnpj_scan_core::render::{build_results, insights, language_chart, ChartKind};
use cnpj_scan_core::{DirectoryStats, ImpactFinding, Severity};
use pretty_assertions::assert_eq;

fn findings_from_server() -> Vec<ImpactFinding> {
    let body = r#"[
        {"arquivo": "a/Cliente.java", "linguagem": "java", "metodo": "validar", "linha": 10,
         "tipo_uso": "NUMERICO", "severidade": "ALTA", "horas_dev": 8, "horas_teste": 4, "horas_total": 12},
        {"arquivo": "b/cnpj.py", "linguagem": "python", "metodo": "formatar", "linha": 3,
         "tipo_uso": "TEXTO", "severidade": "MEDIA", "horas_dev": 2.5, "horas_teste": 1, "horas_total": 3.5},
        {"arquivo": "c/Empresa.cs", "linguagem": "csharp", "metodo": "salvar", "linha": 77,
         "tipo_uso": "MISTO", "severidade": "ALTA", "horas_dev": 0.1, "horas_teste": 0.2, "horas_total": 0.3}
    ]"#;
    serde_json::from_str(body).expect("valid findings")
}

#[test]
fn counts_buckets_and_sums_hours_exactly() {
    let findings = findings_from_server();
    let view = build_results(&findings);

    assert_eq!(view.counts.high, 2);
    assert_eq!(view.counts.medium, 1);
    assert_eq!(view.counts.low, 0);
    let expected: f64 = findings.iter().map(|f| f.total_hours).sum();
    assert_eq!(view.totals.total, expected);
    assert_eq!(view.footer, ["10.6".to_string(), "5.2".to_string(), "15.8".to_string()]);
}

#[test]
fn rows_keep_input_order_without_deduplication() {
    let mut findings = findings_from_server();
    findings.push(findings[0].clone());
    let view = build_results(&findings);

    let files: Vec<_> = view.rows.iter().map(|r| r.file.as_str()).collect();
    assert_eq!(
        files,
        vec!["a/Cliente.java", "b/cnpj.py", "c/Empresa.cs", "a/Cliente.java"]
    );
    assert_eq!(view.rows[1].total_hours, "3.5");
    assert_eq!(view.rows[0].dev_hours, "8");
}

#[test]
fn failed_findings_are_listed_but_not_bucketed() {
    let body = r#"[{"arquivo": "x.c", "linguagem": "c", "metodo": "unknown", "tipo_uso": "ERRO",
        "severidade": "N/A", "horas_dev": 0, "horas_teste": 0, "horas_total": 0}]"#;
    let findings: Vec<ImpactFinding> = serde_json::from_str(body).unwrap();
    assert_eq!(findings[0].severity, Severity::Unrated);
    assert_eq!(findings[0].line, 0);

    let view = build_results(&findings);
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.counts.unrated, 1);
    assert_eq!(view.counts.high + view.counts.medium + view.counts.low, 0);
}

#[test]
fn severity_chart_has_three_slices() {
    let view = build_results(&findings_from_server());
    let chart = view.severity_chart;
    assert_eq!(chart.kind, ChartKind::Severity);
    let values: Vec<_> = chart.slices.iter().map(|s| (s.value, s.percent)).collect();
    assert_eq!(values, vec![(2, 67), (1, 33), (0, 0)]);
}

#[test]
fn language_chart_skips_empty_languages_and_capitalizes() {
    let mut by_language = BTreeMap::new();
    by_language.insert("java".to_string(), 3);
    by_language.insert("go".to_string(), 0);
    by_language.insert("python".to_string(), 1);
    let stats = DirectoryStats {
        files: 4,
        by_language,
        ..DirectoryStats::default()
    };

    let chart = language_chart(&stats);
    let labels: Vec<_> = chart
        .slices
        .iter()
        .map(|s| (s.label.as_str(), s.percent))
        .collect();
    assert_eq!(labels, vec![("Java", 75), ("Python", 25)]);
}

#[test]
fn language_chart_handles_counts_near_the_integer_limit() {
    let mut by_language = BTreeMap::new();
    by_language.insert("java".to_string(), u64::MAX / 10);
    by_language.insert("python".to_string(), u64::MAX / 10);
    let stats = DirectoryStats {
        files: u64::MAX,
        by_language,
        ..DirectoryStats::default()
    };

    let chart = language_chart(&stats);
    let percents: Vec<_> = chart.slices.iter().map(|s| s.percent).collect();
    assert_eq!(percents, vec![50, 50]);
    assert!(insights(&stats)[0].text.starts_with("java dominates (10% of files)"));
}

#[test]
fn language_chart_without_data_has_placeholder_slice() {
    let chart = language_chart(&DirectoryStats::default());
    assert_eq!(chart.slices.len(), 1);
    assert_eq!(chart.slices[0].label, "No data");
}

#[test]
fn insights_follow_summary_numbers() {
    let mut by_language = BTreeMap::new();
    by_language.insert("java".to_string(), 8);
    by_language.insert("sql".to_string(), 2);
    let stats = DirectoryStats {
        subdirs: 4,
        files: 10,
        lines: 1000,
        methods: 1,
        by_language,
    };

    let list = insights(&stats);
    assert_eq!(list.len(), 3);
    assert!(list[0].text.starts_with("java dominates (80% of files)"));
    assert!(list[0].text.contains("monolithic"));
    assert!(list[1].text.starts_with("Low CNPJ density"));
    assert_eq!(
        list[2].text,
        "Found 1 methods handling CNPJ across 4 subdirectories."
    );
}
