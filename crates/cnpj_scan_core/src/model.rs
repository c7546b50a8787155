use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one submit of the analysis form. Responses carrying an older
/// id are stale and ignored.
pub type RunId = u64;

/// Summary returned by the server's pre-analysis of a directory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DirectoryStats {
    #[serde(default)]
    pub subdirs: u64,
    #[serde(default)]
    pub files: u64,
    #[serde(default)]
    pub lines: u64,
    #[serde(default)]
    pub methods: u64,
    #[serde(default)]
    pub by_language: BTreeMap<String, u64>,
}

/// Impact classification assigned by the server to a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "ALTA")]
    High,
    #[serde(rename = "MEDIA")]
    Medium,
    #[serde(rename = "BAIXA")]
    Low,
    /// The server could not analyse the method (it sends `N/A`).
    #[serde(rename = "N/A", other)]
    Unrated,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Unrated => "N/A",
        };
        f.write_str(label)
    }
}

/// One method the server flagged as handling CNPJ values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactFinding {
    #[serde(rename = "arquivo")]
    pub file: String,
    #[serde(rename = "metodo")]
    pub method: String,
    #[serde(rename = "linha", default)]
    pub line: u32,
    #[serde(rename = "tipo_uso")]
    pub usage_type: String,
    #[serde(rename = "severidade")]
    pub severity: Severity,
    #[serde(rename = "horas_dev", default)]
    pub dev_hours: f64,
    #[serde(rename = "horas_teste", default)]
    pub test_hours: f64,
    #[serde(rename = "horas_total", default)]
    pub total_hours: f64,
    #[serde(rename = "linguagem", default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Successful result of `/analyze`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisReport {
    pub findings: Vec<ImpactFinding>,
    /// Name of the spreadsheet the server generated, if any.
    pub excel_file: Option<String>,
}

/// A failed pre-analysis or analysis request, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    pub message: String,
    /// The server could not be reached at all.
    pub unreachable: bool,
}

impl RequestFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            unreachable: false,
        }
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            unreachable: true,
        }
    }
}
