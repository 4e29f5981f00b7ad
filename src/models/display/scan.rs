//! Scan display models and helpers

use serde::Serialize;
use tabled::Tabled;

use super::common::{format_timestamp, or_dash, truncate_string};
use crate::client::models::{Finding, ScanResults, ScanStatus, ScanSummary};

/// Scan result display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ScanDisplay {
    #[tabled(rename = "SCAN ID")]
    pub id: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    /// Total vulnerabilities found
    #[tabled(rename = "VULNS")]
    pub vulnerabilities: String,

    /// Per-severity counts (e.g., "C1 H2 M0 L3")
    #[tabled(rename = "BY SEVERITY")]
    pub by_severity: String,

    #[tabled(rename = "DURATION")]
    pub duration: String,

    #[tabled(rename = "COVERAGE")]
    pub coverage: String,

    #[tabled(rename = "COMPLETED")]
    pub completed: String,
}

impl From<&ScanResults> for ScanDisplay {
    fn from(results: &ScanResults) -> Self {
        let summary = results.results.as_ref().map(|r| &r.summary);

        Self {
            id: results.scan_id.clone(),
            status: results.status.clone(),
            vulnerabilities: summary
                .map(|s| s.total_vulnerabilities.to_string())
                .unwrap_or_else(|| "--".to_string()),
            by_severity: summary
                .map(format_severity_counts)
                .unwrap_or_else(|| "--".to_string()),
            duration: or_dash(summary.map(|s| s.scan_duration.as_str())),
            coverage: or_dash(summary.map(|s| s.coverage.as_str())),
            completed: format_timestamp(results.completed_at.as_deref().unwrap_or_default()),
        }
    }
}

impl From<ScanResults> for ScanDisplay {
    fn from(results: ScanResults) -> Self {
        ScanDisplay::from(&results)
    }
}

/// Single finding row for `scan results`
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct FindingDisplay {
    #[tabled(rename = "SEVERITY")]
    pub severity: String,

    #[tabled(rename = "TITLE")]
    pub title: String,

    #[tabled(rename = "TARGET")]
    pub target: String,

    #[tabled(rename = "CVSS")]
    pub cvss: String,
}

impl From<&Finding> for FindingDisplay {
    fn from(finding: &Finding) -> Self {
        Self {
            severity: finding.severity.to_string(),
            title: truncate_string(&finding.title, 60),
            target: or_dash(Some(&finding.target)),
            cvss: finding
                .cvss_score
                .map(|s| format!("{:.1}", s))
                .unwrap_or_else(|| "--".to_string()),
        }
    }
}

/// Status row for `scan status`
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ScanStatusDisplay {
    #[tabled(rename = "SCAN ID")]
    pub id: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    #[tabled(rename = "MESSAGE")]
    pub message: String,

    #[tabled(rename = "ETA")]
    pub eta: String,
}

impl ScanStatusDisplay {
    /// Status polls may omit the scan id; `scan_id` fills it in
    pub fn new(scan_id: &str, status: &ScanStatus) -> Self {
        let id = if status.scan_id.is_empty() {
            scan_id.to_string()
        } else {
            status.scan_id.clone()
        };
        Self {
            id,
            status: status.status.to_string(),
            message: or_dash(status.message.as_deref()),
            eta: format_timestamp(status.estimated_completion.as_deref().unwrap_or_default()),
        }
    }
}

const SEVERITY_ORDER: [(&str, &str); 4] =
    [("critical", "C"), ("high", "H"), ("medium", "M"), ("low", "L")];

/// Format per-severity counts as "C1 H2 M0 L3"
pub fn format_severity_counts(summary: &ScanSummary) -> String {
    SEVERITY_ORDER
        .iter()
        .map(|(key, label)| {
            let count = summary.by_severity.get(*key).copied().unwrap_or(0);
            format!("{}{}", label, count)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
