//! Penetration test scan models
//!
//! Wire types of the scanning backend (launch, status, cancel) and the
//! results backend (per-scan and historical results).

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::common::Severity;

/// Scan type sent with every launch
pub const SCAN_TYPE_PENETRATION_TEST: &str = "penetration_test";

/// What to scan and how
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Hostnames, URLs, or CIDR ranges
    #[serde(default)]
    pub targets: Vec<String>,

    #[serde(default)]
    pub depth: ScanDepth,

    /// Scan modules to enable, e.g. "recon" or "vuln"
    #[serde(default)]
    pub features: Vec<String>,

    /// Ask the backend for a simulated run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulate: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<ScanConstraints>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanDepth {
    Quick,
    #[default]
    Standard,
    Deep,
}

impl fmt::Display for ScanDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScanDepth::Quick => "quick",
            ScanDepth::Standard => "standard",
            ScanDepth::Deep => "deep",
        };
        f.write_str(s)
    }
}

/// Safety limits applied by the scanner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConstraints {
    #[serde(default)]
    pub exclude_destructive: bool,
    #[serde(default)]
    pub rate_limiting: bool,
    #[serde(default)]
    pub stealth_mode: bool,
}

/// Body of `POST /api/v1/scans/launch`
#[derive(Debug, Clone, Serialize)]
pub struct LaunchRequest<'a> {
    pub target: &'a TargetConfig,
    #[serde(rename = "scanType")]
    pub scan_type: &'static str,
    /// RFC 3339 launch time
    pub timestamp: String,
}

impl<'a> LaunchRequest<'a> {
    pub fn penetration_test(target: &'a TargetConfig) -> Self {
        Self {
            target,
            scan_type: SCAN_TYPE_PENETRATION_TEST,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Status as reported by the scanning backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteScanStatus {
    Initiated,
    Running,
    Completed,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

impl RemoteScanStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RemoteScanStatus::Completed | RemoteScanStatus::Failed)
    }
}

impl fmt::Display for RemoteScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RemoteScanStatus::Initiated => "initiated",
            RemoteScanStatus::Running => "running",
            RemoteScanStatus::Completed => "completed",
            RemoteScanStatus::Failed => "failed",
            RemoteScanStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Launch and status response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanStatus {
    /// Status polls may omit the id
    #[serde(default)]
    pub scan_id: String,

    pub status: RemoteScanStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_completion: Option<String>,
}

/// Full results of a scan, served by the results backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResults {
    pub scan_id: String,

    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<ScanFindings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl ScanResults {
    pub fn vulnerability_count(&self) -> usize {
        self.results
            .as_ref()
            .map(|r| r.vulnerabilities.len())
            .unwrap_or(0)
    }

    /// The scan behind these results has stopped changing
    pub fn is_final(&self) -> bool {
        let status = self.status.to_ascii_lowercase();
        status == "completed" || status == "failed"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanFindings {
    #[serde(default)]
    pub vulnerabilities: Vec<Finding>,

    pub summary: ScanSummary,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_status: Option<Vec<ComplianceStatus>>,
}

/// One vulnerability found by a scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvss_score: Option<f64>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total_vulnerabilities: u32,
    #[serde(default)]
    pub by_severity: HashMap<String, u32>,
    #[serde(default)]
    pub scan_duration: String,
    #[serde(default)]
    pub coverage: String,
}

/// Result against one compliance framework
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceStatus {
    pub framework: String,
    pub score: f64,
    #[serde(default)]
    pub findings: Vec<ComplianceFinding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceFinding {
    pub requirement: String,
    /// "pass", "fail", or "warning"
    pub status: String,
    #[serde(default)]
    pub details: String,
}

/// Envelope of the results list endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanResultList {
    #[serde(default)]
    pub results: Vec<ScanResults>,
}
