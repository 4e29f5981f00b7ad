//! Vulnerability models

use std::fmt;

use serde::{Deserialize, Serialize};

use super::common::{PageParams, Severity};

/// Known vulnerability affecting one or more assets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: String,

    #[serde(default)]
    pub cve_id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub severity: Severity,

    #[serde(default)]
    pub cvss_score: f64,

    #[serde(default)]
    pub status: VulnerabilityStatus,

    #[serde(default)]
    pub affected_assets: Vec<VulnerableAsset>,

    #[serde(default)]
    pub exploit_available: bool,

    #[serde(default)]
    pub patch_available: bool,

    #[serde(default)]
    pub vendor: String,

    #[serde(default)]
    pub product: String,

    #[serde(default)]
    pub risk_score: f64,

    #[serde(default)]
    pub discovered_date: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VulnerabilityStatus {
    Open,
    InProgress,
    Remediated,
    AcceptedRisk,
    FalsePositive,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for VulnerabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VulnerabilityStatus::Open => "open",
            VulnerabilityStatus::InProgress => "in_progress",
            VulnerabilityStatus::Remediated => "remediated",
            VulnerabilityStatus::AcceptedRisk => "accepted_risk",
            VulnerabilityStatus::FalsePositive => "false_positive",
            VulnerabilityStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VulnerableAsset {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub criticality: Severity,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VulnerabilityFilter {
    pub page: PageParams,
    pub severity: Option<String>,
    pub status: Option<String>,
    pub asset_id: Option<String>,
}
