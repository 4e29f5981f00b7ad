//! Alert and threat intelligence models

use std::fmt;

use serde::{Deserialize, Serialize};

use super::common::Severity;

/// Detection alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub severity: Severity,

    #[serde(default)]
    pub status: AlertStatus,

    /// Detection source, e.g. the SIEM rule engine
    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub timestamp: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<AlertAsset>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mitre_attack: Option<MitreAttack>,

    /// Detection confidence (0-100)
    #[serde(default)]
    pub confidence: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,

    #[serde(default)]
    pub escalated_to_incident: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    New,
    Acknowledged,
    Investigating,
    Resolved,
    Suppressed,
    FalsePositive,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlertStatus::New => "new",
            AlertStatus::Acknowledged => "acknowledged",
            AlertStatus::Investigating => "investigating",
            AlertStatus::Resolved => "resolved",
            AlertStatus::Suppressed => "suppressed",
            AlertStatus::FalsePositive => "false_positive",
            AlertStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertAsset {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub ip_address: String,
}

/// MITRE ATT&CK mapping of an alert
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MitreAttack {
    #[serde(default)]
    pub tactics: Vec<String>,
    #[serde(default)]
    pub techniques: Vec<String>,
    #[serde(default)]
    pub technique_names: Vec<String>,
}

/// Threat intelligence query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreatIntelQuery {
    pub indicators: Vec<String>,
    pub sources: Vec<String>,
    pub confidence: Option<u32>,
}
