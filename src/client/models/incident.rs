//! Incident models

use std::fmt;

use serde::{Deserialize, Serialize};

use super::common::{PageParams, Severity};

/// Security incident
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub severity: Severity,

    #[serde(default)]
    pub status: IncidentStatus,

    /// Analyst the incident is assigned to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_team: Option<String>,

    #[serde(default)]
    pub affected_assets: Vec<IncidentAsset>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub priority_score: f64,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub updated_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<String>,
}

/// Lifecycle status of an incident
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    Open,
    Investigating,
    Contained,
    Eradicated,
    Recovered,
    Closed,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IncidentStatus::Open => "open",
            IncidentStatus::Investigating => "investigating",
            IncidentStatus::Contained => "contained",
            IncidentStatus::Eradicated => "eradicated",
            IncidentStatus::Recovered => "recovered",
            IncidentStatus::Closed => "closed",
            IncidentStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Asset reference embedded in an incident
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentAsset {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub criticality: Severity,
}

/// Body of `POST /incidents`
#[derive(Debug, Clone, Serialize)]
pub struct CreateIncidentRequest {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Body of `PUT /incidents/{id}`; only present fields are changed
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateIncidentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<IncidentStatus>,
}

/// Filters for incident and alert listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub page: PageParams,
    pub severity: Option<String>,
    pub status: Option<String>,
    pub assignee: Option<String>,
}
