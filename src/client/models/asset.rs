//! Asset models

use std::fmt;

use serde::{Deserialize, Serialize};

use super::common::{PageParams, Severity};

/// Managed asset (server, workstation, device, cloud instance)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub hostname: String,

    /// Asset type, e.g. "server" or "cloud_instance"
    #[serde(default, rename = "type")]
    pub asset_type: String,

    #[serde(default)]
    pub operating_system: String,

    #[serde(default)]
    pub ip_addresses: Vec<String>,

    #[serde(default)]
    pub criticality: Severity,

    #[serde(default)]
    pub owner: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub status: AssetStatus,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    Active,
    Inactive,
    Pending,
    Resolved,
    Investigating,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssetStatus::Active => "active",
            AssetStatus::Inactive => "inactive",
            AssetStatus::Pending => "pending",
            AssetStatus::Resolved => "resolved",
            AssetStatus::Investigating => "investigating",
            AssetStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Response of `POST /assets/{id}/scan`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetScan {
    #[serde(rename = "scanId")]
    pub scan_id: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetFilter {
    pub page: PageParams,
    pub asset_type: Option<String>,
    pub owner: Option<String>,
    pub risk_score: Option<u32>,
}
