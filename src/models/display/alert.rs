//! Alert display models

use serde::Serialize;
use tabled::Tabled;

use super::common::{format_timestamp, truncate_string};
use crate::client::models::Alert;

/// Alert display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct AlertDisplay {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "SEVERITY")]
    pub severity: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    #[tabled(rename = "TITLE")]
    pub title: String,

    /// Detection source (EDR, SIEM, ...)
    #[tabled(rename = "SOURCE")]
    pub source: String,

    /// Affected asset name, or `--`
    #[tabled(rename = "ASSET")]
    pub asset: String,

    /// Detector confidence as a percentage
    #[tabled(rename = "CONF")]
    pub confidence: String,

    /// Incident the alert was escalated to
    #[tabled(rename = "INCIDENT")]
    pub incident: String,

    #[tabled(rename = "SEEN")]
    pub seen: String,
}

impl From<&Alert> for AlertDisplay {
    fn from(alert: &Alert) -> Self {
        let asset = alert
            .asset
            .as_ref()
            .map(|a| if a.name.is_empty() { a.id.clone() } else { a.name.clone() })
            .unwrap_or_else(|| "--".to_string());

        let incident = match (&alert.incident_id, alert.escalated_to_incident) {
            (Some(id), _) => id.clone(),
            (None, true) => "yes".to_string(),
            (None, false) => "--".to_string(),
        };

        Self {
            id: alert.id.clone(),
            severity: alert.severity.to_string(),
            status: alert.status.to_string(),
            title: truncate_string(&alert.title, 50),
            source: alert.source.clone(),
            asset,
            confidence: format!("{:.0}%", alert.confidence),
            incident,
            seen: format_timestamp(&alert.timestamp),
        }
    }
}

impl From<Alert> for AlertDisplay {
    fn from(alert: Alert) -> Self {
        AlertDisplay::from(&alert)
    }
}
