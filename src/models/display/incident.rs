//! Incident display models

use serde::Serialize;
use tabled::Tabled;

use super::common::{format_timestamp, or_dash, truncate_string};
use crate::client::models::Incident;

/// Incident display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct IncidentDisplay {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "SEVERITY")]
    pub severity: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    /// Title, truncated for the table
    #[tabled(rename = "TITLE")]
    pub title: String,

    #[tabled(rename = "ASSIGNEE")]
    pub assignee: String,

    #[tabled(rename = "PRIORITY")]
    pub priority: String,

    #[tabled(rename = "CREATED")]
    pub created: String,
}

impl From<&Incident> for IncidentDisplay {
    fn from(incident: &Incident) -> Self {
        Self {
            id: incident.id.clone(),
            severity: incident.severity.to_string(),
            status: incident.status.to_string(),
            title: truncate_string(&incident.title, 50),
            assignee: or_dash(incident.assigned_to.as_deref()),
            priority: format!("{:.1}", incident.priority_score),
            created: format_timestamp(&incident.created_at),
        }
    }
}

impl From<Incident> for IncidentDisplay {
    fn from(incident: Incident) -> Self {
        IncidentDisplay::from(&incident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incident_display() {
        let incident: Incident = serde_json::from_value(serde_json::json!({
            "id": "INC-7",
            "title": "Credential stuffing against the customer portal login endpoint",
            "severity": "critical",
            "status": "open",
            "priority_score": 9.25,
            "created_at": "2024-05-02T08:00:00Z"
        }))
        .unwrap();

        let display = IncidentDisplay::from(incident);

        assert_eq!(display.id, "INC-7");
        assert_eq!(display.severity, "critical");
        assert_eq!(display.status, "open");
        assert!(display.title.ends_with("..."));
        assert_eq!(display.title.chars().count(), 50);
        assert_eq!(display.assignee, "--");
        assert_eq!(display.priority, "9.2");
        assert_eq!(display.created, "2024-05-02 08:00");
    }
}
