//! Vulnerability display models

use serde::Serialize;
use tabled::Tabled;

use super::common::{or_dash, truncate_string};
use crate::client::models::Vulnerability;

/// Vulnerability display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct VulnDisplay {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "CVE")]
    pub cve: String,

    #[tabled(rename = "SEVERITY")]
    pub severity: String,

    #[tabled(rename = "CVSS")]
    pub cvss: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    #[tabled(rename = "TITLE")]
    pub title: String,

    /// Number of affected assets
    #[tabled(rename = "ASSETS")]
    pub assets: usize,

    /// `exploit`, `patch`, both, or `--`
    #[tabled(rename = "FLAGS")]
    pub flags: String,
}

impl From<&Vulnerability> for VulnDisplay {
    fn from(vuln: &Vulnerability) -> Self {
        let mut flags = Vec::new();
        if vuln.exploit_available {
            flags.push("exploit");
        }
        if vuln.patch_available {
            flags.push("patch");
        }

        Self {
            id: vuln.id.clone(),
            cve: or_dash(Some(&vuln.cve_id)),
            severity: vuln.severity.to_string(),
            cvss: format!("{:.1}", vuln.cvss_score),
            status: vuln.status.to_string(),
            title: truncate_string(&vuln.title, 50),
            assets: vuln.affected_assets.len(),
            flags: if flags.is_empty() {
                "--".to_string()
            } else {
                flags.join(",")
            },
        }
    }
}

impl From<Vulnerability> for VulnDisplay {
    fn from(vuln: Vulnerability) -> Self {
        VulnDisplay::from(&vuln)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vuln_display_flags() {
        let vuln: Vulnerability = serde_json::from_value(serde_json::json!({
            "id": "v-1",
            "cve_id": "CVE-2024-3094",
            "title": "xz backdoor",
            "severity": "critical",
            "cvss_score": 10.0,
            "status": "open",
            "exploit_available": true,
            "patch_available": true
        }))
        .unwrap();

        let display = VulnDisplay::from(vuln);

        assert_eq!(display.cve, "CVE-2024-3094");
        assert_eq!(display.cvss, "10.0");
        assert_eq!(display.flags, "exploit,patch");
        assert_eq!(display.assets, 0);
    }
}
