//! Cybrty API data models
//!
//! Domain types returned by the platform API and the scanning backends,
//! organized by resource type.

mod alert;
mod asset;
mod common;
mod incident;
mod scan;
mod vulnerability;

pub use alert::{Alert, AlertAsset, AlertStatus, MitreAttack, ThreatIntelQuery};
pub use asset::{Asset, AssetFilter, AssetScan, AssetStatus};
pub use common::{PageParams, PaginatedResponse, Severity};
pub use incident::{
    CreateIncidentRequest, Incident, IncidentAsset, IncidentStatus, ListFilter,
    UpdateIncidentRequest,
};
pub use scan::{
    ComplianceFinding, ComplianceStatus, Finding, LaunchRequest, RemoteScanStatus,
    SCAN_TYPE_PENETRATION_TEST, ScanConstraints, ScanDepth, ScanFindings, ScanResultList,
    ScanResults, ScanStatus, ScanSummary, TargetConfig,
};
pub use vulnerability::{Vulnerability, VulnerabilityFilter, VulnerabilityStatus, VulnerableAsset};
