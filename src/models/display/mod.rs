//! Display model implementations for table and JSON output
//!
//! Display models transform API response types into CLI-friendly formats
//! with appropriate column names and serialization.

mod alert;
mod asset;
pub mod common;
mod incident;
mod scan;
mod vuln;

// Re-export all display types used by CLI commands
pub use alert::AlertDisplay;
pub use asset::AssetDisplay;
pub use incident::IncidentDisplay;
pub use scan::{FindingDisplay, ScanDisplay, ScanStatusDisplay, format_severity_counts};
pub use vuln::VulnDisplay;
