//! Filter argument types for CLI commands

use clap::Args;

use super::{DepthArg, PaginationArgs};
use crate::client::models::{
    AssetFilter, ListFilter, ScanConstraints, ScanDepth, TargetConfig, VulnerabilityFilter,
};

/// Filters shared by incident and alert lists
#[derive(Args, Debug, Default, Clone)]
pub struct ListFilterArgs {
    /// Filter by severity (critical, high, medium, low)
    #[arg(long, short = 's')]
    pub severity: Option<String>,

    /// Filter by status
    #[arg(long)]
    pub status: Option<String>,

    /// Filter by assignee
    #[arg(long, short = 'a')]
    pub assignee: Option<String>,
}

impl ListFilterArgs {
    pub fn to_filter(&self, pagination: &PaginationArgs) -> ListFilter {
        ListFilter {
            page: pagination.to_params(),
            severity: self.severity.clone(),
            status: self.status.clone(),
            assignee: self.assignee.clone(),
        }
    }
}

/// Filter arguments for asset list command
#[derive(Args, Debug, Default, Clone)]
pub struct AssetFilterArgs {
    /// Filter by asset type (server, workstation, ...)
    #[arg(long = "type", short = 't')]
    pub asset_type: Option<String>,

    /// Filter by owner
    #[arg(long)]
    pub owner: Option<String>,

    /// Minimum risk score
    #[arg(long)]
    pub risk_score: Option<u32>,
}

impl AssetFilterArgs {
    pub fn to_filter(&self, pagination: &PaginationArgs) -> AssetFilter {
        AssetFilter {
            page: pagination.to_params(),
            asset_type: self.asset_type.clone(),
            owner: self.owner.clone(),
            risk_score: self.risk_score,
        }
    }
}

/// Filter arguments for vulnerability list command
#[derive(Args, Debug, Default, Clone)]
pub struct VulnFilterArgs {
    /// Filter by severity (critical, high, medium, low)
    #[arg(long, short = 's')]
    pub severity: Option<String>,

    /// Filter by status (open, in_progress, remediated, ...)
    #[arg(long)]
    pub status: Option<String>,

    /// Only vulnerabilities affecting this asset
    #[arg(long)]
    pub asset: Option<String>,
}

impl VulnFilterArgs {
    pub fn to_filter(&self, pagination: &PaginationArgs) -> VulnerabilityFilter {
        VulnerabilityFilter {
            page: pagination.to_params(),
            severity: self.severity.clone(),
            status: self.status.clone(),
            asset_id: self.asset.clone(),
        }
    }
}

/// What a penetration test should cover.
///
/// Supports both repeated flags and comma-separated values:
/// `--feature recon --feature vuln` or `--feature recon,vuln`.
#[derive(Args, Debug, Default, Clone)]
pub struct TargetArgs {
    /// Hosts, ranges, or URLs to test
    #[arg(required = true)]
    pub targets: Vec<String>,

    /// Scan depth (quick, standard, deep)
    #[arg(long, short = 'd', value_enum, default_value = "standard")]
    pub depth: DepthArg,

    /// Test features to enable
    #[arg(long = "feature", short = 'f', value_delimiter = ',')]
    pub features: Vec<String>,

    /// Simulate the scan without touching the targets
    #[arg(long)]
    pub simulate: bool,

    /// Skip destructive checks
    #[arg(long)]
    pub exclude_destructive: bool,

    /// Throttle requests against the targets
    #[arg(long)]
    pub rate_limiting: bool,

    /// Reduce scan noise
    #[arg(long)]
    pub stealth: bool,
}

impl TargetArgs {
    pub fn to_target(&self) -> TargetConfig {
        let depth = match self.depth {
            DepthArg::Quick => ScanDepth::Quick,
            DepthArg::Standard => ScanDepth::Standard,
            DepthArg::Deep => ScanDepth::Deep,
        };

        let constraints = (self.exclude_destructive || self.rate_limiting || self.stealth)
            .then_some(ScanConstraints {
                exclude_destructive: self.exclude_destructive,
                rate_limiting: self.rate_limiting,
                stealth_mode: self.stealth,
            });

        TargetConfig {
            targets: self.targets.clone(),
            depth,
            features: self.features.clone(),
            simulate: self.simulate.then_some(true),
            constraints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_filter_carries_pagination() {
        let args = ListFilterArgs {
            severity: Some("high".into()),
            ..Default::default()
        };
        let pagination = PaginationArgs {
            limit: Some(10),
            page: Some(2),
        };

        let filter = args.to_filter(&pagination);

        assert_eq!(filter.severity.as_deref(), Some("high"));
        assert_eq!(filter.page.page, Some(2));
        assert_eq!(filter.page.limit, Some(10));
        assert!(filter.status.is_none());
    }

    #[test]
    fn test_target_without_constraints() {
        let args = TargetArgs {
            targets: vec!["10.0.0.0/24".into()],
            features: vec!["recon".into()],
            ..Default::default()
        };

        let target = args.to_target();

        assert_eq!(target.depth, ScanDepth::Standard);
        assert_eq!(target.features, vec!["recon"]);
        assert!(target.constraints.is_none());
        assert!(target.simulate.is_none());
    }

    #[test]
    fn test_target_with_constraints() {
        let args = TargetArgs {
            targets: vec!["app.example".into()],
            depth: DepthArg::Deep,
            stealth: true,
            simulate: true,
            ..Default::default()
        };

        let target = args.to_target();

        assert_eq!(target.depth, ScanDepth::Deep);
        assert_eq!(target.simulate, Some(true));
        let constraints = target.constraints.unwrap();
        assert!(constraints.stealth_mode);
        assert!(!constraints.exclude_destructive);
    }
}
