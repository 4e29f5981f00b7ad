//! CLI command definitions and handlers

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod alert;
pub mod args;
pub mod asset;
pub mod completions;
pub mod context;
pub mod incident;
pub mod init;
pub mod scan;
pub mod status;
pub mod vuln;

pub use args::{
    AssetFilterArgs, ListFilterArgs, OutputFormat, PaginationArgs, TargetArgs, VulnFilterArgs,
};
pub use context::CommandContext;

/// Cybrty CLI - security operations from the terminal
#[derive(Parser, Debug)]
#[command(name = "cybrty")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "CYBRTY_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "CYBRTY_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "CYBRTY_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Bypass cache, fetch fresh data from API
    #[arg(long, global = true, env = "CYBRTY_NO_CACHE", hide_env = true)]
    pub no_cache: bool,

    /// Platform API base URL
    #[arg(long, global = true, env = "CYBRTY_API_URL", hide = true)]
    pub api_url: Option<String>,

    /// Scanner API base URL
    #[arg(long, global = true, env = "CYBRTY_SCANNER_URL", hide = true)]
    pub scanner_url: Option<String>,

    /// Results API base URL
    #[arg(long, global = true, env = "CYBRTY_RESULTS_URL", hide = true)]
    pub results_url: Option<String>,

    /// Session token
    #[arg(long, global = true, env = "CYBRTY_TOKEN", hide = true)]
    pub token: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Cybrty configuration
    Init,

    /// Show configuration and backend status
    Status,

    /// Display version information
    Version,

    /// Launch and track penetration test scans
    #[command(subcommand)]
    Scan(ScanCommands),

    /// View and manage incidents
    #[command(subcommand)]
    Incident(IncidentCommands),

    /// View assets and trigger asset scans
    #[command(subcommand)]
    Asset(AssetCommands),

    /// View and patch vulnerabilities
    #[command(subcommand)]
    Vuln(VulnCommands),

    /// View security alerts
    #[command(subcommand)]
    Alert(AlertCommands),

    /// Generate shell completions
    #[command(after_help = "\
Examples:
  bash:   cybrty completion bash > /etc/bash_completion.d/cybrty
  zsh:    cybrty completion zsh > \"${fpath[1]}/_cybrty\"
  fish:   cybrty completion fish > ~/.config/fish/completions/cybrty.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Scan subcommands
#[derive(Subcommand, Debug)]
pub enum ScanCommands {
    /// Launch a penetration test
    ///
    /// Waits for the scan to finish unless --detach is given. Ctrl-C while
    /// waiting cancels the scan.
    Launch {
        #[command(flatten)]
        target: TargetArgs,

        /// Return as soon as the scan is accepted
        #[arg(long)]
        detach: bool,
    },

    /// Follow a running scan until it finishes
    Watch {
        /// Scan ID
        scan_id: String,
    },

    /// Show the current status of a scan
    Status {
        /// Scan ID
        scan_id: String,
    },

    /// Show results for one or more scans
    Results {
        /// Scan IDs
        #[arg(required = true)]
        scan_ids: Vec<String>,

        /// Bypass the results cache for these scans
        #[arg(long)]
        refresh: bool,
    },

    /// List historical scan results
    List {
        /// Only scans belonging to this company
        #[arg(long)]
        company: Option<String>,

        /// Maximum results to return
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Cancel a running scan
    Cancel {
        /// Scan ID
        scan_id: String,
    },
}

/// Incident subcommands
#[derive(Subcommand, Debug)]
pub enum IncidentCommands {
    /// List incidents
    List {
        #[command(flatten)]
        filters: ListFilterArgs,

        #[command(flatten)]
        pagination: PaginationArgs,
    },

    /// Show one incident
    Get {
        /// Incident ID
        id: String,
    },

    /// Assign an incident to an analyst
    Assign {
        /// Incident ID
        id: String,

        /// Analyst to assign
        assignee: String,
    },

    /// Close an incident
    Close {
        /// Incident ID
        id: String,

        /// Resolution note
        #[arg(long, short = 'r')]
        resolution: String,
    },
}

/// Asset subcommands
#[derive(Subcommand, Debug)]
pub enum AssetCommands {
    /// List assets
    List {
        #[command(flatten)]
        filters: AssetFilterArgs,

        #[command(flatten)]
        pagination: PaginationArgs,
    },

    /// Show one asset
    Get {
        /// Asset ID
        id: String,
    },

    /// Trigger a scan of an asset
    Scan {
        /// Asset ID
        id: String,
    },
}

/// Vulnerability subcommands
#[derive(Subcommand, Debug)]
pub enum VulnCommands {
    /// List vulnerabilities
    List {
        #[command(flatten)]
        filters: VulnFilterArgs,

        #[command(flatten)]
        pagination: PaginationArgs,
    },

    /// Show one vulnerability
    Get {
        /// Vulnerability ID
        id: String,
    },

    /// Mark a vulnerability as patched
    Patch {
        /// Vulnerability ID
        id: String,
    },
}

/// Alert subcommands
#[derive(Subcommand, Debug)]
pub enum AlertCommands {
    /// List alerts
    List {
        #[command(flatten)]
        filters: ListFilterArgs,

        #[command(flatten)]
        pagination: PaginationArgs,
    },
}
