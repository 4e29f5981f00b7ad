//! Command execution context
//!
//! Provides a unified context for command execution, eliminating boilerplate
//! for config loading, override handling, and client initialization.

use std::sync::Arc;

use colored::Colorize;
use log::{debug, warn};

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::client::{ApiClient, ClientConfig};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::scan::{ScanOrchestrator, ScanService};

/// Context for command execution containing config, clients, and runtime options.
pub struct CommandContext {
    /// Loaded configuration with CLI/env overrides applied
    pub config: Config,
    /// Client for the platform API (incidents, alerts, assets, vulnerabilities)
    pub api: ApiClient,
    /// Scanner and results backends
    pub scans: Arc<ScanService>,
    /// Output format preference
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a new command context with full initialization.
    ///
    /// # Errors
    /// Returns error if config cannot be loaded or is invalid after overrides.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let mut config = Config::load_at(opts.config_ref())?;
        opts.apply(&mut config);
        config.validate()?;

        if config.auth_token.is_some() && config.is_token_expired() {
            warn!("Session token has expired; requests may be rejected");
        }

        let client = |base_url: &str| {
            let client_config = ClientConfig {
                cache_enabled: !opts.no_cache,
                ..config.client_config(base_url)
            };
            debug!("Client for {} (cache: {})", base_url, client_config.cache_enabled);
            ApiClient::http(client_config).with_default_interceptors(session_hint)
        };

        let api = client(&config.api_url);
        let scans = Arc::new(ScanService::new(
            client(&config.scanner_url),
            client(&config.results_url),
        ));

        Ok(Self {
            config,
            api,
            scans,
            format: opts.format,
        })
    }

    /// Orchestrator over this context's scanning backends
    pub fn orchestrator(&self) -> ScanOrchestrator {
        ScanOrchestrator::new(self.scans.clone(), self.config.poll_options())
    }
}

/// 401 handler: the session is gone, point the user at `cybrty init`
fn session_hint(error: &ApiError) {
    debug!("Unauthorized: {}", error);
    eprintln!(
        "{} Session rejected by the server. Run {} to sign in again.",
        "⚠".yellow(),
        "cybrty init".cyan()
    );
}
