//! Global CLI options shared across all commands
//!
//! This module provides a centralized struct for global CLI options, so
//! handlers take one argument instead of every flag.

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// For most options, the precedence is: CLI flag > environment variable > config file > default.
/// This struct captures the CLI/env layer; [`GlobalOptions::apply`] lays it over
/// the loaded config.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Output format (pretty, table, json)
    pub format: OutputFormat,

    /// Custom config file path (defaults to ~/.cybrty/config.yaml)
    pub config: Option<String>,

    /// Bypass cache and fetch fresh data from API
    pub no_cache: bool,

    /// Platform API base URL override
    pub api_url: Option<String>,

    /// Scanner API base URL override
    pub scanner_url: Option<String>,

    /// Results API base URL override
    pub results_url: Option<String>,

    /// Session token override
    pub token: Option<String>,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    ///
    /// This is the primary constructor, called once in main.rs after parsing.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            no_cache: cli.no_cache,
            api_url: cli.api_url.clone(),
            scanner_url: cli.scanner_url.clone(),
            results_url: cli.results_url.clone(),
            token: cli.token.clone(),
        }
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    /// Overlay the CLI/env overrides on a loaded config
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        if let Some(url) = &self.scanner_url {
            config.scanner_url = url.clone();
        }
        if let Some(url) = &self.results_url {
            config.results_url = url.clone();
        }
        if let Some(token) = &self.token {
            config.auth_token = Some(token.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_options_accessors() {
        let opts = GlobalOptions {
            format: OutputFormat::Json,
            config: Some("/custom/path".to_string()),
            no_cache: true,
            ..Default::default()
        };

        assert_eq!(opts.config_ref(), Some("/custom/path"));
        assert!(opts.no_cache);
        assert_eq!(GlobalOptions::default().config_ref(), None);
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let opts = GlobalOptions {
            scanner_url: Some("http://scanner.test".to_string()),
            token: Some("tok".to_string()),
            ..Default::default()
        };
        let mut config = Config::default();

        opts.apply(&mut config);

        assert_eq!(config.scanner_url, "http://scanner.test");
        assert_eq!(config.auth_token.as_deref(), Some("tok"));
        assert_eq!(config.api_url, crate::config::DEFAULT_API_URL);
    }
}
