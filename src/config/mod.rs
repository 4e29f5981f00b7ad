//! Configuration management for Cybrty

use std::path::PathBuf;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{ClientConfig, RetryPolicy};
use crate::error::{ConfigError, Result};
use crate::scan::PollOptions;

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_SCANNER_URL: &str = "http://localhost:8000";
pub const DEFAULT_RESULTS_URL: &str = "http://localhost:8000";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Platform API (incidents, alerts, assets, vulnerabilities)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Scanning backend (launch, status, cancel)
    #[serde(default = "default_scanner_url")]
    pub scanner_url: String,

    /// Results backend
    #[serde(default = "default_results_url")]
    pub results_url: String,

    /// Session token sent as a bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    /// Sent as `X-API-Key`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default)]
    pub request: RequestSettings,

    #[serde(default)]
    pub scan: ScanSettings,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_scanner_url() -> String {
    DEFAULT_SCANNER_URL.to_string()
}

fn default_results_url() -> String {
    DEFAULT_RESULTS_URL.to_string()
}

/// HTTP behaviour shared by every client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSettings {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries after the first attempt
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Delay before the first retry; doubles for each one after
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1_000
}

fn default_cache_ttl_secs() -> u64 {
    300
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

/// Scan polling budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_max_attempts() -> u32 {
    60
}

fn default_interval_ms() -> u64 {
    5_000
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_ms: default_interval_ms(),
        }
    }
}

/// User preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            scanner_url: default_scanner_url(),
            results_url: default_results_url(),
            auth_token: None,
            api_key: None,
            request: RequestSettings::default(),
            scan: ScanSettings::default(),
            preferences: Preferences::default(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".cybrty").join("config.yaml"))
    }

    /// Resolve the config path: an explicit path wins over the default
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from `path` or the default location
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_from(Self::resolve_path(path)?)
    }

    /// Save configuration to `path` or the default location
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        self.save_to(Self::resolve_path(path)?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(&path, contents)?;

        // The file may hold a session token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// Reject configurations no client could work with
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("the platform API", &self.api_url),
            ("the scanner API", &self.scanner_url),
            ("the results API", &self.results_url),
        ] {
            if url.trim().is_empty() {
                return Err(ConfigError::MissingBaseUrl(name).into());
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Invalid(format!(
                    "Base URL for {} must start with http:// or https:// (got {})",
                    name, url
                ))
                .into());
            }
        }
        if self.scan.max_attempts == 0 {
            return Err(ConfigError::Invalid("scan.max_attempts must be at least 1".into()).into());
        }
        Ok(())
    }

    /// Client settings for a client rooted at `base_url`
    pub fn client_config(&self, base_url: &str) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_millis(self.request.timeout_ms),
            retry: RetryPolicy::new(
                self.request.retry_attempts,
                Duration::from_millis(self.request.retry_delay_ms),
            ),
            cache_ttl: Duration::from_secs(self.request.cache_ttl_secs),
            api_key: self.api_key.clone(),
            auth_token: self.auth_token.clone(),
            ..ClientConfig::new(base_url)
        }
    }

    pub fn poll_options(&self) -> PollOptions {
        PollOptions {
            max_attempts: self.scan.max_attempts,
            interval: Duration::from_millis(self.scan.interval_ms),
        }
    }

    /// Expiry of the session token, when it is a JWT carrying `exp`
    pub fn token_expires_at(&self) -> Option<DateTime<Utc>> {
        let token = self.auth_token.as_deref()?;
        let payload = token.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .ok()?;
        let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
        let exp = claims.get("exp")?.as_i64()?;
        DateTime::from_timestamp(exp, 0)
    }

    /// Check if the session token is missing, expired, or will expire soon
    /// (within 5 minutes). Opaque tokens are assumed valid.
    pub fn is_token_expired(&self) -> bool {
        if self.auth_token.is_none() {
            return true;
        }
        match self.token_expires_at() {
            None => false,
            Some(expires_at) => expires_at - chrono::Duration::minutes(5) < Utc::now(),
        }
    }
}
