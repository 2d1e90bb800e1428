//! Screener configuration.
//!
//! Values are layered: built-in defaults, then an optional JSON file, then
//! `AMPSCAN_*` environment variables. The CLI applies its flags last.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::filter::FilterCriteria;
use crate::http_client::TlsPolicy;
use crate::{CoreError, ValidationError};

pub const ENV_ENDPOINT: &str = "AMPSCAN_ENDPOINT";
pub const ENV_MIN_VOLUME: &str = "AMPSCAN_MIN_VOLUME";
pub const ENV_MAX_VOLUME: &str = "AMPSCAN_MAX_VOLUME";
pub const ENV_MIN_AMPLITUDE: &str = "AMPSCAN_MIN_AMPLITUDE";
pub const ENV_MAX_RESULTS: &str = "AMPSCAN_MAX_RESULTS";
pub const ENV_ACCEPT_INVALID_CERTS: &str = "AMPSCAN_ACCEPT_INVALID_CERTS";

/// Settings for the report request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub timeout_ms: u64,
    /// Bodies shorter than this many characters mean "no session on this date".
    pub min_body_len: usize,
    /// Disable certificate validation. Off unless explicitly requested.
    pub accept_invalid_certs: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: String::from("https://www.twse.com.tw/exchangeReport/MI_INDEX"),
            user_agent: String::from(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/86.0.4240.80 Safari/537.36",
            ),
            timeout_ms: 10_000,
            min_body_len: 500,
            accept_invalid_certs: false,
        }
    }
}

impl FetchConfig {
    pub fn tls_policy(&self) -> TlsPolicy {
        if self.accept_invalid_certs {
            TlsPolicy::AcceptInvalidCerts
        } else {
            TlsPolicy::Verify
        }
    }
}

/// Complete screener configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenerConfig {
    pub fetch: FetchConfig,
    pub filter: FilterCriteria,
    /// Lifetime of cached report tables; zero disables the cache.
    pub cache_ttl_secs: u64,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            filter: FilterCriteria::default(),
            cache_ttl_secs: 600,
        }
    }
}

impl ScreenerConfig {
    /// Defaults, overlaid with `path` when given, then with the process environment.
    ///
    /// Filter thresholds are validated by the screener once every layer is applied.
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CoreError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Override fields from `AMPSCAN_*` variables resolved through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.fetch.endpoint = endpoint;
        }
        if let Some(value) = lookup(ENV_MIN_VOLUME) {
            self.filter.min_volume_lots = parse_env(ENV_MIN_VOLUME, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_VOLUME) {
            self.filter.max_volume_lots = parse_env(ENV_MAX_VOLUME, &value)?;
        }
        if let Some(value) = lookup(ENV_MIN_AMPLITUDE) {
            self.filter.min_amplitude_percent = parse_env(ENV_MIN_AMPLITUDE, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_RESULTS) {
            self.filter.max_results = parse_env(ENV_MAX_RESULTS, &value)?;
        }
        if let Some(value) = lookup(ENV_ACCEPT_INVALID_CERTS) {
            self.fetch.accept_invalid_certs = parse_flag(ENV_ACCEPT_INVALID_CERTS, &value)?;
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ValidationError> {
    value
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidConfigValue {
            key: key.to_owned(),
            value: value.to_owned(),
        })
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ValidationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ValidationError::InvalidConfigValue {
            key: key.to_owned(),
            value: value.to_owned(),
        }),
    }
}
