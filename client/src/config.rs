//! Store connection settings.
//!
//! The CLI resolves flags and environment through clap and hands the raw
//! values to [`StoreConfig::new`]. Library callers without clap use
//! [`StoreConfig::from_env`], which reads the same variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

pub const BASE_URL_ENV: &str = "QR_EDITOR_BASE_URL";
pub const TIMEOUT_ENV: &str = "QR_EDITOR_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request timeout must be at least 1 second")]
    ZeroTimeout,
}

/// Validated connection settings for an artifact store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    base_url: String,
    request_timeout: Duration,
    connect_timeout: Duration,
}

impl StoreConfig {
    /// Validate a base URL and request timeout.
    ///
    /// The base URL must be absolute `http` or `https`; a trailing `/` is
    /// dropped so endpoint paths can be appended directly.
    ///
    /// # Errors
    ///
    /// `InvalidBaseUrl` for an unparsable or non-HTTP URL, `ZeroTimeout` for
    /// a zero timeout.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = reqwest::Url::parse(trimmed)
            .map_err(|e| ConfigError::InvalidBaseUrl { url: base_url.to_owned(), reason: e.to_string() })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: format!("unsupported scheme `{}`", parsed.scheme()),
            });
        }
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let request_timeout = Duration::from_secs(timeout_secs);
        let connect_timeout = request_timeout.min(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));
        Ok(Self { base_url: trimmed.to_owned(), request_timeout, connect_timeout })
    }

    /// Build from `QR_EDITOR_BASE_URL` and `QR_EDITOR_TIMEOUT_SECS`.
    ///
    /// Missing variables fall back to the defaults. An unparsable timeout
    /// also falls back to the default.
    ///
    /// # Errors
    ///
    /// Same as [`StoreConfig::new`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let timeout_secs = env_parse_u64(TIMEOUT_ENV, DEFAULT_REQUEST_TIMEOUT_SECS);
        Self::new(&base_url, timeout_secs)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}
