//! Runtime configuration resolved once at startup.
//!
//! The only external setting is the backend base URL, taken from
//! `ADBOARD_API_URL` with a localhost default for development.

use thiserror::Error;
use url::Url;

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "ADBOARD_API_URL";

/// Base URL used when the environment does not provide one.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8787";

/// Errors raised while resolving the startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configured base URL did not parse.
    #[error("Invalid backend base URL '{value}': {source}")]
    InvalidBaseUrl {
        /// The offending value.
        value: String,
        /// Parse failure from the `url` crate.
        source: url::ParseError,
    },
    /// The configured base URL is not http(s).
    #[error("Backend base URL '{0}' must use http or https")]
    UnsupportedScheme(String),
}

/// Resolved application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Backend base URL all API paths are joined onto.
    pub base_url: Url,
}

impl Config {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let value = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::with_base_url(&value)
    }

    /// Build a configuration from an explicit base URL string.
    pub fn with_base_url(value: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(value).map_err(|source| ConfigError::InvalidBaseUrl {
            value: value.to_string(),
            source,
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(value.to_string()));
        }
        Ok(Self { base_url })
    }

    /// Join an API path (e.g. `/api/performance`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        {
            // http(s) URLs always have a segment-addressable path.
            let mut segments = url
                .path_segments_mut()
                .expect("http(s) base URL has path segments");
            segments.pop_if_empty();
            for segment in path.trim_start_matches('/').split('/') {
                segments.push(segment);
            }
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_path_onto_base() {
        let config = Config::with_base_url("http://localhost:9000").unwrap();
        let url = config.endpoint("/api/performance");
        assert_eq!(url.as_str(), "http://localhost:9000/api/performance");
    }

    #[test]
    fn endpoint_preserves_base_path_prefix() {
        let config = Config::with_base_url("http://localhost:9000/kpi").unwrap();
        let url = config.endpoint("/api/dataset-status");
        assert_eq!(url.as_str(), "http://localhost:9000/kpi/api/dataset-status");
    }

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(Config::with_base_url("not a url").is_err());
    }
}
