//! Storefront client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//! - `RELAB_API_BASE_URL` - Backend API root (default: `http://localhost:8000/api/v1`)
//! - `RELAB_MEDIA_BASE_URL` - Host that serves relative image paths (default: `http://localhost:8000`)
//! - `RELAB_SESSION_FILE` - Where the session is persisted (default: `$HOME/.relab/session.json`)
//! - `RELAB_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: none)
//! - `RELAB_CATALOG_CACHE_TTL_SECS` - Product/category cache lifetime, `0` disables (default: 0)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
const DEFAULT_MEDIA_BASE_URL: &str = "http://localhost:8000";
const SESSION_DIR: &str = ".relab";
const SESSION_FILE: &str = "session.json";
const FALLBACK_SESSION_FILE: &str = ".relab-session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend API settings
    pub api: ApiConfig,
    /// File holding the persisted session
    pub session_file: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Backend API settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API root; resource paths are appended to it
    pub base_url: Url,
    /// Prefix for relative media paths returned by the API
    pub media_base_url: Url,
    /// Per-request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
    /// Catalog cache lifetime; zero disables caching
    pub catalog_cache_ttl: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::with_base_url(default_url(DEFAULT_API_BASE_URL))
    }
}

impl ApiConfig {
    /// Settings for an API rooted at `base_url`, with every other option at its default.
    #[must_use]
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url: with_trailing_slash(base_url),
            media_base_url: default_url(DEFAULT_MEDIA_BASE_URL),
            request_timeout: None,
            catalog_cache_ttl: Duration::ZERO,
        }
    }

    /// Resolve an image path from the API against the media host.
    ///
    /// Absolute URLs are returned unchanged.
    #[must_use]
    pub fn media_url(&self, path: &str) -> String {
        if Url::parse(path).is_ok() {
            return path.to_owned();
        }
        self.media_base_url
            .join(path)
            .map_or_else(|_| path.to_owned(), String::from)
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparsable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = parse_url(&lookup, "RELAB_API_BASE_URL", DEFAULT_API_BASE_URL)?;
        let media_base_url = parse_url(&lookup, "RELAB_MEDIA_BASE_URL", DEFAULT_MEDIA_BASE_URL)?;
        let request_timeout = parse_secs(&lookup, "RELAB_REQUEST_TIMEOUT_SECS")?;
        let catalog_cache_ttl =
            parse_secs(&lookup, "RELAB_CATALOG_CACHE_TTL_SECS")?.unwrap_or(Duration::ZERO);

        let session_file = lookup("RELAB_SESSION_FILE")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| default_session_file(lookup("HOME")), PathBuf::from);

        Ok(Self {
            api: ApiConfig {
                base_url,
                media_base_url,
                request_timeout,
                catalog_cache_ttl,
            },
            session_file,
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn default_url(raw: &str) -> Url {
    Url::parse(raw).expect("built-in default URLs are valid")
}

/// Parse a URL variable, forcing a trailing slash so `Url::join` appends
/// instead of replacing the last segment.
fn parse_url<F>(lookup: &F, key: &str, default: &str) -> Result<Url, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an http(s) URL".to_string(),
        ));
    }
    Ok(with_trailing_slash(url))
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn parse_secs<F>(lookup: &F, key: &str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .map(|v| {
            v.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
        .transpose()
}

fn default_session_file(home: Option<String>) -> PathBuf {
    home.filter(|h| !h.is_empty()).map_or_else(
        || PathBuf::from(FALLBACK_SESSION_FILE),
        |home| PathBuf::from(home).join(SESSION_DIR).join(SESSION_FILE),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("HOME", "/home/maria")]).unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://localhost:8000/api/v1/");
        assert_eq!(config.api.media_base_url.as_str(), "http://localhost:8000/");
        assert!(config.api.request_timeout.is_none());
        assert_eq!(config.api.catalog_cache_ttl, Duration::ZERO);
        assert_eq!(
            config.session_file,
            PathBuf::from("/home/maria/.relab/session.json")
        );
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_session_file_without_home() {
        let config = load(&[]).unwrap();
        assert_eq!(config.session_file, PathBuf::from(".relab-session.json"));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("RELAB_API_BASE_URL", "https://api.relab.com.br/api/v1"),
            ("RELAB_REQUEST_TIMEOUT_SECS", "15"),
            ("RELAB_CATALOG_CACHE_TTL_SECS", "300"),
            ("RELAB_SESSION_FILE", "/tmp/relab.json"),
        ])
        .unwrap();
        assert_eq!(
            config.api.base_url.as_str(),
            "https://api.relab.com.br/api/v1/"
        );
        assert_eq!(config.api.request_timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.api.catalog_cache_ttl, Duration::from_secs(300));
        assert_eq!(config.session_file, PathBuf::from("/tmp/relab.json"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("RELAB_API_BASE_URL", "not a url")]),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "RELAB_API_BASE_URL"
        ));
        assert!(matches!(
            load(&[("RELAB_REQUEST_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "RELAB_REQUEST_TIMEOUT_SECS"
        ));
        assert!(load(&[("RELAB_API_BASE_URL", "mailto:a@b.c")]).is_err());
    }

    #[test]
    fn test_media_url() {
        let api = ApiConfig::default();
        assert_eq!(
            api.media_url("/media/produtos/fone.jpg"),
            "http://localhost:8000/media/produtos/fone.jpg"
        );
        assert_eq!(
            api.media_url("https://cdn.relab.com.br/x.png"),
            "https://cdn.relab.com.br/x.png"
        );
    }
}
