//! Configuration for the Phiacta client.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use url::Url;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Default API base URL (local backend).
    pub const DEFAULT_URL: &str = "http://localhost:8000";

    /// Backend health endpoint, relative to the base URL.
    pub const HEALTH_PATH: &str = "/api/v1/health";

    /// Page size used when listing namespaces (the API returns them all at once).
    pub const NAMESPACE_LIMIT: u64 = 200;

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Cache TTL for public reads (1 minute).
    pub const CACHE_TTL: Duration = Duration::from_secs(60);

    /// Maximum cache size.
    pub const CACHE_MAX_SIZE: u64 = 500;

    /// Retries for transient failures.
    pub const MAX_RETRIES: u32 = 2;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Rendering defaults.
pub mod display {
    /// Characters kept in a claim card preview.
    pub const COMPACT_PREVIEW_CHARS: usize = 200;

    /// Claims per page.
    pub const CLAIMS_PAGE_SIZE: u64 = 20;

    /// Sources per page.
    pub const SOURCES_PAGE_SIZE: u64 = 50;
}

/// File name of the persisted bearer token.
pub const TOKEN_FILE_NAME: &str = "phiacta_token";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Public API base URL.
    pub api_url: String,

    /// API base URL reachable from inside the deployment (e.g. a Docker
    /// network name). Server-side requests prefer it over `api_url`.
    pub internal_api_url: Option<String>,

    /// Where the bearer token is persisted.
    pub token_path: PathBuf,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Cache TTL.
    pub cache_ttl: Duration,

    /// Maximum cache size.
    pub cache_max_size: u64,

    /// Retries for transient failures (0 disables retrying).
    pub max_retries: u32,

    /// Characters kept in compact claim previews.
    pub preview_chars: usize,
}

impl Config {
    /// Create a configuration for the given public API URL.
    #[must_use]
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: trim_base(api_url.into()),
            internal_api_url: None,
            token_path: default_token_path(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            cache_ttl: api::CACHE_TTL,
            cache_max_size: api::CACHE_MAX_SIZE,
            max_retries: api::MAX_RETRIES,
            preview_chars: display::COMPACT_PREVIEW_CHARS,
        }
    }

    /// Create a test configuration pointing at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str, token_path: impl Into<PathBuf>) -> Self {
        Self {
            api_url: trim_base(base_url.to_string()),
            internal_api_url: None,
            token_path: token_path.into(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            cache_ttl: Duration::from_secs(0), // No caching in tests
            cache_max_size: 0,
            max_retries: 0,
            preview_chars: display::COMPACT_PREVIEW_CHARS,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `PHIACTA_API_URL`, `PHIACTA_API_URL_INTERNAL`,
    /// `PHIACTA_TOKEN_FILE` and `PHIACTA_PREVIEW_CHARS`.
    ///
    /// # Errors
    ///
    /// Returns error if environment variables are invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_url =
            std::env::var("PHIACTA_API_URL").unwrap_or_else(|_| api::DEFAULT_URL.to_string());
        let mut config = Self::new(api_url);

        if let Ok(internal) = std::env::var("PHIACTA_API_URL_INTERNAL") {
            config.internal_api_url = Some(trim_base(internal));
        }
        if let Ok(path) = std::env::var("PHIACTA_TOKEN_FILE") {
            config.token_path = PathBuf::from(path);
        }
        if let Ok(chars) = std::env::var("PHIACTA_PREVIEW_CHARS") {
            config.preview_chars =
                chars.parse().context("PHIACTA_PREVIEW_CHARS must be a positive integer")?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that URLs parse and the preview length is usable.
    ///
    /// # Errors
    ///
    /// Returns error describing the first invalid setting.
    pub fn validate(&self) -> anyhow::Result<()> {
        Url::parse(&self.api_url).with_context(|| format!("invalid API URL '{}'", self.api_url))?;
        if let Some(internal) = &self.internal_api_url {
            Url::parse(internal).with_context(|| format!("invalid internal API URL '{internal}'"))?;
        }
        anyhow::ensure!(self.preview_chars > 0, "preview length must be positive");
        Ok(())
    }

    /// Base URL for requests made from the server side (health proxy).
    #[must_use]
    pub fn server_api_url(&self) -> &str {
        self.internal_api_url.as_deref().unwrap_or(&self.api_url)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(api::DEFAULT_URL)
    }
}

/// Default token location: `<config dir>/phiacta/phiacta_token`, falling back
/// to the working directory when no config dir is known.
#[must_use]
pub fn default_token_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("phiacta").join(TOKEN_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(format!(".{TOKEN_FILE_NAME}")))
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_url, api::DEFAULT_URL);
        assert!(config.internal_api_url.is_none());
        assert_eq!(config.preview_chars, display::COMPACT_PREVIEW_CHARS);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = Config::new("https://api.phiacta.org/");
        assert_eq!(config.api_url, "https://api.phiacta.org");
    }

    #[test]
    fn test_server_url_prefers_internal() {
        let mut config = Config::new("https://api.phiacta.org");
        assert_eq!(config.server_api_url(), "https://api.phiacta.org");
        config.internal_api_url = Some("http://api:8000".to_string());
        assert_eq!(config.server_api_url(), "http://api:8000");
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        assert!(Config::new("not a url").validate().is_err());
        let config = Config { preview_chars: 0, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_token_path_ends_with_file_name() {
        let path = default_token_path();
        assert!(path.to_string_lossy().ends_with(TOKEN_FILE_NAME));
    }
}
