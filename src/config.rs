//! Client configuration
//!
//! The news client takes everything it needs at construction. Reading the
//! credential from the environment happens here, at the edge, so the client
//! itself never touches process state.

use std::path::PathBuf;

use crate::data::NewsError;

/// Environment variable holding the NewsAPI key
pub const API_KEY_ENV: &str = "GNEWS_API_KEY";

/// Snapshot file used when no other path is configured, relative to the working directory
pub const DEFAULT_CACHE_FILE: &str = ".cached_pages";

/// Base URL for the NewsAPI v2 endpoints
pub const NEWS_API_BASE_URL: &str = "https://newsapi.org/v2";

/// Settings for a `NewsClient`
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// NewsAPI key sent with every request
    pub api_key: String,
    /// Base URL the endpoint paths are appended to
    pub base_url: String,
    /// Where the cache snapshot is read from and written to
    pub cache_path: PathBuf,
    /// Whether to load the snapshot when the client is built
    pub load_cache: bool,
}

impl ClientConfig {
    /// Creates a configuration with default URL and cache location
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: NEWS_API_BASE_URL.to_string(),
            cache_path: PathBuf::from(DEFAULT_CACHE_FILE),
            load_cache: true,
        }
    }

    /// Reads the API key from `GNEWS_API_KEY`
    ///
    /// # Returns
    /// * `Ok(ClientConfig)` with defaults for everything else
    /// * `Err(NewsError::MissingCredential)` if the variable is unset or empty
    pub fn from_env() -> Result<Self, NewsError> {
        Self::from_key_var(std::env::var(API_KEY_ENV).ok())
    }

    fn from_key_var(value: Option<String>) -> Result<Self, NewsError> {
        value
            .filter(|key| !key.trim().is_empty())
            .map(Self::new)
            .ok_or(NewsError::MissingCredential)
    }

    /// Overrides the API base URL (used to point tests at a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Overrides the snapshot file location
    pub fn with_cache_path(mut self, cache_path: impl Into<PathBuf>) -> Self {
        self.cache_path = cache_path.into();
        self
    }

    /// Sets whether the snapshot is loaded at construction
    pub fn with_load_cache(mut self, load_cache: bool) -> Self {
        self.load_cache = load_cache;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_defaults() {
        let config = ClientConfig::new("secret");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.base_url, NEWS_API_BASE_URL);
        assert_eq!(config.cache_path, PathBuf::from(".cached_pages"));
        assert!(config.load_cache);
    }

    #[test]
    fn test_missing_key_is_missing_credential() {
        let result = ClientConfig::from_key_var(None);
        assert!(matches!(result, Err(NewsError::MissingCredential)));
    }

    #[test]
    fn test_blank_key_is_missing_credential() {
        let result = ClientConfig::from_key_var(Some("   ".to_string()));
        assert!(matches!(result, Err(NewsError::MissingCredential)));
    }

    #[test]
    fn test_present_key_is_used() {
        let config = ClientConfig::from_key_var(Some("abc123".to_string())).unwrap();
        assert_eq!(config.api_key, "abc123");
    }

    #[test]
    fn test_builder_overrides() {
        let config = ClientConfig::new("k")
            .with_base_url("http://127.0.0.1:1234/")
            .with_cache_path("/tmp/nfetch/cache.json")
            .with_load_cache(false);

        assert_eq!(config.base_url, "http://127.0.0.1:1234");
        assert_eq!(config.cache_path, PathBuf::from("/tmp/nfetch/cache.json"));
        assert!(!config.load_cache);
    }
}
