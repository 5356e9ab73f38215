//! NewsAPI client with a one-day query cache
//!
//! This module provides `NewsClient`, which answers top-headline and keyword
//! queries from its cache store when the stored result is less than a day
//! old, and otherwise calls NewsAPI and replaces the stored result.

use std::path::PathBuf;

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

use super::{Article, Category, SearchField, DEFAULT_COUNTRY};
use crate::cache::{CacheEntry, CacheError, CacheStore};
use crate::config::ClientConfig;

/// Cache key for top headlines, whatever country or category was asked for
const TOP_HEADLINES_KEY: &str = "top";

/// Path of the top-headlines endpoint
const TOP_HEADLINES_PATH: &str = "top-headlines";

/// Path of the search endpoint
const EVERYTHING_PATH: &str = "everything";

/// Errors that can occur when querying NewsAPI
#[derive(Debug, Error)]
pub enum NewsError {
    /// No API key was supplied
    #[error("No API key found, set the GNEWS_API_KEY environment variable")]
    MissingCredential,

    /// The key has used up its requests for the day
    #[error("API request quota exhausted for today")]
    QuotaExhausted,

    /// The key was rejected
    #[error("API key is invalid")]
    KeyInvalid,

    /// The server is rate limiting the key
    #[error("API key has been rate limited")]
    RateLimited,

    /// Any other failure reported by the API
    #[error("API request failed ({code}): {message}")]
    Api { code: String, message: String },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Top-level JSON structure of every NewsAPI response
#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

/// Client for NewsAPI top headlines and searches
///
/// The client owns its cache store. Queries take `&mut self` and return
/// slices borrowed from the store, so a result stays valid until the next
/// query. Call [`NewsClient::shutdown`] when done to persist the store.
#[derive(Debug)]
pub struct NewsClient {
    /// HTTP client for making requests
    http_client: Client,
    /// NewsAPI key
    api_key: String,
    /// Base URL for the API (allows override for testing)
    base_url: String,
    /// Snapshot file for the cache store
    cache_path: PathBuf,
    /// Cached query results
    store: CacheStore,
}

impl NewsClient {
    /// Creates a client, loading the cache snapshot if the config asks for it
    ///
    /// # Returns
    /// * `Ok(NewsClient)` ready to query
    /// * `Err(NewsError::MissingCredential)` if the API key is empty
    pub fn new(config: ClientConfig) -> Result<Self, NewsError> {
        let store = if config.load_cache {
            CacheStore::load(&config.cache_path)
        } else {
            CacheStore::new()
        };
        Self::with_store(config, store)
    }

    /// Creates a client around an existing cache store
    pub fn with_store(config: ClientConfig, store: CacheStore) -> Result<Self, NewsError> {
        if config.api_key.trim().is_empty() {
            return Err(NewsError::MissingCredential);
        }

        Ok(Self {
            http_client: Client::new(),
            api_key: config.api_key,
            base_url: config.base_url,
            cache_path: config.cache_path,
            store,
        })
    }

    /// The cache store backing this client
    pub fn cache(&self) -> &CacheStore {
        &self.store
    }

    /// Fetches top headlines for a country and category
    ///
    /// Results are cached under a single key, so a fresh entry is returned as
    /// is even when it was fetched for another country or category.
    ///
    /// # Arguments
    /// * `country` - 2-letter ISO 3166-1 country code
    /// * `category` - Headline category
    ///
    /// # Returns
    /// * `Ok(&[Article])` - Every headline the API returned
    /// * `Err(NewsError)` - If the request fails; the cache is left untouched
    pub async fn fetch_top_headlines(
        &mut self,
        country: &str,
        category: Category,
    ) -> Result<&[Article], NewsError> {
        let params = [("country", country), ("category", category.as_str())];
        self.cached_fetch(TOP_HEADLINES_KEY.to_string(), TOP_HEADLINES_PATH, &params)
            .await
    }

    /// Returns at most `max` of the default top headlines (US, general)
    pub async fn fetch_n_top(&mut self, max: usize) -> Result<&[Article], NewsError> {
        let articles = self
            .fetch_top_headlines(DEFAULT_COUNTRY, Category::General)
            .await?;
        Ok(truncate(articles, max))
    }

    /// Searches for `term` within one article field
    ///
    /// Each field and term pair is cached separately under the field name
    /// followed by the term.
    pub async fn search_by_field(
        &mut self,
        term: &str,
        field: SearchField,
    ) -> Result<&[Article], NewsError> {
        let key = format!("{}{}", field.as_str(), term);
        let params = [("q", term), ("searchIn", field.as_str())];
        self.cached_fetch(key, EVERYTHING_PATH, &params).await
    }

    /// Returns at most `max` articles whose title matches `term`
    pub async fn search_by_title(&mut self, term: &str, max: usize) -> Result<&[Article], NewsError> {
        let articles = self.search_by_field(term, SearchField::Title).await?;
        Ok(truncate(articles, max))
    }

    /// Returns at most `max` articles whose description matches `term`
    pub async fn search_for_article(
        &mut self,
        term: &str,
        max: usize,
    ) -> Result<&[Article], NewsError> {
        let articles = self.search_by_field(term, SearchField::Description).await?;
        Ok(truncate(articles, max))
    }

    /// Filters the default top headlines by author
    ///
    /// Goes through [`NewsClient::fetch_top_headlines`] and its cache entry.
    /// The returned iterator is lazy; clone it to walk the matches again.
    pub async fn search_by_author(&mut self, substring: &str) -> Result<AuthorMatches<'_>, NewsError> {
        let articles = self
            .fetch_top_headlines(DEFAULT_COUNTRY, Category::General)
            .await?;
        Ok(AuthorMatches::new(articles, substring))
    }

    /// Deletes the snapshot file (if any) and empties the in-memory store
    pub fn clear_cache(&mut self) -> Result<(), CacheError> {
        CacheStore::remove_snapshot(&self.cache_path)?;
        self.store.clear();
        Ok(())
    }

    /// Persists the cache store to the snapshot file
    ///
    /// Call this on every exit path, including after a failed query, so that
    /// results fetched earlier in the run are kept.
    pub fn shutdown(self) -> Result<(), CacheError> {
        self.store.save(&self.cache_path)
    }

    /// Returns the cached articles for `key`, calling the API first if the
    /// entry is missing or stale
    async fn cached_fetch(
        &mut self,
        key: String,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<&[Article], NewsError> {
        if self.store.is_fresh(&key, Utc::now()) {
            debug!(key = %key, "Cache hit");
        } else {
            debug!(key = %key, "Cache miss");
            let articles = self.request(path, params).await?;
            self.store.insert(key.clone(), CacheEntry::new(articles));
        }

        Ok(self
            .store
            .get(&key)
            .map(|entry| entry.articles.as_slice())
            .unwrap_or_default())
    }

    /// Calls an endpoint and unwraps the response envelope
    async fn request(&self, path: &str, params: &[(&str, &str)]) -> Result<Vec<Article>, NewsError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "Requesting NewsAPI");

        let response = self
            .http_client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        parse_envelope(status, &text)
    }
}

/// Checks the HTTP status and envelope status, returning the articles on success
fn parse_envelope(http_status: u16, body: &str) -> Result<Vec<Article>, NewsError> {
    let http_ok = (200..300).contains(&http_status);

    let envelope: Envelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if !http_ok => {
            error!(status = http_status, "NewsAPI returned a non-JSON error response");
            return Err(NewsError::Api {
                code: format!("http{}", http_status),
                message: "unexpected response body".to_string(),
            });
        }
        Err(e) => return Err(NewsError::Parse(e)),
    };

    if envelope.status != "ok" || !http_ok {
        return Err(api_failure(
            envelope.code.unwrap_or_default(),
            envelope.message.unwrap_or_default(),
        ));
    }

    Ok(envelope.articles)
}

/// Maps an API error code to its error kind and logs a diagnostic
fn api_failure(code: String, message: String) -> NewsError {
    match code.as_str() {
        "apiKeyExhausted" => {
            error!("You have exhausted the number of requests for today with this API key");
            NewsError::QuotaExhausted
        }
        "apiKeyInvalid" => {
            error!("The API key you supplied is invalid");
            NewsError::KeyInvalid
        }
        "rateLimited" => {
            error!("The server has rate limited this API key");
            NewsError::RateLimited
        }
        _ => {
            error!(code = %code, message = %message, "Failed to request to the API");
            NewsError::Api { code, message }
        }
    }
}

fn truncate(articles: &[Article], max: usize) -> &[Article] {
    &articles[..max.min(articles.len())]
}

/// Lazy view over the articles whose author contains a substring
///
/// Matching ignores case and skips articles without an author.
#[derive(Debug, Clone)]
pub struct AuthorMatches<'a> {
    articles: std::slice::Iter<'a, Article>,
    needle: String,
}

impl<'a> AuthorMatches<'a> {
    fn new(articles: &'a [Article], substring: &str) -> Self {
        Self {
            articles: articles.iter(),
            needle: substring.to_lowercase(),
        }
    }
}

impl<'a> Iterator for AuthorMatches<'a> {
    type Item = &'a Article;

    fn next(&mut self) -> Option<Self::Item> {
        let needle = &self.needle;
        self.articles.find(|article| article.author_contains(needle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.articles.size_hint().1)
    }
}
