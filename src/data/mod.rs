//! Core data models for nfetch
//!
//! This module contains the article record returned by NewsAPI along with the
//! small enumerations used to build queries (headline categories and the
//! fields a keyword search can be restricted to).

pub mod news;

pub use news::{AuthorMatches, NewsClient, NewsError};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Country used for top headlines when none is given
pub const DEFAULT_COUNTRY: &str = "us";

/// A single news article, passed through verbatim from the API
///
/// Only the fields the client inspects are typed. Everything else the API
/// sends (`source`, `url`, `urlToImage`, `publishedAt`, `content`, ...) is kept
/// in `extra` so that a cached article serializes back to the same record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Article author, often missing or a publication name
    #[serde(default)]
    pub author: Option<String>,
    /// Headline
    #[serde(default)]
    pub title: Option<String>,
    /// Short summary
    #[serde(default)]
    pub description: Option<String>,
    /// Remaining fields, preserved opaquely
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Article {
    /// Returns true when the author contains `needle`, ignoring case.
    ///
    /// Articles without an author (absent or empty) never match.
    pub fn author_contains(&self, needle: &str) -> bool {
        self.author
            .as_deref()
            .filter(|author| !author.is_empty())
            .is_some_and(|author| author.to_lowercase().contains(&needle.to_lowercase()))
    }
}

/// Top-headline categories accepted by NewsAPI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    Business,
    Entertainment,
    #[default]
    General,
    Health,
    Science,
    Sports,
    Technology,
}

impl Category {
    /// All categories, in the order NewsAPI documents them
    pub const ALL: [Category; 7] = [
        Category::Business,
        Category::Entertainment,
        Category::General,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Technology,
    ];

    /// The query-parameter value for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::General => "general",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }

    /// Parses a category name, case-insensitively
    pub fn from_name(s: &str) -> Option<Self> {
        let lowered = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == lowered)
    }
}

/// Article fields a keyword search can be restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Description,
}

impl SearchField {
    /// The `searchIn` value, also used as the cache key prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Description => "description",
        }
    }
}
