//! Cache store and snapshot persistence
//!
//! Provides a `CacheStore` mapping query keys to the articles returned for
//! them, and the JSON snapshot format used to carry it across runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::data::Article;

/// Format version written into every snapshot file
pub const SNAPSHOT_VERSION: u32 = 1;

/// Number of whole elapsed days after which an entry is stale
pub const FRESHNESS_WINDOW_DAYS: i64 = 1;

/// Errors that can occur when persisting the cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// Reading, writing or deleting the snapshot file failed
    #[error("Cache file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The store could not be serialized
    #[error("Failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result of a single query, stamped with the time it was fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// When the query was answered by the API
    pub queried_at: DateTime<Utc>,
    /// Articles returned, in API order
    pub articles: Vec<Article>,
}

impl CacheEntry {
    /// Creates an entry stamped with the current time
    pub fn new(articles: Vec<Article>) -> Self {
        Self {
            queried_at: Utc::now(),
            articles,
        }
    }

    /// Whether the entry is still fresh at `now`
    ///
    /// The age is truncated to whole days, so anything younger than 24 hours
    /// is fresh. An entry stamped in the future (clock skew) also counts as
    /// fresh.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        (now - self.queried_at).num_days() < FRESHNESS_WINDOW_DAYS
    }
}

/// On-disk layout, borrowed for writing
#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    entries: &'a HashMap<String, CacheEntry>,
}

/// On-disk layout, owned for reading
#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

/// Query results keyed by cache key
///
/// Keys are `"top"` for top headlines and the search field name followed by
/// the search term for keyword searches (`"titleAI"`). The store holds at most
/// one entry per key and never evicts on its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
}

impl CacheStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a store from a snapshot file
    ///
    /// A missing file yields an empty store. So does a file that cannot be
    /// read, cannot be parsed, or was written with a different format
    /// version; those cases are logged and otherwise ignored, since the cache
    /// only saves network calls.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No cache file, starting empty");
                return Self::new();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read cache file, starting empty");
                return Self::new();
            }
        };

        let snapshot: Snapshot = match serde_json::from_str(&content) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not parse cache file, starting empty");
                return Self::new();
            }
        };

        if snapshot.version != SNAPSHOT_VERSION {
            warn!(
                path = %path.display(),
                found = snapshot.version,
                expected = SNAPSHOT_VERSION,
                "Cache file has an unsupported version, starting empty"
            );
            return Self::new();
        }

        info!(path = %path.display(), entries = snapshot.entries.len(), "Loaded cache");
        Self {
            entries: snapshot.entries,
        }
    }

    /// Writes the whole store to a snapshot file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let snapshot = SnapshotRef {
            version: SNAPSHOT_VERSION,
            entries: &self.entries,
        };
        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(path, json)?;

        info!(path = %path.display(), entries = self.entries.len(), "Saved cache");
        Ok(())
    }

    /// Deletes a snapshot file; an absent file is not an error
    pub fn remove_snapshot(path: &Path) -> Result<(), CacheError> {
        match fs::remove_file(path) {
            Ok(()) => {
                info!(path = %path.display(), "Removed cache file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Returns the entry for `key`, fresh or not
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Returns true when `key` has an entry that is fresh at `now`
    pub fn is_fresh(&self, key: &str, now: DateTime<Utc>) -> bool {
        self.entries.get(key).is_some_and(|entry| entry.is_fresh_at(now))
    }

    /// Stores `entry` under `key`, returning the entry it replaced
    pub fn insert(&mut self, key: impl Into<String>, entry: CacheEntry) -> Option<CacheEntry> {
        self.entries.insert(key.into(), entry)
    }

    /// Cache keys currently held, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
