//! Cache module for query results
//!
//! This module provides the in-memory cache store the news client consults
//! before every request, plus a JSON snapshot of the whole store that is read
//! once at startup and written once at shutdown. Entries carry the time they
//! were queried and go stale after one day; stale entries stay in the store
//! until a fresh query overwrites them.

mod store;

pub use store::{CacheEntry, CacheError, CacheStore, FRESHNESS_WINDOW_DAYS, SNAPSHOT_VERSION};
