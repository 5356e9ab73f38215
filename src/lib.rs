//! nfetch library
//!
//! A NewsAPI client with a one-day query cache, plus the CLI parsing used by
//! the `nfetch` binary. Exposed as a library for integration tests.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
