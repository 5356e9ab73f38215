//! Command-line interface parsing for nfetch
//!
//! This module handles parsing of CLI arguments using clap: the global cache
//! flags and one subcommand per query. Running without a subcommand performs
//! the demo sequence.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::config::{ClientConfig, DEFAULT_CACHE_FILE};
use crate::data::{Category, DEFAULT_COUNTRY};

/// Number of search results shown when no limit is given
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified category name is not recognized
    #[error(
        "Invalid category: '{0}'. Valid categories: business, entertainment, general, health, science, sports, technology"
    )]
    InvalidCategory(String),
}

/// nfetch - Top headlines and news search from NewsAPI
#[derive(Parser, Debug)]
#[command(name = "nfetch")]
#[command(about = "Top headlines and news search from NewsAPI, cached for a day")]
#[command(version)]
pub struct Cli {
    /// Start with an empty cache instead of loading the cache file
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Cache file to load at startup and save on exit
    #[arg(long, global = true, value_name = "PATH", default_value = DEFAULT_CACHE_FILE)]
    pub cache_file: PathBuf,

    /// Query to run; without one, runs a short demo of every query
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Queries available from the command line
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Top headlines
    Top {
        /// Show at most this many headlines
        #[arg(long, value_name = "N")]
        limit: Option<usize>,

        /// 2-letter ISO 3166-1 country code
        #[arg(long, value_name = "CC", default_value = DEFAULT_COUNTRY)]
        country: String,

        /// business, entertainment, general, health, science, sports or technology
        #[arg(long, value_name = "CATEGORY", default_value = "general", value_parser = parse_category_arg)]
        category: Category,
    },

    /// Articles whose title matches a term
    Title {
        term: String,

        /// Show at most this many articles
        #[arg(long, value_name = "N", default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },

    /// Articles whose description matches a term
    Search {
        term: String,

        /// Show at most this many articles
        #[arg(long, value_name = "N", default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },

    /// Top headlines whose author contains a substring
    Author { substring: String },

    /// Delete the cache file and start over
    ClearCache,
}

/// Parses a category string argument into a Category enum.
///
/// # Arguments
/// * `s` - The category string from CLI
///
/// # Returns
/// * `Ok(Category)` if the string names a NewsAPI category
/// * `Err(CliError::InvalidCategory)` if it doesn't
pub fn parse_category_arg(s: &str) -> Result<Category, CliError> {
    Category::from_name(s).ok_or_else(|| CliError::InvalidCategory(s.to_string()))
}

impl Cli {
    /// Applies the cache flags to a client configuration
    pub fn configure(&self, config: ClientConfig) -> ClientConfig {
        config
            .with_cache_path(self.cache_file.clone())
            .with_load_cache(!self.no_cache)
    }
}
