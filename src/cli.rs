//! Command-line interface parsing for the launches CLI
//!
//! This module handles parsing of CLI arguments using clap (with environment
//! variable fallbacks) and resolves them into the configuration the binary
//! runs with.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;
use url::Url;

use crate::cache::{default_cache_dir, CachePolicy, DEFAULT_MAX_CACHE_AGE_DAYS};

/// Endpoint listing the next five launches
pub const DEFAULT_LAUNCHES_URL: &str = "https://fdo.rocketlaunch.live/json/launches/next/5";

/// Error types for CLI argument resolution
#[derive(Debug, Error)]
pub enum CliError {
    /// The launch endpoint is not a valid absolute URL
    #[error("Invalid URL '{0}': {1}")]
    InvalidUrl(String, url::ParseError),

    /// The freshness window must be at least one day
    #[error("Invalid max age: cached launches must stay fresh for at least 1 day")]
    InvalidMaxAge,

    /// No cache path was given and no default location exists
    #[error("Could not determine a cache directory; pass --cache-path")]
    NoCacheDirectory,
}

/// Which store backs the local cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// A single JSON file
    #[default]
    Json,
    /// A SQLite database
    Sqlite,
}

impl StoreKind {
    /// File name used inside the default cache directory
    pub fn default_file_name(self) -> &'static str {
        match self {
            StoreKind::Json => "launches.json",
            StoreKind::Sqlite => "launches.sqlite",
        }
    }
}

/// Launches CLI - Upcoming rocket launches, available offline
#[derive(Parser, Debug)]
#[command(name = "launches")]
#[command(about = "Upcoming rocket launches with an offline cache")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Endpoint to load launches from
    #[arg(long, global = true, env = "LAUNCHES_URL", default_value = DEFAULT_LAUNCHES_URL)]
    pub url: String,

    /// Store used for the local cache
    #[arg(long, global = true, env = "LAUNCHES_STORE", value_enum, default_value_t = StoreKind::Json)]
    pub store: StoreKind,

    /// Cache file location (default: XDG cache directory)
    #[arg(long, global = true, env = "LAUNCHES_CACHE_PATH", value_name = "PATH")]
    pub cache_path: Option<PathBuf>,

    /// Days cached launches stay fresh
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_CACHE_AGE_DAYS)]
    pub max_age_days: u64,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Load launches from the network and refresh the cache
    ///
    /// Falls back to the cached launches when the network load fails.
    Fetch {
        /// Print launches as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show cached launches without touching the network
    Show {
        /// Print launches as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete the cache if it is stale or unreadable
    Validate,
}

/// Configuration resolved from CLI arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub url: Url,
    pub store: StoreKind,
    pub cache_path: PathBuf,
    pub policy: CachePolicy,
}

impl AppConfig {
    /// Creates an AppConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(AppConfig)` with every default filled in
    /// * `Err(CliError)` if the URL or max age is invalid, or no cache
    ///   location can be determined
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let url = Url::parse(&cli.url).map_err(|e| CliError::InvalidUrl(cli.url.clone(), e))?;

        if cli.max_age_days == 0 {
            return Err(CliError::InvalidMaxAge);
        }

        let cache_path = match &cli.cache_path {
            Some(path) => path.clone(),
            None => default_cache_dir()
                .ok_or(CliError::NoCacheDirectory)?
                .join(cli.store.default_file_name()),
        };

        Ok(AppConfig {
            url,
            store: cli.store,
            cache_path,
            policy: CachePolicy::new(cli.max_age_days),
        })
    }
}
