//! Launches CLI - Upcoming rocket launches, available offline
//!
//! Loads the next launches from the network, keeps them in a local cache and
//! serves the cached list while it is fresh when the network is unavailable.

use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use futures::channel::oneshot;
use tokio::runtime::Handle;
use tracing::{debug, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use launches::api::{ReqwestHttpClient, RemoteLaunchLoader};
use launches::cache::{
    CacheValidation, JsonFileStore, LaunchStore, LocalLaunchLoader, SqliteStore, StoreError,
    SystemClock,
};
use launches::cli::{AppConfig, Cli, Command, StoreKind};
use launches::data::{load_launches, LaunchItem};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
///
/// Logs go to stderr so launch output on stdout stays clean.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("launches=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("launches=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Opens the store selected in the configuration
fn open_store(config: &AppConfig) -> Result<Arc<dyn LaunchStore>, StoreError> {
    debug!(path = %config.cache_path.display(), store = ?config.store, "opening cache store");
    match config.store {
        StoreKind::Json => Ok(Arc::new(JsonFileStore::new(&config.cache_path)?)),
        StoreKind::Sqlite => Ok(Arc::new(SqliteStore::open(&config.cache_path)?)),
    }
}

/// Prints launches as a table, or as JSON when requested
fn print_launches(launches: &[LaunchItem], json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(launches)?);
        return Ok(());
    }

    if launches.is_empty() {
        println!("No launches available.");
        return Ok(());
    }

    for launch in launches {
        println!("{:>8}  {:<14}  {}", launch.id, launch.date, launch.name);
    }
    Ok(())
}

async fn run(command: &Command, config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let store = open_store(config)?;
    let local = LocalLaunchLoader::new(store, SystemClock).with_policy(config.policy);

    match command {
        Command::Fetch { json } => {
            let client = Arc::new(ReqwestHttpClient::new(Handle::current()));
            let remote = RemoteLaunchLoader::new(config.url.clone(), client);

            let launches = match load_launches(&remote).await {
                Ok(launches) => {
                    if let Err(error) = local.save_async(launches.clone()).await {
                        warn!(%error, "could not cache launches");
                    }
                    launches
                }
                Err(error) => {
                    warn!(%error, "could not load launches, using cache");
                    load_launches(&local).await?
                }
            };
            print_launches(&launches, *json)?;
        }
        Command::Show { json } => {
            let launches = load_launches(&local).await?;
            print_launches(&launches, *json)?;
        }
        Command::Validate => {
            let (tx, rx) = oneshot::channel();
            local.validate_cache_with(move |outcome| {
                let _ = tx.send(outcome);
            });

            let message = match rx.await? {
                CacheValidation::Empty => "Cache is empty.",
                CacheValidation::Fresh => "Cache is fresh.",
                CacheValidation::PrunedStale => "Deleted stale cache.",
                CacheValidation::PrunedUnreadable => "Deleted unreadable cache.",
            };
            println!("{}", message);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    debug!("launches starting with args: {:?}", cli);

    let config = match AppConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
