//! Replicator request service binary.
//!
//! Loads the service settings, reads a JSON replicator request from a file or stdin,
//! maps and resolves it, and prints the secret-free configuration handed to the
//! replication engine. Rejected requests print an error report and exit non-zero.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::load_replicator_settings;
use crate::core::{read_request, run_replicator};
use crate::error::ReplicatorResult;

mod config;
mod core;
mod error;

/// Default log filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "replicator=info,replication_config=info";

#[derive(Debug, Parser)]
#[command(name = "replicator", version, about)]
struct AppArgs {
    /// Path to the JSON replicator request. Reads stdin when omitted.
    request: Option<PathBuf>,
}

fn main() -> ExitCode {
    init_tracing();

    let args = AppArgs::parse();
    match main_impl(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprint!("{}", err.render_report());
            ExitCode::FAILURE
        }
    }
}

/// Initializes structured logging with levels configurable through `RUST_LOG`.
///
/// Logs go to stderr so stdout only carries the resulting configuration.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main_impl(args: AppArgs) -> ReplicatorResult<()> {
    let settings = load_replicator_settings()?;
    info!(
        databases = settings.databases.len(),
        assets_dir = %settings.assets_dir.display(),
        "loaded replicator settings"
    );

    let request = read_request(args.request.as_deref())?;

    match run_replicator(&settings, &request)? {
        Some(summary) => println!("{}", serde_json::to_string_pretty(&summary)?),
        None => info!("nothing to replicate"),
    }

    Ok(())
}
