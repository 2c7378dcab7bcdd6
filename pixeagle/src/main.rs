//! PixEagle vision-tracking/autopilot-following runtime entrypoint.
//!
//! Loads configuration, spawns the Capture/Inference/Control/Transport
//! tasks via [`pixeagle_core::spawn`], and waits for either a shutdown
//! signal or a `SystemRestart`-tier config reload, mapping the outcome to
//! one of the three documented process exit codes.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use pixeagle_common::health::{EXIT_OK, EXIT_RESTART_REQUESTED};
use pixeagle_config::store::ConfigStore;
use pixeagle_core::ConfigHandle;

/// PixEagle - vision-based target tracking and autopilot following
#[derive(Parser, Debug)]
#[command(name = "pixeagle")]
#[command(version)]
#[command(about = "Vision-tracking and autopilot-following control loop")]
struct Args {
    /// Path to a TOML config override file. Missing or omitted falls back
    /// to compiled-in defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose (DEBUG) logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn setup_tracing(args: &Args) {
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn load_config(args: &Args) -> Result<ConfigStore, pixeagle_config::error::ConfigError> {
    match &args.config {
        Some(path) => ConfigStore::load(path),
        None => ConfigStore::load_from_str(""),
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("PixEagle v{} starting", env!("CARGO_PKG_VERSION"));

    let store = match load_config(&args) {
        Ok(store) => store,
        Err(err) => {
            error!("failed to load configuration: {err}");
            std::process::exit(1);
        }
    };

    let config = ConfigHandle::new(store);

    let runtime = match pixeagle_core::spawn(config).await {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("failed to start control pipeline: {err}");
            std::process::exit(1);
        }
    };

    let restart_requested = tokio::select! {
        result = tokio::task::spawn_blocking(move || runtime.join_control()) => {
            result.unwrap_or(false)
        }
        _ = tokio::signal::ctrl_c() => {
            info!("received shutdown signal, exiting");
            false
        }
    };

    if restart_requested {
        info!("exiting for system-tier config reload");
        std::process::exit(EXIT_RESTART_REQUESTED);
    }

    info!("PixEagle shutdown complete");
    std::process::exit(EXIT_OK);
}
