//! # AgroPOS Till
//!
//! The counter application: restores a [`Register`](state::Register) from
//! the store, runs one command, and exits.
//!
//! ## Module Organization
//! ```text
//! agro_till/
//! ├── lib.rs          ◄─── You are here (logging setup & run)
//! ├── cli.rs          ◄─── clap definitions, output rendering
//! ├── state/
//! │   ├── config.rs   ◄─── AppConfig
//! │   └── session.rs  ◄─── Register session
//! ├── commands/
//! │   ├── menu.rs     ◄─── Menu listing
//! │   ├── cart.rs     ◄─── Cart manipulation
//! │   ├── sale.rs     ◄─── Checkout, bills, reprint
//! │   ├── summary.rs  ◄─── Summary and full view
//! │   └── config.rs   ◄─── Config and restore status
//! ├── print.rs        ◄─── Print surfaces
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod print;
pub mod state;

use std::io;
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use error::ApiError;
use state::{AppConfig, Register};

/// Runs the till.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Parse Command Line ───────────────────────────────────────────────► │
/// │                                                                         │
/// │  2. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, to stderr                     │
/// │     • Default: info,agro=debug,sqlx=warn; override with RUST_LOG        │
/// │                                                                         │
/// │  3. Load Configuration ───────────────────────────────────────────────► │
/// │     • Defaults → AGRO_* env → command line flags                        │
/// │                                                                         │
/// │  4. Open Store ───────────────────────────────────────────────────────► │
/// │     • SQLite with WAL mode, pending migrations applied                  │
/// │     • or in-memory with --memory                                        │
/// │                                                                         │
/// │  5. Restore Register, Run Command ────────────────────────────────────► │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    init_tracing();

    info!("Starting AgroPOS till");

    match run_cli(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(code = ?err.code, "{}", err.message);
            if cli.json {
                match serde_json::to_string(&err) {
                    Ok(json) => eprintln!("{}", json),
                    Err(_) => eprintln!("{}", err),
                }
            } else {
                eprintln!("{}", err);
            }
            ExitCode::from(err.code.exit_status())
        }
    }
}

fn run_cli(cli: &Cli) -> Result<(), ApiError> {
    let config = cli.apply_to(AppConfig::from_env());
    let store = cli::open_store(cli, &config)?;
    let mut register = Register::open(store, &config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    cli::execute(
        &cli.command,
        &mut register,
        &config,
        cli.json,
        Local::now(),
        &mut out,
    )
}

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,agro=debug,sqlx=warn";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=agro=trace` - Show trace for agro crates only
/// - Default: `info,agro=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    log_subscriber(filter).init();
}

/// Formatting subscriber gated by `filter`.
///
/// Logs go to stderr so command output on stdout stays clean.
fn log_subscriber(filter: EnvFilter) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_default_filter_levels() {
        let subscriber = log_subscriber(EnvFilter::new(DEFAULT_LOG_FILTER));

        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(target: "agro_till::cli", Level::DEBUG));
            assert!(!tracing::enabled!(target: "agro_till::cli", Level::TRACE));
            assert!(tracing::enabled!(target: "sqlx::query", Level::WARN));
            assert!(!tracing::enabled!(target: "sqlx::query", Level::INFO));
            assert!(tracing::enabled!(target: "hyper", Level::INFO));
            assert!(!tracing::enabled!(target: "hyper", Level::DEBUG));
        });
    }
}
