//! Logging setup for the command-line driver.
//!
//! Installs a global tracing subscriber writing to stderr. The filter is read
//! from `RUST_LOG` and defaults to `info`; per-node training progress is
//! logged at `debug` (`RUST_LOG=rusty_cart=debug`).

use std::sync::OnceLock;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "info";

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The `RUST_LOG` directive couldn't be parsed.
    #[error("Invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    /// Another global subscriber is already installed.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing_subscriber::util::TryInitError),
}

/// Initialize tracing with the filter from `RUST_LOG`, or `info`.
///
/// Subsequent calls are no-ops.
pub fn init() -> Result<(), LoggingError> {
    init_with_default(DEFAULT_FILTER)
}

/// Like [`init`], with an explicit fallback filter when `RUST_LOG` is unset.
pub fn init_with_default(default_filter: &str) -> Result<(), LoggingError> {
    if INITIALIZED.get().is_some() {
        return Ok(());
    }

    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives)?,
        _ => EnvFilter::try_new(default_filter)?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()?;

    let _ = INITIALIZED.set(());
    Ok(())
}
