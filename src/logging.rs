//! Tracing subscriber setup

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt};

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Installs the global subscriber; call once near the start of `main`
///
/// `RUST_LOG` takes precedence over the configured filter. With a log file
/// configured, output is appended there without colours, leaving the
/// terminal to the terminal backend.
///
/// # Errors
/// Returns [`Error::Logging`] if the filter does not parse, the file cannot
/// be opened, or a global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| Error::Logging(format!("invalid filter '{}': {e}", config.filter)))?;

    let installed = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| Error::Logging(format!("cannot open {}: {e}", path.display())))?;
            let file_layer = fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_filter(filter);
            tracing_subscriber::registry().with(file_layer).try_init()
        }
        None => {
            let stderr_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(config.ansi)
                .with_filter(filter);
            tracing_subscriber::registry().with(stderr_layer).try_init()
        }
    };
    installed.map_err(|e| Error::Logging(e.to_string()))
}
