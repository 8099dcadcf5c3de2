//! Diagnostic logging
//!
//! `FINTRACK_LOG` wins over the `log_level` setting; either is an
//! `EnvFilter` directive such as `info` or `fintrack=debug`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{FintrackError, FintrackResult};

pub const LOG_ENV: &str = "FINTRACK_LOG";

/// Where diagnostics go
pub enum LogTarget<'a> {
    Stderr,
    /// Append to a file; used while the TUI owns the terminal
    File(&'a Path),
}

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber
///
/// A second call is a no-op, so tests and the TUI re-entry path may call it
/// freely.
pub fn init(default_level: &str, target: LogTarget<'_>) -> FintrackResult<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter(default_level))
        .with_target(false);

    let result = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    FintrackError::Io(format!("Failed to open log file {}: {}", path.display(), e))
                })?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}
