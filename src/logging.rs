//! Tracing setup.
//!
//! `serve` logs JSON lines to a daily-rotated file under `logging.logs_dir`
//! and plain text to stderr ([`init_production`]). `classify` only writes to
//! stderr ([`init_cli`]). `RUST_LOG` overrides `logging.level` in both modes.

use std::path::Path;

use anyhow::Context;
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// File name prefix for the rotated server log; the appender adds the date.
pub const LOG_FILE_PREFIX: &str = "mindful.log";

/// Keeps the background log writer alive. Dropping it flushes the file.
pub struct LoggingGuard {
    _flush: WorkerGuard,
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the server subscriber: JSON to `{logs_dir}/mindful.log.YYYY-MM-DD`
/// plus human-readable stderr.
///
/// # Errors
///
/// Fails if `logs_dir` cannot be created or a global subscriber is already
/// installed.
pub fn init_production(logs_dir: &Path, default_level: &str) -> anyhow::Result<LoggingGuard> {
    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("failed to create logs directory {}", logs_dir.display()))?;

    let (file_writer, flush) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX));

    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(tracing_subscriber::fmt::layer().json().with_writer(file_writer))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(LoggingGuard { _flush: flush })
}

/// Install a stderr-only subscriber for one-shot subcommands.
///
/// Returns `false` when a subscriber was already installed; the existing one
/// stays in place.
pub fn init_cli(default_level: &str) -> bool {
    match tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(std::io::stderr)
        .try_init()
    {
        Ok(()) => true,
        Err(e) => {
            debug!(error = %e, "tracing subscriber already installed");
            false
        }
    }
}
