//! Tracing subscriber setup.
//!
//! The TUI owns the terminal, so interactive runs log to a file under
//! `$RATEDESK_HOME/logs`. One-shot CLI commands log to stderr.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LogConfig;

/// Environment variable holding an `EnvFilter` directive string.
pub const LOG_ENV: &str = "RATEDESK_LOG";

const LOG_FILE_NAME: &str = "ratedesk.log";

/// Builds the filter: `RATEDESK_LOG` wins over the configured level.
pub fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Installs a stderr subscriber for one-shot commands.
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init_stderr(config: &LogConfig) -> Result<()> {
    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init()
        .context("install stderr logger")
}

/// Installs a file subscriber writing to `<dir>/ratedesk.log`.
///
/// Returns `None` when file logging is disabled. Keep the guard alive for the
/// whole session; dropping it flushes pending lines.
///
/// # Errors
/// Returns an error if the directory cannot be created or a subscriber is
/// already installed.
pub fn init_file(config: &LogConfig, dir: &Path) -> Result<Option<WorkerGuard>> {
    if !config.file {
        return Ok(None);
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .context("install file logger")?;

    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_init_file_disabled_creates_nothing() {
        let dir = tempdir().unwrap();
        let logs = dir.path().join("logs");
        let config = LogConfig {
            level: "debug".to_string(),
            file: false,
        };

        let guard = init_file(&config, &logs).unwrap();

        assert!(guard.is_none());
        assert!(!logs.exists());
    }

    #[test]
    fn test_build_filter_accepts_configured_level() {
        let config = LogConfig {
            level: "warn".to_string(),
            file: true,
        };
        let filter = build_filter(&config);
        assert!(!filter.to_string().is_empty());
    }
}
