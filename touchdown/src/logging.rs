//! Tracing subscriber setup.
//!
//! Everything in the crate logs through `tracing`. Hosts call
//! [`init_logging`] once at startup; the returned guard must be kept alive
//! for the lifetime of the process so buffered log lines are flushed.
//!
//! The filter defaults to the configured level and can be overridden with
//! `RUST_LOG` (e.g. `RUST_LOG=touchdown::flight_history=trace`).

use std::path::{Path, PathBuf};

use thiserror::Error;
use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

use crate::settings::DEFAULT_LOG_LEVEL;

/// Log file name inside the log directory.
pub const LOG_FILE_NAME: &str = "touchdown.log";

/// Errors setting up logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid log filter '{filter}': {source}")]
    Filter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("Failed to install log subscriber: {0}")]
    Install(#[from] TryInitError),
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Directory the log file is written to.
    pub log_dir: PathBuf,
    /// Log file name.
    pub file_name: String,
    /// Filter used when `RUST_LOG` is unset.
    pub default_level: String,
    /// Also log to stderr.
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            file_name: LOG_FILE_NAME.to_string(),
            default_level: DEFAULT_LOG_LEVEL.to_string(),
            stderr: false,
        }
    }
}

impl LoggingConfig {
    /// Path of the log file.
    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join(&self.file_name)
    }
}

/// `<local data dir>/touchdown/logs`, or `./logs` when the platform has no
/// data directory.
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("touchdown").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Keeps the background log writer alive.
///
/// Dropping it flushes pending lines.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _writer: WorkerGuard,
    log_path: PathBuf,
}

impl LoggingGuard {
    /// Path of the log file.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

impl std::fmt::Debug for LoggingGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingGuard")
            .field("log_path", &self.log_path)
            .finish_non_exhaustive()
    }
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Fails if the log directory cannot be created, the filter does not
/// parse, or a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, LoggingError> {
    std::fs::create_dir_all(&config.log_dir).map_err(|source| LoggingError::CreateDir {
        path: config.log_dir.clone(),
        source,
    })?;

    let filter = build_filter(&config.default_level)?;

    let appender = tracing_appender::rolling::never(&config.log_dir, &config.file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let timer = LocalTime::new(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
    ));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_timer(timer.clone());

    let stderr_layer = config.stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_timer(timer)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;

    tracing::info!(
        version = crate::VERSION,
        log_path = %config.log_path().display(),
        "Logging initialised"
    );

    Ok(LoggingGuard {
        _writer: guard,
        log_path: config.log_path(),
    })
}

/// `RUST_LOG` if set, otherwise `default_level`.
fn build_filter(default_level: &str) -> Result<EnvFilter, LoggingError> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default_level.to_string());

    EnvFilter::try_new(&directives).map_err(|source| LoggingError::Filter {
        filter: directives,
        source,
    })
}
