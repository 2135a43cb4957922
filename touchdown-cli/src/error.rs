//! CLI error types.

use thiserror::Error;
use touchdown::logging::LoggingError;
use touchdown::settings::SettingsError;
use touchdown::trace::TraceError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_error_display() {
        let err = CliError::Render("invalid image size 0x0".to_string());
        assert_eq!(err.to_string(), "Render error: invalid image size 0x0");

        let err = CliError::Config("empty trace".to_string());
        assert_eq!(err.to_string(), "Configuration error: empty trace");
    }

    #[test]
    fn test_trace_error_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = CliError::from(TraceError::from(io));
        assert_eq!(err.to_string(), "I/O error: gone");
    }
}
