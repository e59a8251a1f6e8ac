//! Unified error hierarchy for whooprs
//!
//! Library code returns [`Result`]; the binary wraps these in `anyhow` at the
//! edges.

use std::path::PathBuf;
use thiserror::Error;

pub use crate::export::ExportError;

/// Top-level error type for all whooprs operations
#[derive(Debug, Error)]
pub enum WhoopError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed record data
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Configuration file and key errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Could not determine home directory")]
    NoHomeDir,
}

/// Result type alias for whooprs operations
pub type Result<T> = std::result::Result<T, WhoopError>;

impl WhoopError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            WhoopError::Validation(_) => ErrorSeverity::Warning,
            WhoopError::Config(ConfigError::UnknownKey(_))
            | WhoopError::Config(ConfigError::InvalidValue { .. }) => ErrorSeverity::Warning,
            WhoopError::Config(ConfigError::NoHomeDir) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            WhoopError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                "Could not find the data file. Check the --input path.".to_string()
            }
            WhoopError::Json(e) => {
                format!(
                    "Data file is not a valid record export (line {}, column {}).",
                    e.line(),
                    e.column()
                )
            }
            WhoopError::Config(ConfigError::UnknownKey(key)) => {
                format!("'{}' is not a known setting. Run `whooprs config --list`.", key)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Unrecoverable, nothing can run
    Critical,
    /// Error that prevents the operation
    Error,
    /// Warning that doesn't prevent operation
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical | ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = WhoopError::Validation("period must be 7, 14 or 30".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert_eq!(err.severity().to_tracing_level(), tracing::Level::WARN);

        let err = WhoopError::Config(ConfigError::NoHomeDir);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_user_messages() {
        let err = WhoopError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(err.user_message().contains("Could not find"));

        let err = WhoopError::Config(ConfigError::UnknownKey("settings.colour".to_string()));
        assert!(err.user_message().contains("settings.colour"));
    }

    #[test]
    fn test_json_error_reports_position() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{\n  \"sleep\": [").unwrap_err();
        let err = WhoopError::from(parse_err);
        assert!(err.user_message().contains("line 2"));
    }
}
