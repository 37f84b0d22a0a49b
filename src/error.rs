//! Error types and handling.

use thiserror::Error;

use crate::scan::FlowError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Warehouse API answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Data parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Scan flow rejected an operation
    #[error(transparent)]
    Flow(#[from] FlowError),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create a parse error with message
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a config error with message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API error from a status code and response body
    pub fn api(status: u16, msg: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FlowStep;

    #[test]
    fn test_api_error_display() {
        let err = AppError::api(503, "bin registry offline");
        assert_eq!(err.to_string(), "API error (503): bin registry offline");
    }

    #[test]
    fn test_flow_error_is_transparent() {
        let err: AppError = FlowError::WrongStep {
            operation: "confirm",
            step: FlowStep::Asset,
        }
        .into();
        assert!(matches!(err, AppError::Flow(FlowError::WrongStep { .. })));
        assert_eq!(
            err.to_string(),
            FlowError::WrongStep {
                operation: "confirm",
                step: FlowStep::Asset
            }
            .to_string()
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml").into();
        assert!(err.to_string().starts_with("IO error:"));
    }
}
