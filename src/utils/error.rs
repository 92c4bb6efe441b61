//! Error types for Lectio
//!
//! This module defines the crate-level error type used throughout the
//! library. We use thiserror for convenient error type definitions and
//! anyhow for application-level error handling in the binary.
//!
//! Media playback failures reported by the playable-media handle are a
//! separate taxonomy (see [`crate::media::MediaError`]); they describe the
//! session's `Error` state rather than a failed function call.

use thiserror::Error;

/// Main error type for Lectio
#[derive(Error, Debug)]
pub enum LectioError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Canon catalog errors (malformed or inconsistent book data)
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File I/O errors
    #[error("File error: {0}")]
    FileIO(#[from] std::io::Error),
}

impl From<serde_json::Error> for LectioError {
    fn from(err: serde_json::Error) -> Self {
        LectioError::Catalog(format!("JSON error: {}", err))
    }
}

/// Convenience type alias for Results in Lectio
pub type Result<T> = std::result::Result<T, LectioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LectioError::Config("unknown log level".to_string());
        assert_eq!(err.to_string(), "Configuration error: unknown log level");

        let err = LectioError::Catalog("duplicate book name".to_string());
        assert_eq!(err.to_string(), "Catalog error: duplicate book name");
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: LectioError = io_err.into();
        assert!(matches!(err, LectioError::FileIO(_)));

        let json_err = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        let err: LectioError = json_err.into();
        assert!(matches!(err, LectioError::Catalog(_)));
    }
}
