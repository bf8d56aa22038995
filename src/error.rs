//! Error types for unflat library.

use std::io;
use thiserror::Error;

/// Result type alias for unflat operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during structure analysis.
///
/// Structural ambiguity is never an error: the analyzer resolves it with its
/// fallback policies. Only unusable input and bad configuration abort a run.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The extractor supplied no usable text for the whole document.
    #[error("Malformed input: {0}")]
    InputMalformed(String),

    /// A caller-supplied threshold or pattern set is malformed.
    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),

    /// Error decoding a block or options file.
    #[error("JSON error: {0}")]
    Json(String),

    /// Error during rendering (Markdown, HTML, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::ConfigurationInvalid(format!("invalid pattern: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InputMalformed("no text blocks".to_string());
        assert_eq!(err.to_string(), "Malformed input: no text blocks");

        let err = Error::ConfigurationInvalid("margin_top must be below 0.5".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: margin_top must be below 0.5"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_regex_error_is_configuration_error() {
        let regex_err = regex::Regex::new("(unclosed").unwrap_err();
        let err: Error = regex_err.into();
        assert!(matches!(err, Error::ConfigurationInvalid(_)));
    }
}
