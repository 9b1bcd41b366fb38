//! Error types for eightball.
//!
//! This module defines all error types used throughout the eightball crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::fmt;

use thiserror::Error;

/// The stage of a submission that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStage {
    /// Uploading the screenshot to the object store.
    Upload,
    /// Inserting the project row.
    Insert,
}

impl fmt::Display for SubmitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload => write!(f, "screenshot upload"),
            Self::Insert => write!(f, "project insert"),
        }
    }
}

/// The main error type for eightball operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Store Errors ===
    /// The HTTP request to the store could not be completed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("store returned {status}: {message}")]
    Store {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// Loading the project list failed.
    #[error("failed to load projects: {source}")]
    Fetch {
        /// The underlying error.
        #[source]
        source: Box<Error>,
    },

    /// The store holds no projects yet.
    #[error("no projects submitted yet")]
    EmptyResult,

    /// A submission failed part way.
    #[error("failed to submit project during {stage}: {source}")]
    Submit {
        /// Which step failed.
        stage: SubmitStage,
        /// The underlying error.
        #[source]
        source: Box<Error>,
    },

    /// A required submission field was blank.
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the field.
        field: &'static str,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Display Errors ===
    /// The platform opener could not be launched for a link.
    #[error("failed to open {url}: {source}")]
    LinkOpen {
        /// The link that was being opened.
        url: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for eightball operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Wrap an error as a failed project load.
    #[must_use]
    pub fn fetch(source: Error) -> Self {
        Self::Fetch {
            source: Box::new(source),
        }
    }

    /// Wrap an error as a failed submission step.
    #[must_use]
    pub fn submit(stage: SubmitStage, source: Error) -> Self {
        Self::Submit {
            stage,
            source: Box::new(source),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error means the store simply had nothing to show.
    #[must_use]
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::EmptyResult)
    }

    /// Check if this error is a failed project load.
    #[must_use]
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::EmptyResult;
        assert_eq!(err.to_string(), "no projects submitted yet");

        let err = Error::internal("test error");
        assert_eq!(err.to_string(), "internal error: test error");
    }

    #[test]
    fn test_fetch_wraps_source() {
        let err = Error::fetch(Error::Store {
            status: 503,
            message: "unavailable".to_string(),
        });
        assert!(err.is_fetch_error());
        let msg = err.to_string();
        assert!(msg.starts_with("failed to load projects"));
        assert!(msg.contains("503"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_is_empty_result() {
        assert!(Error::EmptyResult.is_empty_result());
        assert!(!Error::internal("x").is_empty_result());
        assert!(!Error::EmptyResult.is_fetch_error());
    }

    #[test]
    fn test_submit_error_names_stage() {
        let err = Error::submit(
            SubmitStage::Upload,
            Error::Store {
                status: 413,
                message: "payload too large".to_string(),
            },
        );
        let msg = err.to_string();
        assert!(msg.contains("screenshot upload"));
        assert!(msg.contains("payload too large"));

        let err = Error::submit(SubmitStage::Insert, Error::internal("boom"));
        assert!(err.to_string().contains("project insert"));
    }

    #[test]
    fn test_missing_field_display() {
        let err = Error::MissingField { field: "title" };
        assert_eq!(err.to_string(), "missing required field: title");
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::config_validation("invalid interval");
        assert!(err.to_string().contains("invalid interval"));
    }

    #[test]
    fn test_link_open_error_display() {
        let err = Error::LinkOpen {
            url: "https://example.com".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "xdg-open not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://example.com"));
        assert!(msg.contains("xdg-open not found"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }
}
