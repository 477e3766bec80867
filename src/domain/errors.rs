//! Domain error types
//!
//! This module defines the error hierarchy for the tagger. All errors are
//! domain-specific and don't expose third-party types.

use std::path::PathBuf;
use thiserror::Error;

/// Main tagger error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum TaggerError {
    /// Configuration-related errors, including invalid image paths
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Qualtrics API errors
    #[error("Qualtrics error: {0}")]
    Qualtrics(#[from] QualtricsError),

    /// Embedded data codec misuse
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// The remote export job reported a terminal failure
    #[error("Report could not be exported: {reason}")]
    ExportFailed {
        /// Export job that failed
        export_id: String,
        /// Reason reported by the service
        reason: String,
    },

    /// Waiting for an export was cancelled by the caller
    #[error("Export wait cancelled: {0}")]
    Cancelled(String),

    /// Waiting for an export exceeded the configured deadline
    #[error("Export wait timed out after {waited_ms} ms: {export_id}")]
    Timeout {
        /// Export job being waited on
        export_id: String,
        /// Elapsed time in milliseconds
        waited_ms: u128,
    },

    /// Response archive errors
    #[error("Archive error: {0}")]
    Archive(String),

    /// Image processing errors
    #[error("Image error: {0}")]
    Image(String),

    /// Survey template errors
    #[error("Template error: {0}")]
    Template(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Qualtrics-specific errors
///
/// Errors that occur when interacting with the Qualtrics REST API.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum QualtricsError {
    /// Failed to reach the Qualtrics server
    #[error("Failed to connect to Qualtrics: {0}")]
    ConnectionFailed(String),

    /// API token rejected or lacking permissions
    #[error("Authentication failed: {status} - {message}")]
    AuthenticationFailed { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Streaming the export archive failed part-way
    #[error("Download failed: {0}")]
    DownloadFailed(String),
}

impl QualtricsError {
    /// Classify a non-success HTTP status with its response body
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => QualtricsError::AuthenticationFailed { status, message },
            400..=499 => QualtricsError::ClientError { status, message },
            _ => QualtricsError::ServerError { status, message },
        }
    }
}

/// Errors raised by the embedded data field codec
///
/// A `MissingPrefix` error means a field name that was never produced by the
/// encoder was handed to the decoder; callers should filter with
/// [`crate::domain::embedded::is_annotation_field`] first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Token does not start with the annotation prefix
    #[error("embedded data field '{0}' does not start with 'anno_'")]
    MissingPrefix(String),

    /// Path contains the reserved `|` separator
    #[error("{}: image paths cannot contain the pipe symbol (|)", .0.display())]
    ReservedSeparator(PathBuf),

    /// Path is absolute or escapes its root
    #[error("{}: image path must be relative to the images directory", .0.display())]
    NotRelative(PathBuf),

    /// Path segment is not valid UTF-8
    #[error("{}: image path is not valid UTF-8", .0.display())]
    NonUtf8(PathBuf),

    /// Path or token has no segments
    #[error("image path is empty")]
    EmptyPath,

    /// Token contains an empty segment
    #[error("embedded data field '{0}' contains an empty path segment")]
    EmptySegment(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for TaggerError {
    fn from(err: std::io::Error) -> Self {
        TaggerError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for TaggerError {
    fn from(err: serde_json::Error) -> Self {
        TaggerError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for TaggerError {
    fn from(err: toml::de::Error) -> Self {
        TaggerError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<zip::result::ZipError> for TaggerError {
    fn from(err: zip::result::ZipError) -> Self {
        TaggerError::Archive(err.to_string())
    }
}
