//! Error types
//!
//! Defines the categorized failures an ingest, delete or purge can produce.

use serde::Serialize;
use std::fmt;
use std::io;

/// Ingestion errors
#[derive(Debug)]
pub enum IngestError {
    /// Payload larger than the configured cap
    SizeExceeded { size: u64, max: u64 },
    /// Resolved extension not in the accepted set
    UnsupportedFormat(String),
    /// Remote call exceeded its timeout; carries the redacted origin only
    FetchTimeout(String),
    /// Any other transport failure (DNS, reset, non-2xx)
    FetchFailed(String),
    /// Local filesystem failure
    Io(io::Error),
    /// Rejected at construction time
    InvalidConfig(String),
}

impl IngestError {
    pub fn kind(&self) -> IngestErrorKind {
        match self {
            IngestError::SizeExceeded { .. } => IngestErrorKind::SizeExceeded,
            IngestError::UnsupportedFormat(_) => IngestErrorKind::UnsupportedFormat,
            IngestError::FetchTimeout(_) => IngestErrorKind::FetchTimeout,
            IngestError::FetchFailed(_) => IngestErrorKind::FetchFailed,
            IngestError::Io(_) => IngestErrorKind::IoFailure,
            IngestError::InvalidConfig(_) => IngestErrorKind::InvalidConfig,
        }
    }
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::SizeExceeded { size, max } => write!(
                f,
                "File exceeds maximum size: {} bytes > {} bytes",
                size, max
            ),
            IngestError::UnsupportedFormat(ext) => {
                if ext.is_empty() {
                    write!(f, "Unsupported format: no recognizable file type")
                } else {
                    write!(f, "Unsupported format: .{}", ext)
                }
            }
            IngestError::FetchTimeout(origin) => write!(f, "Download timed out: {}", origin),
            IngestError::FetchFailed(reason) => write!(f, "Download failed: {}", reason),
            IngestError::Io(e) => write!(f, "I/O error: {}", e),
            IngestError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for IngestError {
    fn from(error: io::Error) -> Self {
        IngestError::Io(error)
    }
}

impl From<config::ConfigError> for IngestError {
    fn from(error: config::ConfigError) -> Self {
        IngestError::InvalidConfig(error.to_string())
    }
}

/// Error category carried by a failed `StorageResult`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IngestErrorKind {
    SizeExceeded,
    UnsupportedFormat,
    FetchTimeout,
    FetchFailed,
    IoFailure,
    InvalidConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_identify_category() {
        let size = IngestError::SizeExceeded { size: 11, max: 10 };
        assert!(size.to_string().contains("maximum size"));
        assert_eq!(size.kind(), IngestErrorKind::SizeExceeded);

        let format = IngestError::UnsupportedFormat("exe".into());
        assert_eq!(format.to_string(), "Unsupported format: .exe");

        let unknown = IngestError::UnsupportedFormat(String::new());
        assert!(unknown.to_string().starts_with("Unsupported format"));

        let timeout = IngestError::FetchTimeout("http://host".into());
        assert!(timeout.to_string().contains("timed out"));
        assert!(!timeout.to_string().contains("Download failed"));

        let failed = IngestError::FetchFailed("HTTP 404".into());
        assert!(failed.to_string().starts_with("Download failed"));
    }

    #[test]
    fn test_io_error_conversion() {
        let err: IngestError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(err.kind(), IngestErrorKind::IoFailure);
        assert!(err.to_string().starts_with("I/O error"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
