//! Storage result types
//!
//! Defines result structures returned by storage operations.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::BYTES_PER_MB;
use crate::error::{IngestError, IngestErrorKind};

/// Outcome of an ingest operation.
///
/// Either both `stored_path` and `stored_name` are set, or `error_message`
/// is; the constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageResult {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    stored_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stored_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<IngestErrorKind>,
}

impl StorageResult {
    pub fn stored(stored_path: PathBuf, stored_name: String) -> Self {
        Self {
            success: true,
            stored_path: Some(stored_path),
            stored_name: Some(stored_name),
            error_message: None,
            error_kind: None,
        }
    }

    pub fn failed(error: &IngestError) -> Self {
        Self {
            success: false,
            stored_path: None,
            stored_name: None,
            error_message: Some(error.to_string()),
            error_kind: Some(error.kind()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn stored_path(&self) -> Option<&Path> {
        self.stored_path.as_deref()
    }

    pub fn stored_name(&self) -> Option<&str> {
        self.stored_name.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn error_kind(&self) -> Option<IngestErrorKind> {
        self.error_kind
    }
}

/// Inventory of the scratch directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StorageStats {
    #[serde(rename = "fileCount")]
    pub file_count: u64,
    #[serde(rename = "totalSizeMB")]
    pub total_size_mb: f64,
}

impl StorageStats {
    pub fn from_bytes(file_count: u64, total_bytes: u64) -> Self {
        Self {
            file_count,
            total_size_mb: total_bytes as f64 / BYTES_PER_MB as f64,
        }
    }
}

/// Result of a retention purge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeResult {
    pub files_removed: u64,
    pub bytes_freed: u64,
}
