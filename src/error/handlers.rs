//! Error handlers
//!
//! Converts errors into `StorageResult`s at the public boundary.

use crate::error::types::IngestError;
use crate::storage::results::StorageResult;
use crate::utils::logging::IngestLogger;

/// Log an ingestion error at a level matching its category
pub fn handle_error(logger: &IngestLogger, context: &str, err: &IngestError) {
    match err {
        IngestError::Io(_) | IngestError::InvalidConfig(_) => {
            logger.error(format_args!("{context}: {err}"))
        }
        _ => logger.warn(format_args!("{context} rejected: {err}")),
    }
}

/// Log the error and turn it into a failed result
pub fn into_storage_result(logger: &IngestLogger, context: &str, err: IngestError) -> StorageResult {
    handle_error(logger, context, &err);
    StorageResult::failed(&err)
}
