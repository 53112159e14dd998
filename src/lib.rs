//! Document ingestion gatekeeper
//!
//! Accepts untrusted bytes (downloaded or in-memory), checks their size and
//! true content type, stores them under a collision-free name in a scratch
//! directory, and lets callers inspect and purge that directory.

pub mod config;
pub mod error;
pub mod fetch;
pub mod ingestor;
pub mod storage;
pub mod utils;

pub use crate::config::IngestorConfig;
pub use crate::error::{IngestError, IngestErrorKind};
pub use crate::fetch::{Fetcher, HttpFetcher};
pub use crate::ingestor::DocumentIngestor;
pub use crate::storage::{PurgeResult, StorageResult, StorageStats};
pub use crate::utils::logging::{IngestLogger, setup_logging};
