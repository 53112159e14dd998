//! Document ingestor
//!
//! Public entry point: validates untrusted bytes, names them, persists them in
//! the scratch directory, and exposes inspection and purge of that directory.

use std::path::Path;
use std::sync::Arc;

use crate::config::IngestorConfig;
use crate::error::IngestError;
use crate::error::handlers::into_storage_result;
use crate::fetch::{Fetcher, HttpFetcher, extension_hint, redact_url};
use crate::storage::filesystem;
use crate::storage::naming::generate_stored_name;
use crate::storage::results::{PurgeResult, StorageResult, StorageStats};
use crate::storage::validation::validate_payload;
use crate::utils::logging::IngestLogger;

pub struct DocumentIngestor {
    config: IngestorConfig,
    fetcher: Arc<dyn Fetcher>,
    logger: IngestLogger,
}

impl DocumentIngestor {
    /// Build an ingestor that logs through the global `log` backend.
    ///
    /// The scratch directory exists once this returns.
    pub async fn new(config: IngestorConfig) -> Result<Self, IngestError> {
        Self::with_logger(config, IngestLogger::global()).await
    }

    /// Build an ingestor with an injected logger and the default HTTP fetcher
    pub async fn with_logger(
        config: IngestorConfig,
        logger: IngestLogger,
    ) -> Result<Self, IngestError> {
        let fetcher = HttpFetcher::new(config.fetch_timeout(), config.max_file_size_bytes)?;
        Self::with_fetcher(config, Arc::new(fetcher), logger).await
    }

    /// Build an ingestor with a custom fetch transport
    pub async fn with_fetcher(
        config: IngestorConfig,
        fetcher: Arc<dyn Fetcher>,
        logger: IngestLogger,
    ) -> Result<Self, IngestError> {
        let mut config = config.normalized();
        config.validate()?;
        config.scratch_path = std::path::absolute(&config.scratch_path)?;

        if let Err(e) = filesystem::ensure_directory(&config.scratch_path).await {
            logger.error(format_args!(
                "Failed to create scratch directory {}: {}",
                config.scratch_path.display(),
                e
            ));
            return Err(e.into());
        }

        logger.info(format_args!(
            "Scratch directory: {} (max {} bytes, formats: {})",
            config.scratch_path.display(),
            config.max_file_size_bytes,
            config.accepted_formats.join(", ")
        ));

        Ok(Self {
            config,
            fetcher,
            logger,
        })
    }

    pub fn config(&self) -> &IngestorConfig {
        &self.config
    }

    /// Absolute scratch directory
    pub fn scratch_path(&self) -> &Path {
        &self.config.scratch_path
    }

    /// Download `url` and store it. The extension hint comes from the URL's last path segment.
    pub async fn download_and_store(
        &self,
        url: &str,
        requester_id: i64,
        message_id: i64,
    ) -> StorageResult {
        let hint = extension_hint(url);
        self.logger.info(format_args!(
            "Downloading .{hint} from {} for requester {requester_id}, message {message_id}",
            redact_url(url)
        ));

        let data = match self.fetcher.fetch_bytes(url).await {
            Ok(data) => data,
            Err(e) => return into_storage_result(&self.logger, "Download", e),
        };

        match self.try_store(&data, requester_id, message_id, &hint).await {
            Ok(result) => result,
            Err(e) => into_storage_result(&self.logger, "Download", e),
        }
    }

    /// Store caller-supplied bytes
    pub async fn store_buffer(
        &self,
        data: &[u8],
        requester_id: i64,
        message_id: i64,
        extension_hint: &str,
    ) -> StorageResult {
        match self
            .try_store(data, requester_id, message_id, extension_hint)
            .await
        {
            Ok(result) => result,
            Err(e) => into_storage_result(&self.logger, "Store", e),
        }
    }

    async fn try_store(
        &self,
        data: &[u8],
        requester_id: i64,
        message_id: i64,
        hint: &str,
    ) -> Result<StorageResult, IngestError> {
        let extension = validate_payload(&self.config, data, hint)?;
        self.logger.debug(format_args!(
            "Resolved .{extension} for {} bytes (hint {hint:?})",
            data.len()
        ));

        let stored_name = generate_stored_name(requester_id, message_id, &extension);
        let stored_path = self.config.scratch_path.join(&stored_name);

        // The directory may have been removed since construction
        filesystem::ensure_directory(&self.config.scratch_path).await?;
        filesystem::write_atomic(&stored_path, data).await?;

        self.logger.info(format_args!(
            "Stored {} ({} bytes)",
            stored_path.display(),
            data.len()
        ));

        Ok(StorageResult::stored(stored_path, stored_name))
    }

    /// Delete a stored file. A path that doesn't exist is not an error.
    pub async fn delete_file(&self, path: &Path) -> Result<(), IngestError> {
        match filesystem::remove_file(path).await {
            Ok(true) => {
                self.logger
                    .info(format_args!("Deleted file {}", path.display()));
                Ok(())
            }
            Ok(false) => {
                self.logger
                    .debug(format_args!("File already gone: {}", path.display()));
                Ok(())
            }
            Err(e) => {
                self.logger.error(format_args!(
                    "Failed to delete file {}: {}",
                    path.display(),
                    e
                ));
                Err(e.into())
            }
        }
    }

    /// Count and size of files currently in the scratch directory
    pub async fn get_storage_stats(&self) -> Result<StorageStats, IngestError> {
        filesystem::directory_stats(&self.config.scratch_path)
            .await
            .map_err(|e| {
                self.logger.error(format_args!(
                    "Failed to list {}: {}",
                    self.config.scratch_path.display(),
                    e
                ));
                IngestError::from(e)
            })
    }

    /// Delete every file older than the configured retention. Runs only when called.
    pub async fn purge_expired(&self) -> Result<PurgeResult, IngestError> {
        let result = filesystem::purge_older_than(&self.config.scratch_path, self.config.retention())
            .await
            .map_err(|e| {
                self.logger.error(format_args!(
                    "Purge of {} failed: {}",
                    self.config.scratch_path.display(),
                    e
                ));
                IngestError::from(e)
            })?;

        self.logger.info(format_args!(
            "Purged {} files ({} bytes) older than {}s",
            result.files_removed, result.bytes_freed, self.config.retention_secs
        ));
        Ok(result)
    }
}

impl std::fmt::Debug for DocumentIngestor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentIngestor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
