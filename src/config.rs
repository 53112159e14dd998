//! Configuration management for the document ingestor
//!
//! `IngestorConfig` is an immutable value object handed to the ingestor by the
//! caller. It can be built in code or loaded from a TOML file with environment
//! overrides; the ingestor itself never reads the environment.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::storage::validation::normalize_extension;

/// Bytes per megabyte used for every size figure the crate reports.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Default location searched by [`IngestorConfig::load`].
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Environment prefix for overrides, e.g. `DOC_INGEST__MAX_FILE_SIZE_BYTES`.
const ENV_PREFIX: &str = "DOC_INGEST";

/// Complete ingestor configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct IngestorConfig {
    // ═══ STORAGE ═══
    /// Directory where accepted files are written
    pub scratch_path: PathBuf,

    /// Inclusive upper bound on accepted payload size
    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,

    /// Normalized extensions (lowercase, no leading dot)
    #[serde(default = "default_accepted_formats")]
    pub accepted_formats: Vec<String>,

    /// Advisory age threshold used by `purge_expired` (0 = everything expires)
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,

    // ═══ REMOTE FETCH ═══
    /// Timeout for a single remote download
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_max_file_size_bytes() -> u64 {
    10 * BYTES_PER_MB
}

fn default_accepted_formats() -> Vec<String> {
    ["jpg", "png", "pdf", "docx"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_retention_secs() -> u64 {
    3600
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

impl IngestorConfig {
    /// Build a configuration in code. Accepted formats are normalized.
    pub fn new<I, S>(
        scratch_path: impl Into<PathBuf>,
        max_file_size_bytes: u64,
        accepted_formats: I,
        retention_secs: u64,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            scratch_path: scratch_path.into(),
            max_file_size_bytes,
            accepted_formats: accepted_formats
                .into_iter()
                .map(|f| f.as_ref().to_string())
                .collect(),
            retention_secs,
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
        .normalized()
    }

    /// Override the remote fetch timeout
    pub fn with_fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.fetch_timeout_secs = secs;
        self
    }

    /// Load configuration from `config.toml` in the working directory
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from a TOML file with `DOC_INGEST__*` environment overrides
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: IngestorConfig = settings.try_deserialize()?;
        let config = config.normalized();
        config.validate()?;
        Ok(config)
    }

    /// Lowercase, strip leading dots and deduplicate accepted formats
    pub(crate) fn normalized(mut self) -> Self {
        let mut formats: Vec<String> = Vec::with_capacity(self.accepted_formats.len());
        for format in &self.accepted_formats {
            let format = normalize_extension(format);
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        self.accepted_formats = formats;
        self
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.scratch_path.as_os_str().is_empty() {
            return Err(config::ConfigError::Message(
                "scratch_path cannot be empty".into(),
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(config::ConfigError::Message(
                "max_file_size_bytes must be greater than 0".into(),
            ));
        }

        if self.fetch_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "fetch_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.accepted_formats.is_empty() {
            return Err(config::ConfigError::Message(
                "accepted_formats cannot be empty".into(),
            ));
        }

        // Formats end up in file names, so only plain alphanumerics are allowed
        for format in &self.accepted_formats {
            if format.is_empty() || !format.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(config::ConfigError::Message(format!(
                    "invalid accepted format: {format:?}"
                )));
            }
        }

        Ok(())
    }

    /// Check membership of an already-normalized extension
    pub fn accepts(&self, extension: &str) -> bool {
        self.accepted_formats.iter().any(|f| f == extension)
    }

    /// Get maximum file size in megabytes
    pub fn max_file_size_mb(&self) -> f64 {
        self.max_file_size_bytes as f64 / BYTES_PER_MB as f64
    }

    /// Get fetch timeout as Duration
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Get retention threshold as Duration
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_new_normalizes_formats() {
        let config = IngestorConfig::new("/tmp/scratch", 1024, [".JPG", "png", "jpg", ".Pdf"], 0);
        assert_eq!(config.accepted_formats, vec!["jpg", "png", "pdf"]);
        assert!(config.accepts("jpg"));
        assert!(!config.accepts(".jpg"));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let ok = IngestorConfig::new("/tmp/scratch", 1024, ["jpg"], 0);
        assert!(ok.validate().is_ok());

        let zero_size = IngestorConfig::new("/tmp/scratch", 0, ["jpg"], 0);
        assert!(zero_size.validate().is_err());

        let no_formats = IngestorConfig::new("/tmp/scratch", 1024, Vec::<String>::new(), 0);
        assert!(no_formats.validate().is_err());

        let traversal = IngestorConfig::new("/tmp/scratch", 1024, ["../jpg"], 0);
        assert!(traversal.validate().is_err());

        let empty_root = IngestorConfig::new("", 1024, ["jpg"], 0);
        assert!(empty_root.validate().is_err());

        let zero_timeout = ok.clone().with_fetch_timeout_secs(0);
        assert!(zero_timeout.validate().is_err());
    }

    #[test]
    fn test_load_from_toml_applies_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ingest.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "scratch_path = \"/var/tmp/uploads\"").unwrap();
        writeln!(file, "accepted_formats = [\".PNG\", \"pdf\"]").unwrap();
        drop(file);

        let config = IngestorConfig::load_from(&path).unwrap();
        assert_eq!(config.scratch_path, PathBuf::from("/var/tmp/uploads"));
        assert_eq!(config.accepted_formats, vec!["png", "pdf"]);
        assert_eq!(config.max_file_size_bytes, 10 * BYTES_PER_MB);
        assert_eq!(config.retention_secs, 3600);
        assert_eq!(config.fetch_timeout_secs, 30);
        assert_eq!(config.max_file_size_mb(), 10.0);
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(IngestorConfig::load_from(&dir.path().join("absent.toml")).is_err());
    }
}
