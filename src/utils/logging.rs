//! Logging utilities
//!
//! Provides process-level logger setup and the logger capability injected into
//! the ingestor.

use log::{Level, Log, Metadata, Record};
use std::fmt;
use std::sync::Arc;

/// Target attached to every record the ingestor emits
pub const LOG_TARGET: &str = "doc_ingestor";

/// Setup logging for the process (env_logger picks up RUST_LOG).
///
/// Safe to call more than once; later calls are ignored.
pub fn setup_logging() {
    let _ = env_logger::try_init();
}

/// Forwards to whatever global `log` backend the process installed
struct GlobalLogger;

impl Log for GlobalLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        log::logger().enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        log::logger().log(record)
    }

    fn flush(&self) {
        log::logger().flush()
    }
}

/// Logger capability held by a `DocumentIngestor`
#[derive(Clone)]
pub struct IngestLogger {
    inner: Arc<dyn Log>,
}

impl IngestLogger {
    pub fn new(inner: Arc<dyn Log>) -> Self {
        Self { inner }
    }

    /// Logger that writes through the global `log` facade
    pub fn global() -> Self {
        Self::new(Arc::new(GlobalLogger))
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Error, args);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Warn, args);
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Info, args);
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Debug, args);
    }

    fn emit(&self, level: Level, args: fmt::Arguments<'_>) {
        let metadata = Metadata::builder().level(level).target(LOG_TARGET).build();
        if !self.inner.enabled(&metadata) {
            return;
        }
        // No file/line: they would point here, not at the caller
        self.inner
            .log(&Record::builder().metadata(metadata).args(args).build());
    }
}

impl Default for IngestLogger {
    fn default() -> Self {
        Self::global()
    }
}

impl fmt::Debug for IngestLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IngestLogger")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        lines: Mutex<Vec<(Level, String)>>,
    }

    impl Log for Recorder {
        fn enabled(&self, metadata: &Metadata<'_>) -> bool {
            metadata.level() <= Level::Info
        }

        fn log(&self, record: &Record<'_>) {
            assert_eq!(record.target(), LOG_TARGET);
            assert_eq!(record.file(), None);
            assert_eq!(record.line(), None);
            self.lines
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    #[test]
    fn test_injected_logger_receives_records() {
        let recorder = Arc::new(Recorder::default());
        let logger = IngestLogger::new(recorder.clone());

        logger.info(format_args!("stored {}", "a.jpg"));
        logger.warn(format_args!("rejected"));
        logger.debug(format_args!("filtered out"));

        let lines = recorder.lines.lock().unwrap();
        assert_eq!(
            *lines,
            vec![
                (Level::Info, "stored a.jpg".to_string()),
                (Level::Warn, "rejected".to_string()),
            ]
        );
    }

    #[test]
    fn test_setup_logging_is_idempotent() {
        setup_logging();
        setup_logging();
        IngestLogger::global().info(format_args!("global logger reachable"));
    }
}
