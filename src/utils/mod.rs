//! Utility functions
//!
//! Provides logging setup and the injectable logger capability.

pub mod logging;

pub use logging::{IngestLogger, setup_logging};
