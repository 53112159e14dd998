//! Scratch storage management
//!
//! Handles signature detection, payload policy, naming and file operations.

pub mod filesystem;
pub mod naming;
pub mod results;
pub mod signature;
pub mod validation;

// Re-export commonly used items
pub use results::{PurgeResult, StorageResult, StorageStats};
pub use signature::{SIGNATURES, Signature, detect};
pub use validation::{normalize_extension, resolve_extension, validate_payload};
