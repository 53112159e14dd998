//! Size and format policy
//!
//! Decides whether a payload may be stored and which extension it is stored
//! under. Size is checked before anything looks at content.

use crate::config::IngestorConfig;
use crate::error::IngestError;
use crate::storage::signature::detect_extension;

/// Strip leading dots and lowercase: `".JPG"` -> `"jpg"`
pub fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Reject payloads larger than the configured cap
pub fn check_size(len: u64, max: u64) -> Result<(), IngestError> {
    if len > max {
        return Err(IngestError::SizeExceeded { size: len, max });
    }
    Ok(())
}

/// Pick the extension a payload is stored under.
///
/// A recognized signature wins over the hint; otherwise the normalized hint
/// is used as-is.
pub fn resolve_extension(data: &[u8], hint: &str) -> String {
    let hint = normalize_extension(hint);
    match detect_extension(data, &hint) {
        Some(detected) => detected.to_string(),
        None => hint,
    }
}

/// Run the full size + format policy and return the resolved extension
pub fn validate_payload(
    config: &IngestorConfig,
    data: &[u8],
    hint: &str,
) -> Result<String, IngestError> {
    check_size(data.len() as u64, config.max_file_size_bytes)?;

    let extension = resolve_extension(data, hint);
    if !config.accepts(&extension) {
        return Err(IngestError::UnsupportedFormat(extension));
    }

    Ok(extension)
}
