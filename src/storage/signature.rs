//! Content-signature detection
//!
//! Identifies the true type of a payload from its leading bytes, ignoring any
//! file name or extension the caller supplied.
//!
//! ZIP-based office documents share the plain ZIP local-file header, so the
//! signature alone cannot tell a `.docx` from a `.zip` or `.xlsx`. The ZIP
//! entry resolves to `docx` unless the caller's hint names one of its sibling
//! container formats. No deeper container parsing is attempted.

/// A magic-byte prefix and the extension it maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub magic: &'static [u8],
    pub extension: &'static str,
    /// Other extensions sharing the same container signature
    pub aliases: &'static [&'static str],
}

/// Ordered signature table; the first matching entry wins
pub const SIGNATURES: &[Signature] = &[
    Signature {
        magic: &[0xFF, 0xD8, 0xFF],
        extension: "jpg",
        aliases: &[],
    },
    Signature {
        magic: &[0x89, 0x50, 0x4E, 0x47],
        extension: "png",
        aliases: &[],
    },
    Signature {
        magic: &[0x25, 0x50, 0x44, 0x46],
        extension: "pdf",
        aliases: &[],
    },
    Signature {
        magic: &[0x47, 0x49, 0x46, 0x38],
        extension: "gif",
        aliases: &[],
    },
    Signature {
        magic: &[0x50, 0x4B, 0x03, 0x04],
        extension: "docx",
        aliases: &["xlsx", "pptx", "odt", "zip"],
    },
];

/// Find the first table entry whose magic bytes prefix `data`.
///
/// Buffers shorter than a signature (including empty ones) simply don't match.
pub fn detect(data: &[u8]) -> Option<&'static Signature> {
    SIGNATURES.iter().find(|sig| data.starts_with(sig.magic))
}

/// Detected extension for `data`, honouring container aliases in `hint`.
///
/// `hint` must already be normalized.
pub fn detect_extension(data: &[u8], hint: &str) -> Option<&'static str> {
    let sig = detect(data)?;
    Some(
        sig.aliases
            .iter()
            .copied()
            .find(|alias| *alias == hint)
            .unwrap_or(sig.extension),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_known_signatures() {
        assert_eq!(detect(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]).unwrap().extension, "jpg");
        assert_eq!(detect(b"\x89PNG\r\n\x1a\n").unwrap().extension, "png");
        assert_eq!(detect(b"%PDF-1.7\n").unwrap().extension, "pdf");
        assert_eq!(detect(b"GIF89a").unwrap().extension, "gif");
        assert_eq!(detect(b"PK\x03\x04rest").unwrap().extension, "docx");
    }

    #[test]
    fn test_short_and_empty_buffers_do_not_match() {
        assert!(detect(&[]).is_none());
        assert!(detect(&[0xFF, 0xD8]).is_none());
        assert!(detect(b"%PD").is_none());
    }

    #[test]
    fn test_unknown_content_does_not_match() {
        assert!(detect(b"MZ\x90\x00 executable").is_none());
        assert!(detect(b"plain text").is_none());
        // Signature must be a prefix, not merely present
        assert!(detect(b"xx%PDF-1.4").is_none());
    }

    #[test]
    fn test_hint_never_overrides_plain_signature() {
        assert_eq!(detect_extension(&[0xFF, 0xD8, 0xFF], "exe"), Some("jpg"));
        assert_eq!(detect_extension(&[0xFF, 0xD8, 0xFF], "png"), Some("jpg"));
        assert_eq!(detect_extension(b"%PDF", "docx"), Some("pdf"));
    }

    #[test]
    fn test_zip_container_aliases() {
        assert_eq!(detect_extension(b"PK\x03\x04", ""), Some("docx"));
        assert_eq!(detect_extension(b"PK\x03\x04", "exe"), Some("docx"));
        assert_eq!(detect_extension(b"PK\x03\x04", "xlsx"), Some("xlsx"));
        assert_eq!(detect_extension(b"PK\x03\x04", "zip"), Some("zip"));
        assert_eq!(detect_extension(b"not zip", "xlsx"), None);
    }
}
