//! Binary signature tables
//!
//! Magic-byte rows for declared image types and header rows for content
//! that must never be stored, plus the embedded-script scan applied to the
//! leading window of every upload.

use once_cell::sync::Lazy;
use regex::Regex;

/// Signature table version, bumped whenever rows change
pub const SIGNATURE_TABLE_VERSION: &str = "1.0.0";

/// How many leading bytes are scanned for dangerous content
pub const SCAN_WINDOW_BYTES: usize = 1024;

/// Leading bytes an image payload must start with for a declared MIME type
#[derive(Debug, Clone, Copy)]
pub struct MagicSignature {
    /// Declared MIME type the row applies to
    pub mime_type: &'static str,
    /// Accepted leading byte sequences
    pub signatures: &'static [&'static [u8]],
}

/// Magic bytes for the accepted image types
pub static IMAGE_SIGNATURES: &[MagicSignature] = &[
    MagicSignature {
        mime_type: "image/jpeg",
        signatures: &[&[0xFF, 0xD8, 0xFF]],
    },
    MagicSignature {
        mime_type: "image/png",
        signatures: &[&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]],
    },
    MagicSignature {
        mime_type: "image/gif",
        signatures: &[b"GIF87a", b"GIF89a"],
    },
    MagicSignature {
        mime_type: "image/webp",
        signatures: &[b"RIFF"],
    },
];

/// A header marking executable or archive content
#[derive(Debug, Clone, Copy)]
pub struct DangerousSignature {
    /// Stable row name, recorded when the row fires
    pub name: &'static str,
    /// Byte sequence that marks the content
    pub bytes: &'static [u8],
    /// Whether the sequence may sit at any offset inside the scan window.
    /// Only the two-byte `MZ` header is anchored at offset zero; a sequence
    /// that short occurs routinely inside compressed image data.
    pub anywhere: bool,
}

/// Content that must never be stored, whatever the file claims to be
pub static DANGEROUS_SIGNATURES: &[DangerousSignature] = &[
    DangerousSignature {
        name: "windows_executable",
        bytes: &[0x4D, 0x5A],
        anywhere: false,
    },
    DangerousSignature {
        name: "elf_executable",
        bytes: &[0x7F, 0x45, 0x4C, 0x46],
        anywhere: true,
    },
    DangerousSignature {
        name: "mach_o_fat",
        bytes: &[0xCA, 0xFE, 0xBA, 0xBE],
        anywhere: true,
    },
    DangerousSignature {
        name: "mach_o_32",
        bytes: &[0xFE, 0xED, 0xFA, 0xCE],
        anywhere: true,
    },
    DangerousSignature {
        name: "zip_archive",
        bytes: &[0x50, 0x4B, 0x03, 0x04],
        anywhere: true,
    },
    DangerousSignature {
        name: "rar_archive",
        bytes: b"Rar!",
        anywhere: true,
    },
    DangerousSignature {
        name: "php_source",
        bytes: b"<?php",
        anywhere: true,
    },
    DangerousSignature {
        name: "html_script",
        bytes: b"<script",
        anywhere: true,
    },
];

static EMBEDDED_SCRIPT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<script|javascript\s*:|\bon\w+\s*=|\beval\s*\(|<iframe|<object|<embed")
        .expect("embedded script regex")
});

/// Whether the declared MIME type's magic bytes match the payload start
///
/// `None` means no row covers the declared type; image rows cover exactly
/// the types the default configuration accepts.
pub fn matches_declared_mime(mime_type: &str, bytes: &[u8]) -> Option<bool> {
    IMAGE_SIGNATURES
        .iter()
        .find(|row| row.mime_type.eq_ignore_ascii_case(mime_type))
        .map(|row| {
            row.signatures
                .iter()
                .any(|signature| bytes.starts_with(signature))
        })
}

/// First dangerous row matching `window`
///
/// All rows except the anchored `MZ` header are searched at any offset, so
/// an archive or PHP payload hiding behind a valid image header still fires.
pub fn find_dangerous_signature(window: &[u8]) -> Option<&'static DangerousSignature> {
    DANGEROUS_SIGNATURES.iter().find(|row| {
        if row.anywhere {
            contains_bytes(window, row.bytes)
        } else {
            window.starts_with(row.bytes)
        }
    })
}

/// True when the decoded window carries script markers
pub fn contains_embedded_script(text: &str) -> bool {
    EMBEDDED_SCRIPT_REGEX.is_match(text)
}

fn contains_bytes(window: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty()
        && needle.len() <= window.len()
        && window.windows(needle.len()).any(|chunk| chunk == needle)
}
