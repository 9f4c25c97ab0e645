//! File upload validation
//!
//! A staged validator for user uploads: size and type allow-lists, magic
//! byte verification, dangerous content scanning, image dimension checks,
//! and filename hygiene, plus descriptor building and response vetting for
//! the media transport.

mod dimensions;
mod filename;
mod service;
mod signatures;
mod types;
mod validator;


pub use dimensions::{parse_dimensions, ImageDimensions};
pub use filename::{sanitize_file_name, validate_file_name, MAX_FILE_NAME_LEN};
pub use service::{MediaTransport, MediaUploadResponse, ResponseCheck, UploadParams};
pub use signatures::{
    contains_embedded_script, find_dangerous_signature, matches_declared_mime, DangerousSignature,
    MagicSignature, DANGEROUS_SIGNATURES, IMAGE_SIGNATURES, SCAN_WINDOW_BYTES,
    SIGNATURE_TABLE_VERSION,
};
pub use types::{FileInfo, FileKind, FileUpload, FileValidationReport};
pub use validator::FileValidator;

#[cfg(test)]
pub use service::MockMediaTransport;
