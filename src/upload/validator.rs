//! The staged upload validator

use std::sync::Arc;

use tracing::{debug, warn};

use super::dimensions::parse_dimensions;
use super::filename::{extension_of, sanitize_file_name, validate_file_name};
use super::signatures::{
    contains_embedded_script, find_dangerous_signature, matches_declared_mime, SCAN_WINDOW_BYTES,
};
use super::types::{FileInfo, FileKind, FileUpload, FileValidationReport};
use crate::clock::{Clock, SystemClock};
use crate::config::{FileTypeRules, UploadSettings};

/// Accepted aspect ratio range, width over height
const ASPECT_RATIO_RANGE: std::ops::RangeInclusive<f64> = 0.01..=100.0;

/// Validates uploads against the configured rules
///
/// Every stage runs even after an earlier one fails; the report aggregates
/// all problems. Content checks always trust the payload bytes over the
/// client's declared metadata.
#[derive(Clone)]
pub struct FileValidator {
    settings: UploadSettings,
    clock: Arc<dyn Clock>,
}

impl Default for FileValidator {
    fn default() -> Self {
        Self::new(UploadSettings::default())
    }
}

impl FileValidator {
    /// Build a validator over the given settings
    pub fn new(settings: UploadSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    /// Build a validator with an injected time source
    pub fn with_clock(settings: UploadSettings, clock: Arc<dyn Clock>) -> Self {
        Self { settings, clock }
    }

    /// The settings this validator runs on
    pub fn settings(&self) -> &UploadSettings {
        &self.settings
    }

    fn rules_for(&self, kind: FileKind) -> &FileTypeRules {
        match kind {
            FileKind::Image => &self.settings.image,
            FileKind::Document => &self.settings.document,
        }
    }

    /// Run `file` through every validation stage for `kind`
    pub fn validate(&self, file: &FileUpload, kind: FileKind) -> FileValidationReport {
        let rules = self.rules_for(kind);
        let mut errors = Vec::new();

        // stage 1: basic properties
        let effective_size = file.size.max(file.bytes.len() as u64);
        if file.size == 0 || file.bytes.is_empty() {
            errors.push("File is empty".to_string());
        }
        if effective_size > rules.max_size {
            errors.push(format!(
                "File exceeds the maximum size of {} bytes",
                rules.max_size
            ));
        }

        // stage 2: declared MIME type
        let declared_mime = file
            .mime_type
            .as_deref()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if declared_mime.is_empty() {
            errors.push("File has no declared MIME type".to_string());
        } else if !rules
            .allowed_mime_types
            .iter()
            .any(|mime| mime.eq_ignore_ascii_case(&declared_mime))
        {
            errors.push(format!("MIME type `{declared_mime}` is not allowed"));
        }

        // stage 3: filename extension
        match extension_of(&file.name) {
            Some(extension) if rules.allowed_extensions.contains(&extension) => {}
            Some(extension) => {
                errors.push(format!("File extension `.{extension}` is not allowed"));
            }
            None => errors.push("File has no extension".to_string()),
        }

        // stage 4: magic bytes must back the declared type
        let mut signature_ok = false;
        if kind == FileKind::Image && !declared_mime.is_empty() && !file.bytes.is_empty() {
            match matches_declared_mime(&declared_mime, &file.bytes) {
                Some(true) => signature_ok = true,
                Some(false) => errors.push(format!(
                    "File content does not match the declared type `{declared_mime}`"
                )),
                None => {
                    debug!(mime = %declared_mime, "no signature row for declared type");
                }
            }
        }

        // stage 5: dangerous content scan over the leading window
        if !file.bytes.is_empty() {
            let window = &file.bytes[..file.bytes.len().min(SCAN_WINDOW_BYTES)];
            if let Some(row) = find_dangerous_signature(window) {
                warn!(signature = row.name, file = %file.name, "dangerous content in upload");
                errors.push(format!("File contains dangerous content ({})", row.name));
            }
            if contains_embedded_script(&String::from_utf8_lossy(window)) {
                errors.push("File contains embedded script content".to_string());
            }
        }

        // stage 6: image dimensions, only meaningful once the signature holds
        if kind == FileKind::Image && signature_ok {
            match parse_dimensions(&declared_mime, &file.bytes) {
                Some(dimensions) => {
                    let max_side = self.settings.max_image_dimension;
                    if dimensions.width > max_side || dimensions.height > max_side {
                        errors.push(format!(
                            "Image dimensions {}x{} exceed the maximum of {max_side} pixels",
                            dimensions.width, dimensions.height
                        ));
                    }
                    if !ASPECT_RATIO_RANGE.contains(&dimensions.aspect_ratio()) {
                        errors.push("Image aspect ratio is outside the accepted range".to_string());
                    }
                }
                None => errors.push("Image dimensions could not be read".to_string()),
            }
        }

        // stage 7: filename rules
        errors.extend(validate_file_name(&file.name));

        let is_valid = errors.is_empty();
        if !is_valid {
            debug!(file = %file.name, failures = errors.len(), "upload rejected");
        }
        FileValidationReport {
            is_valid,
            sanitized_file_name: is_valid.then(|| self.sanitize_name(&file.name)),
            file_info: is_valid.then(|| FileInfo {
                name: file.name.clone(),
                size: effective_size,
                mime_type: declared_mime,
                last_modified: file.last_modified,
            }),
            errors,
        }
    }

    /// Rewrite `name` into a safe, collision-resistant storage name
    pub fn sanitize_name(&self, name: &str) -> String {
        sanitize_file_name(name, self.clock.as_ref())
    }

    pub(super) fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }
}
