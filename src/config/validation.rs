//! Configuration validation

use super::models::{
    DefenseConfig, FileTypeRules, InputSettings, RateLimitSettings, RetrySettings, UploadSettings,
};
use crate::error::{DefenseError, Result};

/// Validation for configuration structures
pub trait Validate {
    /// Check the structure for unusable values
    fn validate(&self) -> Result<()>;
}

impl Validate for DefenseConfig {
    fn validate(&self) -> Result<()> {
        self.rate_limit.validate()?;
        self.upload.validate()?;
        self.input.validate()?;
        self.retry.validate()?;
        Ok(())
    }
}

impl Validate for RateLimitSettings {
    fn validate(&self) -> Result<()> {
        for (action, limit) in &self.actions {
            if limit.requests == 0 {
                return Err(DefenseError::config(format!(
                    "rate limit for `{action}` allows zero requests"
                )));
            }
            if limit.window_ms == 0 {
                return Err(DefenseError::config(format!(
                    "rate limit for `{action}` has a zero-length window"
                )));
            }
        }
        if self.default_limit.requests == 0 || self.default_limit.window_ms == 0 {
            return Err(DefenseError::config("default rate limit is unusable"));
        }
        if self.cleanup_max_age_ms == 0 {
            return Err(DefenseError::config(
                "cleanup_max_age_ms must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn validate_file_rules(kind: &str, rules: &FileTypeRules) -> Result<()> {
    if rules.max_size == 0 {
        return Err(DefenseError::config(format!(
            "{kind} uploads have a zero byte size cap"
        )));
    }
    if rules.allowed_mime_types.is_empty() {
        return Err(DefenseError::config(format!(
            "{kind} uploads allow no MIME types"
        )));
    }
    if rules.allowed_extensions.is_empty() {
        return Err(DefenseError::config(format!(
            "{kind} uploads allow no extensions"
        )));
    }
    Ok(())
}

impl Validate for UploadSettings {
    fn validate(&self) -> Result<()> {
        validate_file_rules("image", &self.image)?;
        validate_file_rules("document", &self.document)?;
        if self.max_image_dimension == 0 {
            return Err(DefenseError::config(
                "max_image_dimension must be greater than zero",
            ));
        }
        if self.trusted_media_host.is_empty() {
            return Err(DefenseError::config("trusted_media_host is empty"));
        }
        if self.max_upload_bytes == 0 {
            return Err(DefenseError::config(
                "max_upload_bytes must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl Validate for InputSettings {
    fn validate(&self) -> Result<()> {
        if self.text_max_len == 0 {
            return Err(DefenseError::config(
                "text_max_len must be greater than zero",
            ));
        }
        if self.text_min_len > self.text_max_len {
            return Err(DefenseError::config(
                "text_min_len is greater than text_max_len",
            ));
        }
        Ok(())
    }
}

impl Validate for RetrySettings {
    fn validate(&self) -> Result<()> {
        if self.base_delay_ms == 0 {
            return Err(DefenseError::config(
                "base_delay_ms must be greater than zero",
            ));
        }
        if self.base_delay_ms > self.max_delay_ms {
            return Err(DefenseError::config(
                "base_delay_ms is greater than max_delay_ms",
            ));
        }
        if self.backoff_multiplier < 1.0 {
            return Err(DefenseError::config(
                "backoff_multiplier must be at least 1.0",
            ));
        }
        Ok(())
    }
}
