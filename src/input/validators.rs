//! Field-typed validators
//!
//! Each validator trims its input, applies the field's shape rules, then
//! runs the injection-signature table. The returned value is already
//! normalized for storage.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::patterns::contains_suspicious_patterns;
use super::sanitize::sanitize;
use super::types::FieldValidation;
use crate::config::InputSettings;

/// Longest accepted email address
const MAX_EMAIL_LEN: usize = 254;
/// Longest accepted personal name
const MAX_NAME_LEN: usize = 100;
/// Longest accepted phone number, separators included
const MAX_PHONE_LEN: usize = 20;
/// Inclusive digit-count bounds for phone numbers
const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 7..=15;
/// Largest accepted monetary amount
const MAX_AMOUNT: f64 = 1_000_000.0;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email regex")
});

static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[\d\s\-()]+$").expect("phone regex"));

static NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\s'’.\-]+$").expect("name regex"));

static AMOUNT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(\.\d{1,2})?$").expect("amount regex"));

/// Validator for user-entered fields
#[derive(Debug, Clone)]
pub struct InputValidator {
    settings: InputSettings,
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new(InputSettings::default())
    }
}

impl InputValidator {
    /// Build a validator over the given settings
    pub fn new(settings: InputSettings) -> Self {
        Self { settings }
    }

    /// The settings this validator runs on
    pub fn settings(&self) -> &InputSettings {
        &self.settings
    }

    /// Validate an email address; the value is trimmed and lowercased
    pub fn validate_email(&self, raw: &str) -> FieldValidation<String> {
        let value = raw.trim().to_lowercase();
        if value.is_empty() {
            return FieldValidation::invalid("Email is required");
        }
        if value.len() > MAX_EMAIL_LEN {
            return FieldValidation::invalid("Email is too long");
        }
        if !EMAIL_REGEX.is_match(&value) {
            return FieldValidation::invalid("Email format is invalid");
        }
        if contains_suspicious_patterns(&value) {
            return FieldValidation::invalid("Email contains disallowed content");
        }
        FieldValidation::valid(value)
    }

    /// Validate an optional phone number; empty input is valid and empty
    pub fn validate_phone(&self, raw: &str) -> FieldValidation<Option<String>> {
        let value = raw.trim();
        if value.is_empty() {
            return FieldValidation::valid(None);
        }
        if value.len() > MAX_PHONE_LEN {
            return FieldValidation::invalid("Phone number is too long");
        }
        if !PHONE_REGEX.is_match(value) {
            return FieldValidation::invalid("Phone number contains invalid characters");
        }
        let digits = value.chars().filter(char::is_ascii_digit).count();
        if !PHONE_DIGITS.contains(&digits) {
            return FieldValidation::invalid("Phone number length is invalid");
        }
        FieldValidation::valid(Some(value.to_string()))
    }

    /// Validate a personal name such as a customer or author name
    pub fn validate_name(&self, raw: &str, field: &str) -> FieldValidation<String> {
        let value = raw.trim();
        if value.is_empty() {
            return FieldValidation::invalid(format!("{field} is required"));
        }
        if value.chars().count() > MAX_NAME_LEN {
            return FieldValidation::invalid(format!("{field} is too long"));
        }
        if !NAME_REGEX.is_match(value) {
            return FieldValidation::invalid(format!("{field} contains invalid characters"));
        }
        if contains_suspicious_patterns(value) {
            return FieldValidation::invalid(format!("{field} contains disallowed content"));
        }
        FieldValidation::valid(value.to_string())
    }

    /// Validate a free-text field using the configured length bounds
    pub fn validate_text(&self, raw: &str, field: &str) -> FieldValidation<String> {
        self.validate_text_with(raw, field, self.settings.text_min_len, self.settings.text_max_len)
    }

    /// Validate a free-text field with explicit length bounds
    ///
    /// The returned value is trimmed and markup-stripped.
    pub fn validate_text_with(
        &self,
        raw: &str,
        field: &str,
        min_len: usize,
        max_len: usize,
    ) -> FieldValidation<String> {
        let value = raw.trim();
        let length = value.chars().count();
        if length < min_len {
            return FieldValidation::invalid(format!(
                "{field} must be at least {min_len} characters"
            ));
        }
        if length > max_len {
            return FieldValidation::invalid(format!(
                "{field} must be at most {max_len} characters"
            ));
        }
        if contains_suspicious_patterns(value) {
            return FieldValidation::invalid(format!("{field} contains disallowed content"));
        }
        FieldValidation::valid(sanitize(value))
    }

    /// Validate a monetary amount with at most two decimal digits
    pub fn validate_amount(&self, raw: &str) -> FieldValidation<f64> {
        let value = raw.trim();
        if value.is_empty() {
            return FieldValidation::invalid("Amount is required");
        }
        if !AMOUNT_REGEX.is_match(value) {
            return FieldValidation::invalid("Amount format is invalid");
        }
        let amount: f64 = match value.parse() {
            Ok(amount) => amount,
            Err(_) => return FieldValidation::invalid("Amount format is invalid"),
        };
        if amount > MAX_AMOUNT {
            return FieldValidation::invalid("Amount exceeds the maximum");
        }
        FieldValidation::valid(amount)
    }

    /// Validate a user-supplied resource URL against the trusted host list
    pub fn validate_resource_url(&self, raw: &str) -> FieldValidation<String> {
        let value = raw.trim();
        if value.is_empty() {
            return FieldValidation::invalid("URL is required");
        }
        let url = match Url::parse(value) {
            Ok(url) => url,
            Err(_) => return FieldValidation::invalid("URL format is invalid"),
        };
        if url.scheme() != "https" {
            return FieldValidation::invalid("URL must use https");
        }
        let trusted = url.host_str().is_some_and(|host| {
            self.settings
                .trusted_resource_hosts
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(host))
        });
        if !trusted {
            return FieldValidation::invalid("URL host is not trusted");
        }
        FieldValidation::valid(url.to_string())
    }
}
