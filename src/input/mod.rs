//! Input validation and sanitization
//!
//! Field-typed validators for storefront forms, a markup stripper, the
//! injection-signature matcher, and whole-payload checkout validation.

mod order;
mod patterns;
mod sanitize;
mod types;
mod validators;


pub use order::{CustomerDetails, OrderItem, OrderPayload, OrderValidation};
pub use patterns::{
    contains_suspicious_patterns, matching_patterns, PatternCategory, SuspiciousPattern,
    PATTERN_TABLE_VERSION, SUSPICIOUS_PATTERNS,
};
pub use sanitize::sanitize;
pub use types::FieldValidation;
pub use validators::InputValidator;
