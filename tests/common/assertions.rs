//! Custom assertions for integration tests

use storeguard::input::OrderValidation;
use storeguard::upload::FileValidationReport;

/// Assert the upload was rejected and some error mentions `needle`
pub fn assert_rejected_with(report: &FileValidationReport, needle: &str) {
    assert!(!report.is_valid, "expected a rejected upload");
    assert!(
        report.errors.iter().any(|error| error.contains(needle)),
        "no error mentions `{needle}`: {:?}",
        report.errors
    );
}

/// Assert the order failed with an error recorded under `field`
pub fn assert_field_error(validation: &OrderValidation, field: &str) {
    assert!(!validation.is_valid, "expected a rejected order");
    assert!(
        validation.errors.contains_key(field),
        "no error recorded for `{field}`: {:?}",
        validation.errors.keys().collect::<Vec<_>>()
    );
}
