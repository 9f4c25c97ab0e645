//! Validation result types

/// Outcome of validating one field
///
/// Rejected input is data, not an error: the common path stays allocation
/// light and callers aggregate outcomes across a whole form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValidation<T> {
    /// Whether the raw value passed every check
    pub is_valid: bool,
    /// Normalized value, present only when valid
    pub value: Option<T>,
    /// First failed check, phrased for end users
    pub error: Option<String>,
}

impl<T> FieldValidation<T> {
    /// Successful validation carrying the normalized value
    pub fn valid(value: T) -> Self {
        Self {
            is_valid: true,
            value: Some(value),
            error: None,
        }
    }

    /// Failed validation carrying the user-facing reason
    pub fn invalid<S: Into<String>>(error: S) -> Self {
        Self {
            is_valid: false,
            value: None,
            error: Some(error.into()),
        }
    }

    /// The normalized value, discarding the outcome flags
    pub fn into_value(self) -> Option<T> {
        self.value
    }
}
