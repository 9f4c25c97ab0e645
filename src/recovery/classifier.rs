//! Table-driven error classification
//!
//! Classification runs three rule passes over the error's detail view: code
//! prefixes, stable error names, then message keywords. The tables are data,
//! so routing a new failure mode means adding a row.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use super::types::{ErrorCategory, ErrorSeverity};
use crate::error::{DefenseError, ErrorDetail};

/// Rule table version, bumped whenever rows change
pub const CLASSIFIER_TABLE_VERSION: &str = "1.0.0";

/// Authentication code carried by disabled-account failures
const ACCOUNT_DISABLED_CODE: &str = "auth/account-disabled";

/// Routes errors whose code starts with a collaborator prefix
#[derive(Debug, Clone, Copy)]
struct CodePrefixRule {
    prefix: &'static str,
    category: ErrorCategory,
}

const CODE_PREFIX_RULES: &[CodePrefixRule] = &[
    CodePrefixRule {
        prefix: "auth/",
        category: ErrorCategory::Authentication,
    },
    CodePrefixRule {
        prefix: "db/",
        category: ErrorCategory::Backend,
    },
];

/// Routes errors by their stable name
#[derive(Debug, Clone, Copy)]
struct NameRule {
    name: &'static str,
    category: ErrorCategory,
}

const NAME_RULES: &[NameRule] = &[
    NameRule {
        name: "NetworkError",
        category: ErrorCategory::Network,
    },
    NameRule {
        name: "TimeoutError",
        category: ErrorCategory::Network,
    },
    NameRule {
        name: "AuthError",
        category: ErrorCategory::Authentication,
    },
    NameRule {
        name: "ValidationError",
        category: ErrorCategory::Validation,
    },
    NameRule {
        name: "StorageError",
        category: ErrorCategory::Storage,
    },
    NameRule {
        name: "IoError",
        category: ErrorCategory::Storage,
    },
    NameRule {
        name: "MediaServiceError",
        category: ErrorCategory::MediaService,
    },
    NameRule {
        name: "MessagingServiceError",
        category: ErrorCategory::MessagingService,
    },
    NameRule {
        name: "BackendError",
        category: ErrorCategory::Backend,
    },
    NameRule {
        name: "UserInputError",
        category: ErrorCategory::UserInput,
    },
    NameRule {
        name: "ConfigError",
        category: ErrorCategory::System,
    },
    NameRule {
        name: "SerializationError",
        category: ErrorCategory::System,
    },
];

/// Routes errors by message keywords; first matching row wins
#[derive(Debug, Clone, Copy)]
struct KeywordRule {
    name: &'static str,
    pattern: &'static str,
    category: ErrorCategory,
}

const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        name: "network_keywords",
        pattern: r"(?i)\b(network|connection|offline|unreachable|dns)\b",
        category: ErrorCategory::Network,
    },
    KeywordRule {
        name: "media_keywords",
        pattern: r"(?i)\b(media|cdn|transcode|image processing)\b",
        category: ErrorCategory::MediaService,
    },
    KeywordRule {
        name: "messaging_keywords",
        pattern: r"(?i)\b(messaging|notification|bot|webhook)\b",
        category: ErrorCategory::MessagingService,
    },
    KeywordRule {
        name: "validation_keywords",
        pattern: r"(?i)\b(validation|invalid)\b",
        category: ErrorCategory::Validation,
    },
    KeywordRule {
        name: "storage_keywords",
        pattern: r"(?i)\b(storage|upload|file)\b",
        category: ErrorCategory::Storage,
    },
    KeywordRule {
        name: "authentication_keywords",
        pattern: r"(?i)\b(unauthorized|credentials?|session expired)\b",
        category: ErrorCategory::Authentication,
    },
];

static COMPILED_KEYWORD_RULES: Lazy<Vec<(Regex, ErrorCategory)>> = Lazy::new(|| {
    KEYWORD_RULES
        .iter()
        .filter_map(|rule| match Regex::new(rule.pattern) {
            Ok(regex) => Some((regex, rule.category)),
            Err(err) => {
                warn!(rule = rule.name, %err, "skipping keyword rule that failed to compile");
                None
            }
        })
        .collect()
});

/// Category for a detail view: code prefix, then name, then keywords
pub fn classify_detail(detail: &ErrorDetail) -> ErrorCategory {
    if let Some(code) = &detail.code {
        for rule in CODE_PREFIX_RULES {
            if code.starts_with(rule.prefix) {
                return rule.category;
            }
        }
    }

    for rule in NAME_RULES {
        if detail.name == rule.name {
            return rule.category;
        }
    }

    for (regex, category) in COMPILED_KEYWORD_RULES.iter() {
        if regex.is_match(&detail.message) {
            return *category;
        }
    }

    ErrorCategory::System
}

/// Category for an error value
pub fn classify(error: &DefenseError) -> ErrorCategory {
    classify_detail(&ErrorDetail::from_error(error))
}

/// Severity table over category plus the disabled-account special case
pub fn severity_for(category: ErrorCategory, detail: &ErrorDetail) -> ErrorSeverity {
    if category == ErrorCategory::Authentication
        && detail.code.as_deref() == Some(ACCOUNT_DISABLED_CODE)
    {
        return ErrorSeverity::Critical;
    }

    match category {
        ErrorCategory::Backend | ErrorCategory::System => ErrorSeverity::High,
        ErrorCategory::MediaService
        | ErrorCategory::MessagingService
        | ErrorCategory::Storage => ErrorSeverity::Medium,
        _ => ErrorSeverity::Low,
    }
}

/// Whether failures in this category are worth retrying
///
/// Validation and authentication failures never are; repeating the call
/// cannot change the outcome.
pub fn should_retry(category: ErrorCategory) -> bool {
    matches!(
        category,
        ErrorCategory::Network
            | ErrorCategory::MediaService
            | ErrorCategory::MessagingService
            | ErrorCategory::Storage
    )
}

/// Fixed user-safe message for the category
///
/// Never derived from the original error text; internal detail stays in the
/// log record.
pub fn user_message(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::Network => {
            "Connection problem. Please check your internet and try again."
        }
        ErrorCategory::Authentication => "Sign-in problem. Please sign in again.",
        ErrorCategory::Validation => {
            "Some of the submitted information is invalid. Please review it and try again."
        }
        ErrorCategory::Storage => "File operation failed. Please try again.",
        ErrorCategory::MediaService => {
            "Image processing is temporarily unavailable. Please try again later."
        }
        ErrorCategory::MessagingService => {
            "Notifications are temporarily unavailable. Your order is not affected."
        }
        ErrorCategory::Backend => "Service is temporarily unavailable. Please try again later.",
        ErrorCategory::System => "Something went wrong. Please try again.",
        ErrorCategory::UserInput => "Please check the entered information and try again.",
    }
}
