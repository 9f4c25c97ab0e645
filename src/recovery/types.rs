//! Error taxonomy and processed record types

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DefenseError, ErrorDetail};

/// Category assigned to every handled error
///
/// Drives retry eligibility, severity, and the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Connectivity failures between the client and anything remote
    Network,
    /// Sign-in and session failures
    Authentication,
    /// Rejected data shapes and constraint violations
    Validation,
    /// Local and remote file storage failures
    Storage,
    /// The media processing service misbehaved
    MediaService,
    /// The notification service misbehaved
    MessagingService,
    /// The backend API returned a failure
    Backend,
    /// Anything unattributable
    System,
    /// The user supplied something unusable
    UserInput,
}

impl ErrorCategory {
    /// Stable snake_case name, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Authentication => "authentication",
            Self::Validation => "validation",
            Self::Storage => "storage",
            Self::MediaService => "media_service",
            Self::MessagingService => "messaging_service",
            Self::Backend => "backend",
            Self::System => "system",
            Self::UserInput => "user_input",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logging priority, ordered from least to most severe
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Stable snake_case name, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record built for every handled error
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedError {
    /// Monotonically unique id, `err_<millis>_<seq>`
    pub id: String,
    /// When the error was handled
    pub timestamp: DateTime<Utc>,
    /// Caller-supplied label for where the error surfaced
    pub context: String,
    /// Assigned category
    pub category: ErrorCategory,
    /// Assigned severity
    pub severity: ErrorSeverity,
    /// Name, message, and code of the original error
    pub original: ErrorDetail,
    /// Fixed user-safe text for this category, never internal detail
    pub user_message: String,
    /// Whether the category is retry-eligible
    pub should_retry: bool,
    /// Retries already spent when the error was handled
    pub retry_count: u32,
    /// Caller-supplied extras, plus `fallback` when record building failed
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Outcome of a retry run that did not produce a value
#[derive(Debug, thiserror::Error)]
pub enum RetryError {
    /// The first failure was not retry-eligible; the original error, intact
    #[error(transparent)]
    Rejected(DefenseError),
    /// Every allowed attempt failed
    #[error("retry budget exhausted after {attempts} attempts: {last}")]
    Exhausted {
        /// Total invocations, the first attempt included
        attempts: u32,
        /// Error from the final attempt
        last: DefenseError,
    },
}

impl RetryError {
    /// The underlying error, whichever way the run ended
    pub fn inner(&self) -> &DefenseError {
        match self {
            Self::Rejected(err) => err,
            Self::Exhausted { last, .. } => last,
        }
    }

    /// Unwrap into the underlying error
    pub fn into_inner(self) -> DefenseError {
        match self {
            Self::Rejected(err) => err,
            Self::Exhausted { last, .. } => last,
        }
    }
}

/// Constraints applied when computing statistics
#[derive(Debug, Clone, Default)]
pub struct StatisticsFilter {
    /// Keep only records of this category
    pub category: Option<ErrorCategory>,
    /// Keep only records of this severity
    pub severity: Option<ErrorSeverity>,
    /// Keep only records handled within the trailing window
    pub time_range_ms: Option<i64>,
}

/// Aggregated view over the filtered slice of the error log
#[derive(Debug, Clone, Serialize)]
pub struct ErrorStatistics {
    /// Records matching the filter
    pub total: usize,
    /// Matching records per category
    pub category_breakdown: HashMap<ErrorCategory, usize>,
    /// Matching records per severity
    pub severity_breakdown: HashMap<ErrorSeverity, usize>,
    /// Up to ten matching records, newest first
    pub recent_errors: Vec<ProcessedError>,
}
