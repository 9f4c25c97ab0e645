//! Error types for the defense pipeline

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for the defense pipeline
pub type Result<T> = std::result::Result<T, DefenseError>;

/// Main error type for the defense pipeline
///
/// Failures of external collaborators (document database, media transport,
/// messaging transport, key-value store) are wrapped into these variants at
/// the call site, so every component sees a single error surface.
#[derive(Error, Debug)]
pub enum DefenseError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Key-value store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network errors
    #[error("Network error: {0}")]
    Network(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Authentication errors, carrying the collaborator's code when known
    #[error("Authentication error: {message}")]
    Auth {
        /// Collaborator error code, for example `auth/account-disabled`
        code: Option<String>,
        /// Human-readable message
        message: String,
    },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// An action was denied by the rate limiter
    #[error("Rate limit exceeded for action `{action}`, retry in {retry_after_secs}s")]
    RateLimited {
        /// The denied action
        action: String,
        /// Seconds until the window resets
        retry_after_secs: u64,
    },

    /// Media transport errors
    #[error("Media service error: {0}")]
    MediaService(String),

    /// Messaging transport errors
    #[error("Messaging service error: {0}")]
    MessagingService(String),

    /// Document database errors, carrying the collaborator's code when known
    #[error("Backend error: {message}")]
    Backend {
        /// Collaborator error code, for example `db/unavailable`
        code: Option<String>,
        /// Human-readable message
        message: String,
    },

    /// Malformed or rejected user input
    #[error("User input error: {0}")]
    UserInput(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DefenseError {
    /// Stable variant name, recorded in error logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Config(_) => "ConfigError",
            Self::Storage(_) => "StorageError",
            Self::Serialization(_) => "SerializationError",
            Self::Io(_) => "IoError",
            Self::Network(_) => "NetworkError",
            Self::Timeout(_) => "TimeoutError",
            Self::Auth { .. } => "AuthError",
            Self::Validation(_) => "ValidationError",
            Self::RateLimited { .. } => "RateLimitError",
            Self::MediaService(_) => "MediaServiceError",
            Self::MessagingService(_) => "MessagingServiceError",
            Self::Backend { .. } => "BackendError",
            Self::UserInput(_) => "UserInputError",
            Self::Internal(_) => "InternalError",
        }
    }

    /// The collaborator error code carried by this error, when present
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Auth { code, .. } | Self::Backend { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Whether the failure is infrastructure-caused (network or server
    /// class) rather than caller-caused. The rate limiter reverts counted
    /// attempts for these so outages do not consume request budgets.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout(_) | Self::Backend { .. }
        )
    }
}

/// Extracted name/message/code view of an error
///
/// The classifier works on this view instead of the error value itself, so
/// errors surfaced by collaborators can be classified without being wrapped
/// first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Stable error name
    pub name: String,
    /// Full display message
    pub message: String,
    /// Collaborator error code, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorDetail {
    /// Extract the detail view of `error`
    pub fn from_error(error: &DefenseError) -> Self {
        Self {
            name: error.name().to_string(),
            message: error.to_string(),
            code: error.code().map(str::to_string),
        }
    }

    /// Build a detail view from raw parts
    pub fn new<N: Into<String>, M: Into<String>>(name: N, message: M, code: Option<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            code,
        }
    }
}

impl From<&DefenseError> for ErrorDetail {
    fn from(error: &DefenseError) -> Self {
        Self::from_error(error)
    }
}
