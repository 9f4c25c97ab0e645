//! Helper constructors for specific error types

use super::types::DefenseError;

impl DefenseError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a key-value store error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage(message.into())
    }

    /// Create a network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network(message.into())
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    /// Create an authentication error without a collaborator code
    pub fn auth<S: Into<String>>(message: S) -> Self {
        Self::Auth {
            code: None,
            message: message.into(),
        }
    }

    /// Create an authentication error with a collaborator code
    pub fn auth_with_code<C: Into<String>, S: Into<String>>(code: C, message: S) -> Self {
        Self::Auth {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a media transport error
    pub fn media_service<S: Into<String>>(message: S) -> Self {
        Self::MediaService(message.into())
    }

    /// Create a messaging transport error
    pub fn messaging_service<S: Into<String>>(message: S) -> Self {
        Self::MessagingService(message.into())
    }

    /// Create a document database error without a collaborator code
    pub fn backend<S: Into<String>>(message: S) -> Self {
        Self::Backend {
            code: None,
            message: message.into(),
        }
    }

    /// Create a document database error with a collaborator code
    pub fn backend_with_code<C: Into<String>, S: Into<String>>(code: C, message: S) -> Self {
        Self::Backend {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// Create a user input error
    pub fn user_input<S: Into<String>>(message: S) -> Self {
        Self::UserInput(message.into())
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }
}
