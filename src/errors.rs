//! Client Error Types
//!
//! Every failure a service call can surface to the board or login view.

use serde::Deserialize;
use thiserror::Error;

/// One field-level complaint from the backend's validator
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(alias = "defaultMessage")]
    pub message: String,
}

/// Rejected input, either one message or per-field messages
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0}")]
    Message(String),

    #[error("{}", join_fields(.0))]
    Fields(Vec<FieldError>),
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| match &f.field {
            Some(name) => format!("{}: {}", name, f.message),
            None => f.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidCredentials(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No token stored; the request was never sent
    #[error("User not authenticated. Please log in.")]
    NotAuthenticated,

    /// Server answered 401/403; the token has been evicted
    #[error("Authentication failed. Please log in again.")]
    AuthenticationFailed,

    #[error("Error connecting to server: {0}")]
    Transport(String),

    #[error("{message}")]
    OperationFailed { status: Option<u16>, message: String },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(ValidationError::Message(message.into()))
    }

    pub fn operation(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::OperationFailed { status, message: message.into() }
    }

    /// Errors that end the session instead of showing a message
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::AuthenticationFailed)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
