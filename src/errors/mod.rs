//! Error handling module for the Patrol client.
//!
//! Provides the crate error type, stable error codes and the structured
//! validation failures produced by the schema registry.

use std::fmt;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const UNKNOWN_SCHEMA: &str = "UNKNOWN_SCHEMA";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";
    pub const HTTP_ERROR: &str = "HTTP_ERROR";
    pub const API_ERROR: &str = "API_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// A single field that failed its rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All failures collected from one validation pass, in evaluation order.
///
/// Never empty: a pass with no failures returns `Ok(())` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub(crate) fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    /// The first failure; this is the message surfaced to a form.
    pub fn first(&self) -> &ValidationError {
        &self.0[0]
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Failure for a given field, if it failed.
    pub fn for_field(&self, field: &str) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = self.first();
        if self.0.len() == 1 {
            write!(f, "{}", first)
        } else {
            write!(f, "{} (and {} more)", first, self.0.len() - 1)
        }
    }
}

impl std::error::Error for ValidationErrors {}

/// Client error type.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("unknown schema: {0}")]
    UnknownSchema(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Validation(_) => codes::VALIDATION_ERROR,
            ClientError::UnknownSchema(_) => codes::UNKNOWN_SCHEMA,
            ClientError::Storage(_) => codes::STORAGE_ERROR,
            ClientError::Serialization(_) => codes::SERIALIZATION_ERROR,
            ClientError::Http(_) => codes::HTTP_ERROR,
            ClientError::Api { .. } => codes::API_ERROR,
            ClientError::Config(_) => codes::CONFIG_ERROR,
            ClientError::InvalidRequest(_) => codes::INVALID_REQUEST,
        }
    }

    /// HTTP status of a failed API call, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(err) => err.status(),
            _ => None,
        }
    }

    /// Whether repeating the same call may succeed.
    ///
    /// Transport failures, timeouts, throttling and server errors are
    /// transient; client errors and local failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Http(err) => {
                err.is_timeout() || err.is_connect() || err.is_request() || err.is_body()
            }
            ClientError::Api { status, .. } => {
                status.is_server_error()
                    || *status == StatusCode::REQUEST_TIMEOUT
                    || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

impl From<sqlx::Error> for ClientError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Storage error: {:?}", err);
        ClientError::Storage(err.to_string())
    }
}

impl From<ValidationErrors> for ClientError {
    fn from(errors: ValidationErrors) -> Self {
        ClientError::Validation(errors)
    }
}
