//! Dispatch error types.
//!
//! Every pipeline stage returns [`DispatchError`]. The dispatcher is the only
//! place that turns one into an [`ErrorPayload`] for the client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used by the pipeline and by handlers.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Classification of a dispatch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No resource, route or handler matched.
    NotFound,
    /// Malformed identifier or missing mandatory field.
    InvalidArgument,
    /// A collaborator failed unexpectedly.
    Internal,
}

impl ErrorKind {
    /// HTTP status classification for this kind.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::InvalidArgument => 400,
            ErrorKind::Internal => 500,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::Internal => "internal",
        }
    }
}

/// Errors raised by the rewrite → parse → resolve → execute pipeline.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Internal(String),
}

impl DispatchError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::NotFound(_) => ErrorKind::NotFound,
            DispatchError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            DispatchError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Converts the error into the client-facing payload.
    ///
    /// Internal failures never leak their message.
    pub fn to_payload(&self) -> ErrorPayload {
        let kind = self.kind();
        let message = match self {
            DispatchError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        ErrorPayload {
            message,
            code: kind.status_code(),
            kind,
        }
    }
}

/// Structured error object sent to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
    pub code: u16,
    pub kind: ErrorKind,
}

impl ErrorPayload {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: kind.status_code(),
            kind,
        }
    }
}

impl From<DispatchError> for ErrorPayload {
    fn from(err: DispatchError) -> Self {
        err.to_payload()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(DispatchError::not_found("x").to_payload().code, 404);
        assert_eq!(DispatchError::invalid_argument("x").to_payload().code, 400);
        assert_eq!(DispatchError::internal("x").to_payload().code, 500);
    }

    #[test]
    fn test_internal_message_is_hidden() {
        let payload = DispatchError::internal("db password rejected").to_payload();
        assert_eq!(payload.kind, ErrorKind::Internal);
        assert!(!payload.message.contains("password"));
    }

    #[test]
    fn test_payload_serializes_kind_in_snake_case() {
        let payload = ErrorPayload::new(ErrorKind::InvalidArgument, "bad id");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["kind"], "invalid_argument");
        assert_eq!(json["code"], 400);
        assert_eq!(json["message"], "bad id");
    }
}
