//! The handler capability and the reply it produces.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::dispatch::context::{AppContext, RequestContext};
use crate::error::{DispatchError, DispatchResult, ErrorKind, ErrorPayload};
use crate::routing::ApiFormat;

/// A unit of business logic, invoked once per request.
pub trait Handler: Send {
    fn execute(self: Box<Self>) -> DispatchResult<Reply>;
}

/// Everything a handler is constructed with.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    pub resource: String,
    pub request: RequestContext,
    pub app: Arc<AppContext>,
}

/// Client-visible result of a dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
    pub format: ApiFormat,
    /// Set when the reply was built from an error, whoever produced it.
    pub error_kind: Option<ErrorKind>,
}

impl Reply {
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            format: ApiFormat::Json,
            error_kind: None,
        }
    }

    pub fn ok(body: impl Serialize) -> DispatchResult<Self> {
        Ok(Self::new(200, to_value(body)?))
    }

    pub fn created(body: impl Serialize) -> DispatchResult<Self> {
        Ok(Self::new(201, to_value(body)?))
    }

    pub fn no_content() -> Self {
        Self::new(204, Value::Null)
    }

    /// Single error payload, status taken from its classification.
    pub fn from_error(err: &DispatchError) -> Self {
        let payload = err.to_payload();
        let status = payload.code;
        let kind = payload.kind;
        Self {
            error_kind: Some(kind),
            ..Self::new(status, serde_json::json!(payload))
        }
    }

    /// Accumulated errors, emitted as a list. Status follows the first.
    pub fn from_errors(errors: &[ErrorPayload]) -> Self {
        let status = errors.first().map_or(500, |e| e.code);
        Self {
            error_kind: Some(errors.first().map_or(ErrorKind::Internal, |e| e.kind)),
            ..Self::new(status, serde_json::json!(errors))
        }
    }

    pub fn with_format(mut self, format: ApiFormat) -> Self {
        self.format = format;
        self
    }

    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

fn to_value(body: impl Serialize) -> DispatchResult<Value> {
    serde_json::to_value(body)
        .map_err(|e| DispatchError::internal(format!("failed to encode reply: {e}")))
}
