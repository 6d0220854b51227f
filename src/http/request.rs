//! Turning an HTTP request into an [`InboundRequest`].
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4)
//! - Merge query, form and JSON parameters (later sources win)
//! - Record undecodable bodies as request errors instead of failing early

use axum::body::{self, Body};
use axum::http::{header, HeaderMap, HeaderValue, Request};
use serde_json::Value;
use tower_http::request_id::{MakeRequestId, RequestId};
use url::form_urlencoded;
use uuid::Uuid;

use crate::dispatch::InboundRequest;
use crate::error::{ErrorKind, ErrorPayload};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a fresh UUID v4 for requests that arrive without an ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Body encodings parameters are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Form,
    Json,
    Other,
}

fn body_kind(headers: &HeaderMap) -> BodyKind {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase());

    match content_type.as_deref() {
        None => BodyKind::Form,
        Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => BodyKind::Form,
        Some(ct) if ct.starts_with("application/json") => BodyKind::Json,
        Some(_) => BodyKind::Other,
    }
}

/// Read method, path, headers and parameters from `request`.
///
/// The body is read up to `max_body` bytes.
pub async fn extract(request: Request<Body>, max_body: usize) -> InboundRequest {
    let (parts, body) = request.into_parts();

    let mut inbound = InboundRequest::new(parts.method.as_str(), parts.uri.path());
    inbound.headers = parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    if let Some(query) = parts.uri.query() {
        inbound
            .params
            .extend(form_urlencoded::parse(query.as_bytes()).into_owned());
    }

    let bytes = match body::to_bytes(body, max_body).await {
        Ok(bytes) => bytes,
        Err(e) => {
            inbound.errors.push(ErrorPayload::new(
                ErrorKind::InvalidArgument,
                format!("Unable to read request body: {e}"),
            ));
            return inbound;
        }
    };
    if bytes.is_empty() {
        return inbound;
    }

    match body_kind(&parts.headers) {
        BodyKind::Form => {
            inbound
                .params
                .extend(form_urlencoded::parse(&bytes).into_owned());
        }
        BodyKind::Json => match json_params(&bytes) {
            Some(params) => inbound.params.extend(params),
            None => inbound.errors.push(ErrorPayload::new(
                ErrorKind::InvalidArgument,
                "Request body is not a JSON object.",
            )),
        },
        BodyKind::Other => {
            tracing::debug!(path = %inbound.path, "Ignoring body with unsupported content type");
        }
    }

    inbound
}

/// Top-level members of a JSON object, scalars stringified.
fn json_params(bytes: &[u8]) -> Option<Vec<(String, String)>> {
    let Value::Object(map) = serde_json::from_slice::<Value>(bytes).ok()? else {
        return None;
    };

    Some(
        map.into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: &str, uri: &str, content_type: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_query_parameters() {
        let inbound = extract(request("GET", "/content?id=5&q=a%20b", None, ""), 1024).await;
        assert_eq!(inbound.method, "GET");
        assert_eq!(inbound.path, "/content");
        assert_eq!(inbound.params["id"], "5");
        assert_eq!(inbound.params["q"], "a b");
        assert!(inbound.errors.is_empty());
    }

    #[tokio::test]
    async fn test_form_body_overrides_query() {
        let inbound = extract(
            request(
                "POST",
                "/content?title=old",
                Some("application/x-www-form-urlencoded"),
                "title=new&_method=PUT",
            ),
            1024,
        )
        .await;
        assert_eq!(inbound.params["title"], "new");
        assert_eq!(inbound.params["_method"], "PUT");
    }

    #[tokio::test]
    async fn test_json_body_stringifies_scalars() {
        let inbound = extract(
            request(
                "POST",
                "/content",
                Some("application/json"),
                r#"{"title":"t","views":3,"draft":false,"body":null}"#,
            ),
            1024,
        )
        .await;
        assert_eq!(inbound.params["title"], "t");
        assert_eq!(inbound.params["views"], "3");
        assert_eq!(inbound.params["draft"], "false");
        assert_eq!(inbound.params["body"], "");
    }

    #[tokio::test]
    async fn test_bad_json_is_recorded() {
        let inbound = extract(request("POST", "/content", Some("application/json"), "[1,2"), 1024).await;
        assert_eq!(inbound.errors.len(), 1);
        assert_eq!(inbound.errors[0].kind, ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_oversized_body_is_recorded() {
        let inbound = extract(request("POST", "/content", None, "title=abcdefgh"), 4).await;
        assert_eq!(inbound.errors.len(), 1);
        assert_eq!(inbound.errors[0].code, 400);
    }

    #[test]
    fn test_request_id_is_uuid() {
        let req = Request::builder().body(()).unwrap();
        let id = UuidRequestId.make_request_id(&req).unwrap();
        let text = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(text).is_ok());
    }
}
