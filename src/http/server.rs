//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router: one fallback route feeding the dispatcher
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Give timeout and body-limit rejections a JSON error body
//! - Bind server to listener and drain on shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderName, HeaderValue, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::DispatcherConfig;
use crate::dispatch::{Dispatcher, Reply};
use crate::error::{ErrorKind, ErrorPayload};
use crate::http::request::{extract, UuidRequestId, X_REQUEST_ID};
use crate::lifecycle::shutdown;
use crate::observability::metrics;

/// Value of the `X-Powered-By` header.
pub const POWERED_BY: &str = concat!("content-dispatch/", env!("CARGO_PKG_VERSION"));

/// Seconds spent producing the response.
pub const X_RUNTIME: &str = "x-runtime";

/// Application state injected into the handler.
#[derive(Clone)]
struct AppState {
    dispatcher: Arc<Dispatcher>,
    max_body_size: usize,
}

/// HTTP front-end for the dispatcher.
pub struct HttpServer {
    router: Router,
    config: DispatcherConfig,
}

impl HttpServer {
    pub fn new(config: DispatcherConfig, dispatcher: Arc<Dispatcher>) -> Self {
        let state = AppState {
            dispatcher,
            max_body_size: config.security.max_body_size,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &DispatcherConfig, state: AppState) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn(transport_error_body))
            .layer(SetResponseHeaderLayer::overriding(
                HeaderName::from_static("x-powered-by"),
                HeaderValue::from_static(POWERED_BY),
            ))
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id, UuidRequestId))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Serve until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::recv(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Every path lands here.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let inbound = extract(request, state.max_body_size).await;

    tracing::debug!(method = %inbound.method, path = %inbound.path, "Dispatching request");

    let reply = state.dispatcher.handle(inbound);
    let mut response = reply.into_response();

    let runtime = format!("{:.6}", start.elapsed().as_secs_f64());
    if let Ok(value) = HeaderValue::from_str(&runtime) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(X_RUNTIME), value);
    }
    response
}

/// Body-limit and timeout rejections get the same payload shape as dispatch
/// errors. Replies the dispatcher rendered itself are already JSON.
async fn transport_error_body(request: Request<Body>, next: Next) -> Response {
    let response = next.run(request).await;

    let (kind, message) = match response.status() {
        StatusCode::PAYLOAD_TOO_LARGE => (
            ErrorKind::InvalidArgument,
            "Request body exceeds the configured limit.",
        ),
        StatusCode::REQUEST_TIMEOUT => (ErrorKind::Internal, "Request timed out."),
        _ => return response,
    };
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if is_json {
        return response;
    }

    let status = response.status();
    tracing::warn!(status = status.as_u16(), "Request rejected before dispatch");
    metrics::record_error(kind);

    let payload = ErrorPayload {
        message: message.to_string(),
        code: status.as_u16(),
        kind,
    };
    Reply::new(status.as_u16(), serde_json::json!(payload)).into_response()
}
