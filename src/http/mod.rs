//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, parameters → InboundRequest)
//!     → Dispatcher::handle
//!     → response.rs (Reply → status, Content-Type, body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{extract, UuidRequestId, X_REQUEST_ID};
pub use response::to_xml;
pub use server::{HttpServer, POWERED_BY, X_RUNTIME};
