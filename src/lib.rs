//! REST request dispatcher for a content web service.
//!
//! A raw request path such as `/v2/content/22/comments.xml` is rewritten into a
//! canonical route, resolved to a registered handler by naming convention
//! (`ControllerV2XmlCommentsGet`) and executed with a per-request context.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resources;
pub mod routing;

pub use config::schema::DispatcherConfig;
pub use dispatch::{Dispatcher, HandlerRegistry, InboundRequest, Reply};
pub use error::{DispatchError, DispatchResult, ErrorKind, ErrorPayload};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
