//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Raw path ("/v1/content/22/comments.json?x=1")
//!     → rewriter.rs (reorder nested resources, lift action, version, format)
//!     → parser.rs (resource name + remaining sub-route)
//!     → route.rs ParsedRoute handed to the dispatcher
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → Compile regex patterns in declaration order
//!     → Freeze as immutable RouteRewriter
//! ```
//!
//! # Design Decisions
//! - Route map compiled at startup, immutable at runtime
//! - Deterministic: same input always rewrites the same way
//! - First match wins (declaration order), no recursion

pub mod parser;
pub mod rewriter;
pub mod route;

pub use parser::RouteParser;
pub use rewriter::{RouteRewriter, RouteRule, Rewritten, ACTION_PARAM};
pub use route::{ApiFormat, ParsedRoute};
