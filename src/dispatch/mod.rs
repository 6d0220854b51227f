//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest (method, path, params, headers)
//!     → verb.rs (method override on POST)
//!     → routing (rewrite + parse)
//!     → resolver.rs (handler id, registry lookup, instantiate)
//!     → handler.rs Handler::execute
//!     → Reply (or DispatchError, converted by Dispatcher::handle)
//! ```
//!
//! # Design Decisions
//! - Registry built and validated at startup, read-only afterwards
//! - Collaborators reach handlers through AppContext, never globals
//! - Each stage returns a typed error; the dispatcher is the only recovery point

pub mod context;
pub mod dispatcher;
pub mod handler;
pub mod registry;
pub mod resolver;
pub mod verb;

pub use context::{AppContext, RequestContext, ROUTE_PARAM};
pub use dispatcher::{Dispatcher, InboundRequest, Plan, SUPPRESS_RESPONSE_CODES};
pub use handler::{Handler, HandlerContext, Reply};
pub use registry::{HandlerFactory, HandlerRegistry, RegistryBuilder, RegistryError};
pub use resolver::{handler_id, title_case, ControllerResolver};
pub use verb::{RestVerb, METHOD_FIELD, METHOD_OVERRIDE_HEADER};
