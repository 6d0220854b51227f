//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (resolve path, parse & deserialize)
//!     → validation.rs (semantic checks, route pattern compilation)
//!     → DispatcherConfig (validated, immutable)
//!     → Dispatcher::from_config builds the route map and parser
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the route map never changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, resolve_config_path, ConfigError};
pub use schema::DispatcherConfig;
pub use schema::DispatchConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::RouteConfig;
