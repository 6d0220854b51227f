//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher::handle
//!     → logging.rs (structured events, pretty or JSON)
//!     → metrics.rs (per-resource counters and latency histogram)
//!
//! HTTP layer
//!     → TraceLayer spans, keyed by x-request-id
//! ```
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level
//! - Metrics are recorded unconditionally; without an installed exporter the
//!   `metrics` macros are no-ops

pub mod logging;
pub mod metrics;
