//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dispatcher.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::routing::ApiFormat;

/// Root configuration for the dispatcher service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request limits.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Route rewriting and handler naming.
    pub dispatch: DispatchConfig,

    /// Resource aliases.
    pub resources: ResourcesConfig,

    /// Ordered nested-resource rewrite rules. First match wins.
    pub routes: Vec<RouteConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request limit configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Route rewriting and controller naming.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// API version used when the path carries none (e.g. "v1").
    pub default_version: String,

    /// Response format used when the path carries no suffix.
    pub default_format: ApiFormat,

    /// Leading part of every handler id.
    pub controller_prefix: String,

    /// Trailing path segments lifted into the `action` parameter.
    pub actions: Vec<String>,

    /// Honour `_method` / `X-HTTP-Method-Override` on POST requests.
    pub method_in_post_request: bool,

    /// Resource used when the canonical path is empty.
    pub default_resource: Option<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_version: "v1".to_string(),
            default_format: ApiFormat::Json,
            controller_prefix: "Controller".to_string(),
            actions: vec!["like".to_string(), "count".to_string(), "hit".to_string()],
            method_in_post_request: true,
            default_resource: None,
        }
    }
}

/// Resource naming.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ResourcesConfig {
    /// Public path segment → logical resource name.
    pub aliases: BTreeMap<String, String>,
}

/// A nested-resource rewrite rule.
///
/// The pattern should expose the parent name and id as the named groups
/// `parent` and `id` (positional groups 1 and 2 are used otherwise).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// Regular expression matched against the trimmed path.
    pub pattern: String,

    /// Replacement template for the matched span (e.g. "$resource").
    pub replacement: String,
}

impl RouteConfig {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    /// `<parent>/<numeric id>/<subresource>` → `<subresource>`.
    ///
    /// Only whole segments match. `head` and `tail` capture the surrounding
    /// separator so text outside the match keeps its slashes and suffix.
    pub fn nested_resource() -> Self {
        Self::new(
            r"(?P<head>^|/)(?P<parent>\w+)/(?P<id>\d+)/(?P<resource>\w+)(?P<tail>[/.]|$)",
            "${head}${resource}${tail}",
        )
    }
}

impl DispatcherConfig {
    /// Effective route rules, falling back to the nested-resource rule when
    /// none are configured.
    pub fn route_rules(&self) -> Vec<RouteConfig> {
        if self.routes.is_empty() {
            vec![RouteConfig::nested_resource()]
        } else {
            self.routes.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: DispatcherConfig = toml::from_str("").unwrap();
        assert_eq!(config.dispatch.default_version, "v1");
        assert_eq!(config.dispatch.default_format, ApiFormat::Json);
        assert_eq!(config.dispatch.actions, vec!["like", "count", "hit"]);
        assert_eq!(config.route_rules(), vec![RouteConfig::nested_resource()]);
    }

    #[test]
    fn test_full_config_parses() {
        let raw = r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [dispatch]
            default_version = "v2"
            default_format = "xml"
            controller_prefix = "WebService"
            actions = ["like"]
            default_resource = "content"

            [resources.aliases]
            articles = "content"

            [[routes]]
            pattern = '(?P<parent>\w+)/(?P<id>\d+)/(?P<resource>\w+)'
            replacement = "$resource"
        "#;
        let config: DispatcherConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.dispatch.default_format, ApiFormat::Xml);
        assert_eq!(config.dispatch.default_resource.as_deref(), Some("content"));
        assert_eq!(config.resources.aliases["articles"], "content");
        assert_eq!(config.routes.len(), 1);
    }
}
