//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile route patterns and check their capture groups
//! - Validate value ranges (timeouts > 0, version token shape)
//! - Detect duplicate actions
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DispatcherConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use regex::Regex;
use thiserror::Error;

use crate::config::schema::DispatcherConfig;
use crate::routing::rewriter::is_version_token;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    RequestTimeout,

    #[error("dispatch.default_version `{0}` must look like v<digit>")]
    DefaultVersion(String),

    #[error("dispatch.controller_prefix must be alphanumeric and non-empty")]
    ControllerPrefix,

    #[error("dispatch.actions contains an empty entry")]
    EmptyAction,

    #[error("dispatch.actions contains `{0}` more than once")]
    DuplicateAction(String),

    #[error("routes[{index}] pattern does not compile: {reason}")]
    Pattern { index: usize, reason: String },

    #[error("routes[{index}] pattern needs `parent` and `id` groups or at least two positional groups")]
    PatternGroups { index: usize },

    #[error("resources.aliases maps `{0}` to an empty name")]
    EmptyAlias(String),
}

/// Validate a parsed configuration, collecting every problem.
pub fn validate_config(config: &DispatcherConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }

    let dispatch = &config.dispatch;
    if !is_version_token(&dispatch.default_version) {
        errors.push(ValidationError::DefaultVersion(dispatch.default_version.clone()));
    }

    if dispatch.controller_prefix.is_empty()
        || !dispatch.controller_prefix.chars().all(|c| c.is_ascii_alphanumeric())
    {
        errors.push(ValidationError::ControllerPrefix);
    }

    let mut seen = HashSet::new();
    for action in &dispatch.actions {
        let action = action.trim().to_ascii_lowercase();
        if action.is_empty() {
            errors.push(ValidationError::EmptyAction);
        } else if !seen.insert(action.clone()) {
            errors.push(ValidationError::DuplicateAction(action));
        }
    }

    for (index, route) in config.routes.iter().enumerate() {
        match Regex::new(&route.pattern) {
            Ok(re) => {
                let named = re.capture_names().flatten().collect::<HashSet<_>>();
                let has_named = named.contains("parent") && named.contains("id");
                // captures_len includes the implicit whole-match group
                if !has_named && re.captures_len() < 3 {
                    errors.push(ValidationError::PatternGroups { index });
                }
            }
            Err(e) => errors.push(ValidationError::Pattern {
                index,
                reason: e.to_string(),
            }),
        }
    }

    for (alias, target) in &config.resources.aliases {
        if target.trim().is_empty() {
            errors.push(ValidationError::EmptyAlias(alias.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
