//! Per-request and per-process context handed to handlers.

use std::collections::HashMap;
use std::sync::Arc;

use crate::dispatch::verb::RestVerb;
use crate::error::ErrorPayload;
use crate::resources::store::{ContentStore, InMemoryStore};

/// Reserved parameter holding the sub-route left after the resource name.
pub const ROUTE_PARAM: &str = "@route";

/// String parameters, method and path of a single request.
///
/// Owned by exactly one request; never shared.
#[derive(Debug, Clone)]
pub struct RequestContext {
    verb: RestVerb,
    original_method: String,
    path: String,
    params: HashMap<String, String>,
    errors: Vec<ErrorPayload>,
}

impl RequestContext {
    pub fn new(verb: RestVerb, path: impl Into<String>) -> Self {
        Self {
            verb,
            original_method: verb.as_str().to_string(),
            path: path.into(),
            params: HashMap::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    /// Method as received, before any override was applied.
    pub fn with_original_method(mut self, method: impl Into<String>) -> Self {
        self.original_method = method.into();
        self
    }

    pub fn with_errors(mut self, errors: Vec<ErrorPayload>) -> Self {
        self.errors = errors;
        self
    }

    /// Effective verb, after any method override.
    pub fn verb(&self) -> RestVerb {
        self.verb
    }

    /// Transport method. Equals [`verb`](Self::verb) unless overridden.
    pub fn original_method(&self) -> &str {
        &self.original_method
    }

    /// Path as received from the transport.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Sub-route stored under [`ROUTE_PARAM`].
    pub fn route(&self) -> Option<&str> {
        self.get(ROUTE_PARAM)
    }

    pub fn push_error(&mut self, error: ErrorPayload) {
        self.errors.push(error);
    }

    /// Errors accumulated before the handler ran.
    pub fn errors(&self) -> &[ErrorPayload] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Process-wide collaborators, passed explicitly to every handler.
#[derive(Clone)]
pub struct AppContext {
    store: Arc<dyn ContentStore>,
}

impl AppContext {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Context backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    pub fn store(&self) -> &dyn ContentStore {
        self.store.as_ref()
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_method_defaults_to_verb() {
        let request = RequestContext::new(RestVerb::Delete, "/content/3");
        assert_eq!(request.original_method(), "DELETE");

        let request = request.with_original_method("POST");
        assert_eq!(request.verb(), RestVerb::Delete);
        assert_eq!(request.original_method(), "POST");
    }
}
