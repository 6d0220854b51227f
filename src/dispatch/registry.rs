//! Handler registry.
//!
//! Maps handler ids to factories. Built and validated once at startup,
//! read-only afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::dispatch::handler::{Handler, HandlerContext};

/// Constructs a handler for one request.
pub type HandlerFactory = Arc<dyn Fn(HandlerContext) -> Box<dyn Handler> + Send + Sync>;

/// Errors raised while building the registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("handler id must not be empty")]
    EmptyId,

    #[error("handler id `{0}` must be alphanumeric")]
    InvalidId(String),

    #[error("handler id `{0}` registered more than once")]
    Duplicate(String),
}

/// Immutable id → factory map.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    factories: HashMap<String, HandlerFactory>,
}

impl HandlerRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn get(&self, id: &str) -> Option<&HandlerFactory> {
        self.factories.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

/// Collects registrations; [`RegistryBuilder::build`] validates them.
#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<(String, HandlerFactory)>,
}

impl RegistryBuilder {
    /// Register a constructor under `id`. Returns `self` for chaining.
    pub fn register<F, H>(mut self, id: impl Into<String>, construct: F) -> Self
    where
        F: Fn(HandlerContext) -> H + Send + Sync + 'static,
        H: Handler + 'static,
    {
        let factory: HandlerFactory =
            Arc::new(move |ctx: HandlerContext| -> Box<dyn Handler> { Box::new(construct(ctx)) });
        self.entries.push((id.into(), factory));
        self
    }

    pub fn build(self) -> Result<HandlerRegistry, RegistryError> {
        let mut factories = HashMap::with_capacity(self.entries.len());
        for (id, factory) in self.entries {
            if id.is_empty() {
                return Err(RegistryError::EmptyId);
            }
            if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(RegistryError::InvalidId(id));
            }
            if factories.contains_key(&id) {
                return Err(RegistryError::Duplicate(id));
            }
            factories.insert(id, factory);
        }
        Ok(HandlerRegistry { factories })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::handler::Reply;
    use crate::error::DispatchResult;

    struct Noop;

    impl Handler for Noop {
        fn execute(self: Box<Self>) -> DispatchResult<Reply> {
            Ok(Reply::no_content())
        }
    }

    #[test]
    fn test_build_and_lookup() {
        let registry = HandlerRegistry::builder()
            .register("ControllerV1JsonPingGet", |_| Noop)
            .register("ControllerV1JsonPingDelete", |_| Noop)
            .build()
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("ControllerV1JsonPingGet"));
        assert!(registry.get("ControllerV1JsonPongGet").is_none());
        assert_eq!(
            registry.ids(),
            vec!["ControllerV1JsonPingDelete", "ControllerV1JsonPingGet"]
        );
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = HandlerRegistry::builder()
            .register("A", |_| Noop)
            .register("A", |_| Noop)
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("A".into()));
    }

    #[test]
    fn test_rejects_malformed_ids() {
        let empty = HandlerRegistry::builder().register("", |_| Noop).build();
        assert_eq!(empty.unwrap_err(), RegistryError::EmptyId);

        let spaced = HandlerRegistry::builder().register("Ping Get", |_| Noop).build();
        assert_eq!(spaced.unwrap_err(), RegistryError::InvalidId("Ping Get".into()));
    }
}
