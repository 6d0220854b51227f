//! Controller resolution: (resource, version, format, verb) → handler.

use std::sync::Arc;

use crate::dispatch::context::{AppContext, RequestContext};
use crate::dispatch::handler::{Handler, HandlerContext};
use crate::dispatch::registry::HandlerRegistry;
use crate::dispatch::verb::RestVerb;
use crate::error::{DispatchError, DispatchResult};
use crate::routing::ApiFormat;

/// Upper-cases the first letter of every `_`/`-` separated word and drops
/// the separators: `content_type` → `ContentType`.
pub fn title_case(input: &str) -> String {
    input
        .split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// `<prefix><Version><Format><Resource><Suffix>`, e.g.
/// `ControllerV1JsonContentGet`.
pub fn handler_id(
    prefix: &str,
    resource: &str,
    version: &str,
    format: ApiFormat,
    verb: RestVerb,
) -> String {
    format!(
        "{prefix}{}{}{}{}",
        title_case(version),
        format.title(),
        title_case(resource),
        verb.suffix()
    )
}

/// Looks handlers up by derived id and instantiates them.
#[derive(Debug, Clone)]
pub struct ControllerResolver {
    prefix: String,
    registry: Arc<HandlerRegistry>,
}

impl ControllerResolver {
    pub fn new(prefix: impl Into<String>, registry: Arc<HandlerRegistry>) -> Self {
        Self {
            prefix: prefix.into(),
            registry,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn handler_id(
        &self,
        resource: &str,
        version: &str,
        format: ApiFormat,
        verb: RestVerb,
    ) -> String {
        handler_id(&self.prefix, resource, version, format, verb)
    }

    /// Instantiate the handler for `id`, or fail with `NotFound`.
    pub fn resolve(
        &self,
        id: &str,
        resource: &str,
        request: RequestContext,
        app: Arc<AppContext>,
    ) -> DispatchResult<Box<dyn Handler>> {
        let factory = self
            .registry
            .get(id)
            .ok_or_else(|| DispatchError::not_found(format!("Unable to locate controller `{id}`.")))?;

        Ok(factory(HandlerContext {
            resource: resource.to_string(),
            request,
            app,
        }))
    }
}
