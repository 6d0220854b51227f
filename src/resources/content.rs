//! Demo `content` resource: one handler per verb, all `v1`/`json`.

use serde_json::json;

use crate::dispatch::{handler_id, Handler, HandlerContext, RegistryBuilder, Reply, RestVerb};
use crate::error::{DispatchError, DispatchResult};
use crate::resources::base::{ContentId, DataFields, ResourceBase};
use crate::routing::ApiFormat;

const RESOURCE: &str = "content";
const VERSION: &str = "v1";

/// Count action understood by [`ContentGet`].
const COUNT_ACTION: &str = "count";

fn content_fields() -> DataFields {
    DataFields::new(&["title"], &["body", "type"])
}

fn not_found(id: u64) -> DispatchError {
    DispatchError::not_found(format!("Content `{id}` does not exist."))
}

fn require_id(base: &ResourceBase) -> DispatchResult<u64> {
    base.content_id()?
        .id()
        .ok_or_else(|| DispatchError::invalid_argument("A content id is required."))
}

/// Add the four content handlers under `prefix`.
pub fn register_content(builder: RegistryBuilder, prefix: &str) -> RegistryBuilder {
    let id = |verb| handler_id(prefix, RESOURCE, VERSION, ApiFormat::Json, verb);
    builder
        .register(id(RestVerb::Get), ContentGet::new)
        .register(id(RestVerb::Post), ContentCreate::new)
        .register(id(RestVerb::Put), ContentUpdate::new)
        .register(id(RestVerb::Delete), ContentDelete::new)
}

/// List, count, or fetch one item.
#[derive(Debug)]
pub struct ContentGet {
    base: ResourceBase,
}

impl ContentGet {
    pub fn new(ctx: HandlerContext) -> Self {
        Self { base: ResourceBase::new(ctx) }
    }
}

impl Handler for ContentGet {
    fn execute(self: Box<Self>) -> DispatchResult<Reply> {
        if let Some(reply) = self.base.pending_errors() {
            return Ok(reply);
        }
        let store = self.base.app().store();

        match self.base.content_id()? {
            ContentId::Wildcard if self.base.action() == Some(COUNT_ACTION) => {
                Reply::ok(json!({ "count": store.count()? }))
            }
            ContentId::Wildcard => {
                let items = store.list()?;
                Reply::ok(json!({ "count": items.len(), "data": items }))
            }
            ContentId::Id(id) => match store.get(id)? {
                Some(item) => Reply::ok(item),
                None => Err(not_found(id)),
            },
        }
    }
}

#[derive(Debug)]
pub struct ContentCreate {
    base: ResourceBase,
}

impl ContentCreate {
    pub fn new(ctx: HandlerContext) -> Self {
        Self { base: ResourceBase::new(ctx) }
    }
}

impl Handler for ContentCreate {
    fn execute(self: Box<Self>) -> DispatchResult<Reply> {
        if let Some(reply) = self.base.pending_errors() {
            return Ok(reply);
        }

        let fields = self.base.data_fields(&content_fields())?;
        let item = self.base.app().store().insert(fields)?;
        tracing::debug!(content_id = item.content_id, "Content created");
        Reply::created(item)
    }
}

/// Updates supplied fields, or records an action (`like`, `hit`) on an item.
#[derive(Debug)]
pub struct ContentUpdate {
    base: ResourceBase,
}

impl ContentUpdate {
    pub fn new(ctx: HandlerContext) -> Self {
        Self { base: ResourceBase::new(ctx) }
    }
}

impl Handler for ContentUpdate {
    fn execute(self: Box<Self>) -> DispatchResult<Reply> {
        if let Some(reply) = self.base.pending_errors() {
            return Ok(reply);
        }
        let id = require_id(&self.base)?;
        let store = self.base.app().store();

        if let Some(action) = self.base.action() {
            if store.get(id)?.is_none() {
                return Err(not_found(id));
            }
            return Reply::ok(json!({ "content_id": id, "action": action }));
        }

        let declared = content_fields();
        let all_optional = DataFields::new(
            &[],
            &[declared.mandatory.as_slice(), declared.optional.as_slice()].concat(),
        );
        let fields = self.base.data_fields(&all_optional)?;
        match store.update(id, fields)? {
            Some(item) => Reply::ok(item),
            None => Err(not_found(id)),
        }
    }
}

#[derive(Debug)]
pub struct ContentDelete {
    base: ResourceBase,
}

impl ContentDelete {
    pub fn new(ctx: HandlerContext) -> Self {
        Self { base: ResourceBase::new(ctx) }
    }
}

impl Handler for ContentDelete {
    fn execute(self: Box<Self>) -> DispatchResult<Reply> {
        if let Some(reply) = self.base.pending_errors() {
            return Ok(reply);
        }
        let id = require_id(&self.base)?;

        if self.base.app().store().remove(id)? {
            Ok(Reply::no_content())
        } else {
            Err(not_found(id))
        }
    }
}
