//! Shared helpers for resource handlers.
//!
//! A concrete handler wraps a [`ResourceBase`] and calls
//! [`ResourceBase::pending_errors`] first thing in `execute`.

use std::sync::Arc;

use serde::Serialize;

use crate::dispatch::{AppContext, HandlerContext, Reply, RequestContext};
use crate::error::{DispatchError, DispatchResult};
use crate::resources::store::Fields;
use crate::routing::ACTION_PARAM;

/// Identifier parsed from the first segment of the sub-route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ContentId {
    /// Empty, missing or `*`: the whole collection.
    Wildcard,
    Id(u64),
}

impl ContentId {
    /// Parse one sub-route. Only the first segment is inspected.
    pub fn parse(route: Option<&str>) -> DispatchResult<Self> {
        let first = route.and_then(|r| r.split('/').next()).unwrap_or("");

        match first {
            "" | "*" => Ok(ContentId::Wildcard),
            token if token.bytes().all(|b| b.is_ascii_digit()) => token
                .parse()
                .map(ContentId::Id)
                .map_err(|_| DispatchError::invalid_argument(format!("Content id `{token}` is out of range."))),
            token if token.starts_with('-') => Err(DispatchError::invalid_argument(format!(
                "Content id `{token}` must not be negative."
            ))),
            token => Err(DispatchError::invalid_argument(format!(
                "Content id `{token}` is not numeric."
            ))),
        }
    }

    pub fn id(self) -> Option<u64> {
        match self {
            ContentId::Wildcard => None,
            ContentId::Id(id) => Some(id),
        }
    }
}

/// Mandatory and optional field names a handler reads from the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataFields {
    pub mandatory: Vec<&'static str>,
    pub optional: Vec<&'static str>,
}

impl DataFields {
    pub fn new(mandatory: &[&'static str], optional: &[&'static str]) -> Self {
        Self {
            mandatory: mandatory.to_vec(),
            optional: optional.to_vec(),
        }
    }
}

/// Request and application context plus the helpers every handler uses.
#[derive(Debug, Clone)]
pub struct ResourceBase {
    resource: String,
    request: RequestContext,
    app: Arc<AppContext>,
}

impl ResourceBase {
    pub fn new(ctx: HandlerContext) -> Self {
        Self {
            resource: ctx.resource,
            request: ctx.request,
            app: ctx.app,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    pub fn app(&self) -> &AppContext {
        &self.app
    }

    /// Errors recorded before the handler ran, as a ready reply.
    pub fn pending_errors(&self) -> Option<Reply> {
        self.request
            .has_errors()
            .then(|| Reply::from_errors(self.request.errors()))
    }

    /// Identifier from the first sub-route segment.
    ///
    /// An empty sub-route falls back to the side parameter named after this
    /// resource, which is where `content/5/like` leaves the `5`.
    pub fn content_id(&self) -> DispatchResult<ContentId> {
        match ContentId::parse(self.request.route())? {
            ContentId::Wildcard if self.request.route().unwrap_or("").is_empty() => {
                ContentId::parse(self.request.get(&self.resource))
            }
            id => Ok(id),
        }
    }

    /// Action lifted out of the path, if any.
    pub fn action(&self) -> Option<&str> {
        self.request.get(ACTION_PARAM).filter(|a| !a.is_empty())
    }

    /// Read every declared field from the request.
    ///
    /// Missing optional fields come back as `None`. A missing mandatory field
    /// is an `InvalidArgument`. Empty strings count as missing.
    pub fn data_fields(&self, fields: &DataFields) -> DispatchResult<Fields> {
        let missing: Vec<&str> = fields
            .mandatory
            .iter()
            .copied()
            .filter(|name| self.field(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(DispatchError::invalid_argument(format!(
                "Missing mandatory fields: {}.",
                missing.join(", ")
            )));
        }

        Ok(fields
            .mandatory
            .iter()
            .chain(fields.optional.iter())
            .map(|name| (name.to_string(), self.field(name).map(str::to_string)))
            .collect())
    }

    fn field(&self, name: &str) -> Option<&str> {
        self.request.get(name).filter(|v| !v.is_empty())
    }
}
