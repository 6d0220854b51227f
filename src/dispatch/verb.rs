//! REST verbs, handler suffixes and method override.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{DispatchError, DispatchResult};

/// Request field carrying a tunnelled method.
pub const METHOD_FIELD: &str = "_method";

/// Header carrying a tunnelled method.
pub const METHOD_OVERRIDE_HEADER: &str = "x-http-method-override";

/// HTTP verbs the dispatcher can route.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RestVerb {
    Get,
    Head,
    Options,
    Post,
    Put,
    Patch,
    Delete,
}

impl RestVerb {
    /// Returns the uppercase wire representation (e.g. `"GET"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Handler id suffix. PUT and PATCH share `Update`.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Get => "Get",
            Self::Head => "Head",
            Self::Options => "Options",
            Self::Post => "Create",
            Self::Put | Self::Patch => "Update",
            Self::Delete => "Delete",
        }
    }

    /// Transport method → verb. Anything outside the closed set is a 404.
    pub fn from_method(method: &str) -> DispatchResult<Self> {
        method.parse().map_err(|_| {
            DispatchError::not_found(format!("Unable to support the HTTP method `{method}`."))
        })
    }

    /// Resolve the verb the handler should see.
    ///
    /// Only POST can be overridden, and only when `allow_override` is set.
    /// The `_method` field wins over the override header. An unknown
    /// override value leaves the request as POST.
    pub fn effective(
        method: &str,
        field: Option<&str>,
        header: Option<&str>,
        allow_override: bool,
    ) -> DispatchResult<Self> {
        let verb = Self::from_method(method)?;
        if verb != Self::Post || !allow_override {
            return Ok(verb);
        }

        let requested = field
            .filter(|v| !v.trim().is_empty())
            .or(header.filter(|v| !v.trim().is_empty()));

        Ok(requested
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(verb))
    }
}

/// Case-insensitive parse, so `_method=delete` works.
impl FromStr for RestVerb {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            _ => Err(()),
        }
    }
}

impl fmt::Display for RestVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
