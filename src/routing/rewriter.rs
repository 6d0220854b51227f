//! Raw path → canonical resource path.
//!
//! Three stages run in a fixed order, each consuming the previous output:
//!
//! ```text
//! content/22/comments/like.xml?x=1
//!     → strip query, trim slashes        content/22/comments/like.xml
//!     → reorder (first rule that hits)   comments/like.xml      content=22
//!     → action (last segment only)       comments/like.xml      (".xml" blocks it)
//!     → version / format                 comments/like          format=xml
//! ```
//!
//! The action stage runs before the suffix is stripped, so `like.xml` is not
//! an action. Put the suffix on the resource: `content.xml/like`.

use std::collections::BTreeMap;

use regex::Regex;

use crate::config::schema::{DispatchConfig, RouteConfig};
use crate::routing::route::ApiFormat;

/// Side-parameter key holding the extracted action.
pub const ACTION_PARAM: &str = "action";

/// Returns true for `v<digit>` tokens.
pub fn is_version_token(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0] == b'v' && bytes[1].is_ascii_digit()
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// One nested-resource rule from the route map.
#[derive(Debug, Clone)]
pub struct RouteRule {
    pattern: Regex,
    replacement: String,
}

impl RouteRule {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }

    pub fn from_config(route: &RouteConfig) -> Result<Self, regex::Error> {
        Self::new(&route.pattern, route.replacement.clone())
    }

    /// Rewrites the first matched span. Returns `None` when the rule does not
    /// match.
    fn apply(&self, path: &str) -> Option<(String, Option<(String, String)>)> {
        let caps = self.pattern.captures(path)?;
        let whole = caps.get(0)?;

        let mut output = String::with_capacity(path.len());
        output.push_str(&path[..whole.start()]);
        caps.expand(&self.replacement, &mut output);
        output.push_str(&path[whole.end()..]);

        let parent = caps.name("parent").or_else(|| caps.get(1));
        let id = caps.name("id").or_else(|| caps.get(2));
        let side = match (parent, id) {
            (Some(parent), Some(id)) => parent
                .as_str()
                .trim_matches('/')
                .rsplit('/')
                .next()
                .filter(|key| !key.is_empty())
                .map(|key| (key.to_string(), id.as_str().to_string())),
            _ => None,
        };

        Some((output, side))
    }
}

/// Result of rewriting one raw path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub canonical: String,
    pub api_version: String,
    pub api_format: ApiFormat,
    pub action: Option<String>,
    /// Side parameters lifted out of the path, including `action`.
    pub params: BTreeMap<String, String>,
}

/// Ordered route map plus the extraction rules.
#[derive(Debug, Clone)]
pub struct RouteRewriter {
    rules: Vec<RouteRule>,
    actions: Vec<String>,
    default_version: String,
    default_format: ApiFormat,
}

impl RouteRewriter {
    pub fn new(
        rules: Vec<RouteRule>,
        actions: impl IntoIterator<Item = impl AsRef<str>>,
        default_version: impl Into<String>,
        default_format: ApiFormat,
    ) -> Self {
        Self {
            rules,
            actions: actions
                .into_iter()
                .map(|a| a.as_ref().trim().to_ascii_lowercase())
                .filter(|a| !a.is_empty())
                .collect(),
            default_version: default_version.into(),
            default_format,
        }
    }

    pub fn from_config(
        routes: &[RouteConfig],
        dispatch: &DispatchConfig,
    ) -> Result<Self, regex::Error> {
        let rules = routes
            .iter()
            .map(RouteRule::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(
            rules,
            &dispatch.actions,
            dispatch.default_version.clone(),
            dispatch.default_format,
        ))
    }

    /// Run every stage over `raw_path`.
    pub fn rewrite(&self, raw_path: &str) -> Rewritten {
        let path = raw_path.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_matches(|c: char| c == '/' || c == ' ');

        let mut params = BTreeMap::new();

        let (path, side) = self.reorder(path);
        if let Some((key, id)) = side {
            params.insert(key, id);
        }

        let (path, action) = self.extract_action(&path);
        if let Some(action) = &action {
            params.insert(ACTION_PARAM.to_string(), action.clone());
        }

        let (canonical, version, format) = self.extract_version_format(&path);

        Rewritten {
            canonical,
            api_version: version.unwrap_or_else(|| self.default_version.clone()),
            api_format: format.unwrap_or(self.default_format),
            action,
            params,
        }
    }

    /// Stage 1: apply the first matching route rule, once.
    ///
    /// Unmatched paths come back unchanged with no side parameter. The
    /// promoted segment may itself be an action: `content/5/like` becomes
    /// `like` and the action stage then leaves an empty path.
    pub fn reorder(&self, path: &str) -> (String, Option<(String, String)>) {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(path))
            .unwrap_or_else(|| (path.to_string(), None))
    }

    /// Stage 2: lift a trailing action segment into a side parameter.
    pub fn extract_action(&self, path: &str) -> (String, Option<String>) {
        let mut parts: Vec<&str> = segments(path).collect();
        let matched = parts
            .last()
            .and_then(|last| self.actions.iter().find(|a| a.eq_ignore_ascii_case(last)));

        match matched {
            Some(action) => {
                parts.pop();
                (parts.join("/"), Some(action.clone()))
            }
            None => (path.to_string(), None),
        }
    }

    /// Stage 3: leading `v<digit>` and trailing `.json` / `.xml`.
    pub fn extract_version_format(
        &self,
        path: &str,
    ) -> (String, Option<String>, Option<ApiFormat>) {
        let mut parts: Vec<&str> = segments(path).collect();

        let version = match parts.first() {
            Some(first) if is_version_token(first) => Some(parts.remove(0).to_string()),
            _ => None,
        };

        let mut format = None;
        if let Some(last) = parts.last_mut() {
            let segment: &str = *last;
            for candidate in ApiFormat::ALL {
                if let Some(stripped) = segment.strip_suffix(candidate.suffix()) {
                    *last = stripped;
                    format = Some(candidate);
                    break;
                }
            }
        }

        let canonical = parts
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        (canonical, version, format)
    }
}
