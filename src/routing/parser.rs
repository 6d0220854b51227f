//! Canonical path → (resource name, remaining sub-route).

use std::collections::HashMap;

use crate::error::{DispatchError, DispatchResult};

/// Splits a canonical path into the resource name and the local sub-route.
#[derive(Debug, Clone, Default)]
pub struct RouteParser {
    aliases: HashMap<String, String>,
    default_resource: Option<String>,
}

impl RouteParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a public segment onto a logical resource name.
    pub fn with_alias(mut self, segment: impl Into<String>, resource: impl Into<String>) -> Self {
        self.aliases.insert(segment.into(), resource.into());
        self
    }

    pub fn with_aliases<I, K, V>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.aliases
            .extend(aliases.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Resource used for an empty canonical path.
    pub fn with_default_resource(mut self, resource: Option<String>) -> Self {
        self.default_resource = resource.filter(|r| !r.is_empty());
        self
    }

    /// First segment names the resource; the rest is handed to the handler.
    pub fn parse(&self, canonical: &str) -> DispatchResult<(String, String)> {
        let mut parts = canonical.split('/').filter(|s| !s.is_empty());

        let Some(first) = parts.next() else {
            return self
                .default_resource
                .clone()
                .map(|resource| (resource, String::new()))
                .ok_or_else(|| DispatchError::not_found("Unable to handle request for route ``."));
        };

        let resource = self
            .aliases
            .get(first)
            .cloned()
            .unwrap_or_else(|| first.to_string());
        let remaining = parts.collect::<Vec<_>>().join("/");

        Ok((resource, remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_first_segment_is_resource() {
        let parser = RouteParser::new();
        assert_eq!(
            parser.parse("content/22/user").unwrap(),
            ("content".to_string(), "22/user".to_string())
        );
        assert_eq!(
            parser.parse("content").unwrap(),
            ("content".to_string(), String::new())
        );
    }

    #[test]
    fn test_empty_segments_ignored() {
        let parser = RouteParser::new();
        assert_eq!(
            parser.parse("/content//22/").unwrap(),
            ("content".to_string(), "22".to_string())
        );
    }

    #[test]
    fn test_empty_path_without_default_is_not_found() {
        let err = RouteParser::new().parse("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_empty_path_uses_default_resource() {
        let parser = RouteParser::new().with_default_resource(Some("content".into()));
        assert_eq!(
            parser.parse("").unwrap(),
            ("content".to_string(), String::new())
        );
    }

    #[test]
    fn test_alias_maps_segment() {
        let parser = RouteParser::new().with_alias("articles", "content");
        assert_eq!(parser.parse("articles/5").unwrap().0, "content");
        assert_eq!(parser.parse("comments/5").unwrap().0, "comments");
    }
}
