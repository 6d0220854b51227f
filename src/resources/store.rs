//! Content storage collaborator.
//!
//! Handlers reach storage only through [`AppContext`](crate::dispatch::AppContext).
//! The in-memory store is what the service ships with; anything implementing
//! [`ContentStore`] can replace it.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::DispatchResult;

/// Named fields of one content item. `None` serializes as `null`.
pub type Fields = BTreeMap<String, Option<String>>;

/// A stored content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub content_id: u64,
    #[serde(flatten)]
    pub fields: Fields,
}

/// Data-access operations the content handlers need.
pub trait ContentStore: Send + Sync {
    fn list(&self) -> DispatchResult<Vec<ContentItem>>;

    fn get(&self, id: u64) -> DispatchResult<Option<ContentItem>>;

    fn insert(&self, fields: Fields) -> DispatchResult<ContentItem>;

    /// Overwrites only the fields present in `fields`.
    fn update(&self, id: u64, fields: Fields) -> DispatchResult<Option<ContentItem>>;

    fn remove(&self, id: u64) -> DispatchResult<bool>;

    fn count(&self) -> DispatchResult<usize>;
}

/// Thread-safe store backed by a `DashMap`.
#[derive(Debug)]
pub struct InMemoryStore {
    items: DashMap<u64, ContentItem>,
    next_id: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStore for InMemoryStore {
    fn list(&self) -> DispatchResult<Vec<ContentItem>> {
        let mut items: Vec<ContentItem> = self.items.iter().map(|r| r.value().clone()).collect();
        items.sort_by_key(|item| item.content_id);
        Ok(items)
    }

    fn get(&self, id: u64) -> DispatchResult<Option<ContentItem>> {
        Ok(self.items.get(&id).map(|r| r.value().clone()))
    }

    fn insert(&self, fields: Fields) -> DispatchResult<ContentItem> {
        let content_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let item = ContentItem { content_id, fields };
        self.items.insert(content_id, item.clone());
        Ok(item)
    }

    fn update(&self, id: u64, fields: Fields) -> DispatchResult<Option<ContentItem>> {
        Ok(self.items.get_mut(&id).map(|mut entry| {
            for (key, value) in fields {
                if value.is_some() {
                    entry.fields.insert(key, value);
                }
            }
            entry.clone()
        }))
    }

    fn remove(&self, id: u64) -> DispatchResult<bool> {
        Ok(self.items.remove(&id).is_some())
    }

    fn count(&self) -> DispatchResult<usize> {
        Ok(self.items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, Option<&str>)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let store = InMemoryStore::new();
        let a = store.insert(fields(&[("title", Some("a"))])).unwrap();
        let b = store.insert(fields(&[("title", Some("b"))])).unwrap();
        assert_eq!(a.content_id, 1);
        assert_eq!(b.content_id, 2);
        assert_eq!(store.count().unwrap(), 2);
        assert_eq!(store.list().unwrap(), vec![a, b]);
    }

    #[test]
    fn test_update_skips_unsupplied_fields() {
        let store = InMemoryStore::new();
        let item = store
            .insert(fields(&[("title", Some("a")), ("body", Some("text"))]))
            .unwrap();

        let updated = store
            .update(item.content_id, fields(&[("title", Some("b")), ("body", None)]))
            .unwrap()
            .unwrap();
        assert_eq!(updated.fields["title"].as_deref(), Some("b"));
        assert_eq!(updated.fields["body"].as_deref(), Some("text"));

        assert_eq!(store.update(99, Fields::new()).unwrap(), None);
    }

    #[test]
    fn test_remove() {
        let store = InMemoryStore::new();
        let item = store.insert(Fields::new()).unwrap();
        assert!(store.remove(item.content_id).unwrap());
        assert!(!store.remove(item.content_id).unwrap());
        assert_eq!(store.get(item.content_id).unwrap(), None);
    }

    #[test]
    fn test_serializes_flat() {
        let item = ContentItem {
            content_id: 4,
            fields: fields(&[("title", Some("t")), ("body", None)]),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json, serde_json::json!({ "content_id": 4, "title": "t", "body": null }));
    }
}
