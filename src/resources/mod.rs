//! Resource handlers and the storage they run against.

pub mod base;
pub mod content;
pub mod store;

pub use base::{ContentId, DataFields, ResourceBase};
pub use content::register_content;
pub use store::{ContentItem, ContentStore, Fields, InMemoryStore};
