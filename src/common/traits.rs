//! Core traits and types for the metadata cache
//!
//! `ResourceHandler` is the extension point a metadata kind implements so
//! the generic `ResponseManager` can page through its collection.

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;

/// A cache-resident metadata entity keyed by guid
pub trait Metadata: Send + Sync + 'static {
    fn guid(&self) -> &str;
    fn name(&self) -> &str;
}

/// Hooks called by `ResponseManager` while traversing a paginated collection
///
/// The response and resource wire types are fixed per kind at compile time.
pub trait ResourceHandler: Send + Sync + 'static {
    /// Page envelope decoded from each collection response
    type Response: DeserializeOwned + Send;
    /// Single resource, as returned by the item endpoint
    type Resource: DeserializeOwned + Send;
    /// Entity stored in the cache
    type Item: Metadata;

    /// Short name used in logs and errors (e.g. "isolation_segment")
    fn kind(&self) -> &'static str;

    /// Transform every resource on a page and append it to `items`
    fn process_response(&self, response: Self::Response, items: Vec<Self::Item>)
        -> Vec<Self::Item>;

    /// Transform one wire resource into a cache entity
    fn process_resource(&self, resource: Self::Resource) -> Self::Item;

    /// Request URI of the page after `response`, or None when traversal is complete
    fn next_url(&self, response: &Self::Response) -> Option<String>;

    /// Post-load hook, run against the freshly built map before it is published
    fn resolve_sentinel(
        &self,
        _items: &HashMap<String, Arc<Self::Item>>,
    ) -> Option<Arc<Self::Item>> {
        None
    }
}

/// Result of a guid lookup
#[derive(Debug, Clone)]
pub enum ItemLookup<T> {
    /// Entity present in the cache (or resolved through the sentinel)
    Found(Arc<T>),
    /// No guid was supplied; carries the kind's "unknown" entity
    Unknown(Arc<T>),
    /// The guid is not present in the last completed reload
    NotFound(String),
}

impl<T> ItemLookup<T> {
    /// The entity for `Found` and `Unknown`, None for `NotFound`
    pub fn item(&self) -> Option<&Arc<T>> {
        match self {
            Self::Found(item) | Self::Unknown(item) => Some(item),
            Self::NotFound(_) => None,
        }
    }

    pub fn into_item(self) -> Option<Arc<T>> {
        match self {
            Self::Found(item) | Self::Unknown(item) => Some(item),
            Self::NotFound(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_accessors() {
        let found = ItemLookup::Found(Arc::new(7));
        let unknown = ItemLookup::Unknown(Arc::new(0));
        let missing: ItemLookup<i32> = ItemLookup::NotFound("g-1".into());

        assert!(found.is_found());
        assert_eq!(found.item().map(|v| **v), Some(7));
        assert!(!unknown.is_found());
        assert_eq!(unknown.into_item().map(|v| *v), Some(0));
        assert!(missing.is_not_found());
        assert!(missing.item().is_none());
    }
}
