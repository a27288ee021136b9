//! Generic paginating fetch-and-cache engine
//!
//! `ResponseManager` owns the page loop and the cache for one metadata kind.
//! The kind-specific work (decoding, transformation, cursor extraction,
//! sentinel resolution) is delegated to its `ResourceHandler`.
//!
//! A reload builds its map privately and publishes it in a single write,
//! together with the resolved sentinel. A failed reload leaves the previous
//! contents in place.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::traits::{Metadata, ResourceHandler};
use super::transport::PageFetcher;
use crate::config::LoadConfig;
use crate::error::{MetadataError, Result};

/// Options controlling how a collection is traversed
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Page size requested on the first page
    pub per_page: Option<u32>,
    /// Safety limit on pages followed per reload
    pub max_pages: Option<usize>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    pub fn from_config(per_page: Option<u32>, load: &LoadConfig) -> Self {
        Self {
            per_page,
            max_pages: load.max_pages,
        }
    }
}

/// Summary of one completed reload
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// Pages fetched
    pub pages: usize,
    /// Resources seen across all pages (duplicates included)
    pub resources: usize,
    /// Distinct guids now cached
    pub items: usize,
    /// Guid of the sentinel resolved at the end of the reload
    pub sentinel_guid: Option<String>,
    pub elapsed: Duration,
}

/// Published cache contents
struct CacheState<T> {
    items: HashMap<String, Arc<T>>,
    sentinel: Option<Arc<T>>,
    loaded: bool,
}

impl<T> Default for CacheState<T> {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
            sentinel: None,
            loaded: false,
        }
    }
}

/// Paginated fetch-and-cache for a single metadata kind
pub struct ResponseManager<H: ResourceHandler> {
    handler: H,
    fetcher: Arc<dyn PageFetcher>,
    collection_url: String,
    options: LoadOptions,
    state: RwLock<CacheState<H::Item>>,
}

impl<H: ResourceHandler> ResponseManager<H> {
    /// Create a manager for the collection at `collection_url` (path only)
    pub fn new(
        handler: H,
        fetcher: Arc<dyn PageFetcher>,
        collection_url: impl Into<String>,
        options: LoadOptions,
    ) -> Self {
        Self {
            handler,
            fetcher,
            collection_url: collection_url.into(),
            options,
            state: RwLock::new(CacheState::default()),
        }
    }

    /// URI of the first page, including the requested page size
    fn first_page_url(&self) -> String {
        match self.options.per_page {
            Some(per_page) => {
                let sep = if self.collection_url.contains('?') { '&' } else { '?' };
                format!("{}{}per_page={}", self.collection_url, sep, per_page)
            }
            None => self.collection_url.clone(),
        }
    }

    /// Fetch one page and decode its envelope
    async fn fetch_page(&self, uri: &str) -> Result<H::Response> {
        let body = self.fetcher.fetch(uri).await?;
        serde_json::from_str(&body).map_err(|source| MetadataError::Decode {
            uri: uri.to_string(),
            source,
        })
    }

    /// Traverse every page and replace the cache contents
    ///
    /// On error the previously published contents stay queryable.
    pub async fn load_all_items(&self) -> Result<LoadReport> {
        let kind = self.handler.kind();
        let started = Instant::now();

        let mut items: Vec<H::Item> = Vec::new();
        let mut pages = 0usize;
        let mut cursor = Some(self.first_page_url());

        while let Some(uri) = cursor.take() {
            if let Some(limit) = self.options.max_pages {
                if pages >= limit {
                    return Err(MetadataError::PageLimitExceeded { kind, limit });
                }
            }

            let response = self.fetch_page(&uri).await?;
            pages += 1;

            cursor = self.handler.next_url(&response);
            let before = items.len();
            items = self.handler.process_response(response, items);

            tracing::debug!(
                kind,
                uri = %uri,
                page = pages,
                resources = items.len() - before,
                "Processed page"
            );
        }

        let resources = items.len();
        let mut map: HashMap<String, Arc<H::Item>> = HashMap::with_capacity(resources);
        for item in items {
            let guid = item.guid().to_string();
            if map.insert(guid.clone(), Arc::new(item)).is_some() {
                tracing::debug!(kind, guid = %guid, "Duplicate guid across pages, keeping latest");
            }
        }

        let sentinel = self.handler.resolve_sentinel(&map);
        let report = LoadReport {
            pages,
            resources,
            items: map.len(),
            sentinel_guid: sentinel.as_ref().map(|s| s.guid().to_string()),
            elapsed: started.elapsed(),
        };

        {
            let mut state = self.state.write().await;
            state.items = map;
            state.sentinel = sentinel;
            state.loaded = true;
        }

        tracing::info!(
            kind,
            pages = report.pages,
            items = report.items,
            elapsed = ?report.elapsed,
            "Metadata reload complete"
        );

        Ok(report)
    }

    /// Fetch a single resource from the item endpoint, bypassing the cache
    ///
    /// Returns Ok(None) when the upstream answers 404.
    pub async fn fetch_item_by_id(&self, guid: &str) -> Result<Option<H::Item>> {
        let uri = format!("{}/{}", self.collection_url.trim_end_matches('/'), guid);

        let body = match self.fetcher.fetch(&uri).await {
            Ok(body) => body,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        let resource: H::Resource =
            serde_json::from_str(&body).map_err(|source| MetadataError::Decode { uri, source })?;

        Ok(Some(self.handler.process_resource(resource)))
    }

    /// Look up a guid in the published map
    pub async fn find_item_internal(&self, guid: &str) -> Option<Arc<H::Item>> {
        self.state.read().await.items.get(guid).cloned()
    }

    /// First cached entity with the given name
    pub async fn find_by_name(&self, name: &str) -> Option<Arc<H::Item>> {
        if name.is_empty() {
            return None;
        }
        self.state
            .read()
            .await
            .items
            .values()
            .find(|item| item.name() == name)
            .cloned()
    }

    /// Snapshot of every cached entity (order unspecified)
    pub async fn all_items(&self) -> Vec<Arc<H::Item>> {
        self.state.read().await.items.values().cloned().collect()
    }

    /// Sentinel resolved by the last completed reload
    pub async fn sentinel(&self) -> Option<Arc<H::Item>> {
        self.state.read().await.sentinel.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.items.is_empty()
    }

    /// Whether at least one reload has completed
    pub async fn is_loaded(&self) -> bool {
        self.state.read().await.loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::transport::StaticPageFetcher;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Page {
        next: Option<String>,
        items: Vec<Row>,
    }

    #[derive(Debug, Deserialize)]
    struct Row {
        id: String,
        label: String,
    }

    #[derive(Debug)]
    struct Entry {
        id: String,
        label: String,
    }

    impl Metadata for Entry {
        fn guid(&self) -> &str {
            &self.id
        }

        fn name(&self) -> &str {
            &self.label
        }
    }

    struct RowHandler;

    impl ResourceHandler for RowHandler {
        type Response = Page;
        type Resource = Row;
        type Item = Entry;

        fn kind(&self) -> &'static str {
            "row"
        }

        fn process_response(&self, response: Page, mut items: Vec<Entry>) -> Vec<Entry> {
            for row in response.items {
                items.push(self.process_resource(row));
            }
            items
        }

        fn process_resource(&self, resource: Row) -> Entry {
            Entry {
                id: resource.id,
                label: resource.label,
            }
        }

        fn next_url(&self, response: &Page) -> Option<String> {
            response.next.clone()
        }
    }

    fn manager(fetcher: StaticPageFetcher, options: LoadOptions) -> ResponseManager<RowHandler> {
        ResponseManager::new(RowHandler, Arc::new(fetcher), "/rows", options)
    }

    #[tokio::test]
    async fn test_follows_cursor_until_absent() {
        let fetcher = StaticPageFetcher::new()
            .with_page("/rows", r#"{"next":"/rows?page=2","items":[{"id":"a","label":"A"}]}"#)
            .with_page("/rows?page=2", r#"{"next":null,"items":[{"id":"b","label":"B"}]}"#);
        let mgr = manager(fetcher, LoadOptions::new());

        let report = mgr.load_all_items().await.unwrap();
        assert_eq!(report.pages, 2);
        assert_eq!(report.items, 2);
        assert!(report.sentinel_guid.is_none());
        assert!(mgr.is_loaded().await);
        assert_eq!(mgr.find_item_internal("b").await.unwrap().label, "B");
        assert_eq!(mgr.find_by_name("A").await.unwrap().id, "a");
        assert!(mgr.find_by_name("").await.is_none());
    }

    #[tokio::test]
    async fn test_per_page_added_to_first_request() {
        let fetcher = StaticPageFetcher::new()
            .with_page("/rows?per_page=5", r#"{"next":null,"items":[]}"#);
        let mgr = manager(fetcher, LoadOptions::new().with_per_page(5));

        let report = mgr.load_all_items().await.unwrap();
        assert_eq!(report.pages, 1);
        assert!(mgr.is_empty().await);
    }

    #[tokio::test]
    async fn test_duplicate_guids_counted_once() {
        let fetcher = StaticPageFetcher::new()
            .with_page("/rows", r#"{"next":"/rows?page=2","items":[{"id":"a","label":"old"}]}"#)
            .with_page("/rows?page=2", r#"{"next":null,"items":[{"id":"a","label":"new"}]}"#);
        let mgr = manager(fetcher, LoadOptions::new());

        let report = mgr.load_all_items().await.unwrap();
        assert_eq!(report.resources, 2);
        assert_eq!(report.items, 1);
        assert_eq!(mgr.find_item_internal("a").await.unwrap().label, "new");
    }

    #[tokio::test]
    async fn test_cyclic_cursor_hits_page_limit() {
        let fetcher = StaticPageFetcher::new()
            .with_page("/rows", r#"{"next":"/rows","items":[{"id":"a","label":"A"}]}"#);
        let mgr = manager(fetcher, LoadOptions::new().with_max_pages(3));

        let err = mgr.load_all_items().await.unwrap_err();
        assert!(matches!(
            err,
            MetadataError::PageLimitExceeded { kind: "row", limit: 3 }
        ));
        assert!(!mgr.is_loaded().await);
    }

    #[tokio::test]
    async fn test_decode_failure_names_uri() {
        let fetcher = StaticPageFetcher::new().with_page("/rows", "not json");
        let mgr = manager(fetcher, LoadOptions::new());

        match mgr.load_all_items().await.unwrap_err() {
            MetadataError::Decode { uri, .. } => assert_eq!(uri, "/rows"),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_item_by_id() {
        let fetcher = StaticPageFetcher::new()
            .with_page("/rows/a", r#"{"id":"a","label":"A"}"#)
            .with_status("/rows/broken", 502, "bad gateway");
        let mgr = manager(fetcher, LoadOptions::new());

        let item = mgr.fetch_item_by_id("a").await.unwrap().unwrap();
        assert_eq!(item.label, "A");
        assert!(mgr.fetch_item_by_id("missing").await.unwrap().is_none());
        assert!(mgr.fetch_item_by_id("broken").await.is_err());
        // item fetches never populate the cache
        assert_eq!(mgr.len().await, 0);
    }
}
