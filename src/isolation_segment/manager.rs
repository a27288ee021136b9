//! Isolation segment metadata manager
//!
//! Pages through `/v3/isolation_segments` and keeps a guid-keyed cache.
//! After each reload the "shared" segment is resolved as the sentinel
//! answering lookups for `DEFAULT_ISOLATION_SEGMENT_GUID`. Platforms that
//! predate isolation segments have no such entity; a placeholder is used.

use std::collections::HashMap;
use std::sync::Arc;

use super::metadata::{
    IsolationSegmentMetadata, DEFAULT_ISOLATION_SEGMENT_GUID, SHARED_ISOLATION_SEGMENT_NAME,
};
use super::types::{IsolationSegment, IsolationSegmentResponse};
use crate::common::{
    request_uri, ItemLookup, LoadOptions, LoadReport, PageFetcher, ResourceHandler,
    ResponseManager,
};
use crate::error::Result;

/// Collection endpoint for isolation segments
pub const ISOLATION_SEGMENTS_URL: &str = "/v3/isolation_segments";

/// Hooks for the isolation segment collection
#[derive(Debug, Default)]
pub struct IsolationSegmentHandler;

impl ResourceHandler for IsolationSegmentHandler {
    type Response = IsolationSegmentResponse;
    type Resource = IsolationSegment;
    type Item = IsolationSegmentMetadata;

    fn kind(&self) -> &'static str {
        "isolation_segment"
    }

    fn process_response(
        &self,
        response: IsolationSegmentResponse,
        mut items: Vec<IsolationSegmentMetadata>,
    ) -> Vec<IsolationSegmentMetadata> {
        items.reserve(response.resources.len());
        for resource in response.resources {
            items.push(self.process_resource(resource));
        }
        items
    }

    fn process_resource(&self, resource: IsolationSegment) -> IsolationSegmentMetadata {
        IsolationSegmentMetadata::new(resource)
    }

    fn next_url(&self, response: &IsolationSegmentResponse) -> Option<String> {
        response
            .pagination
            .next
            .as_ref()
            .and_then(|link| request_uri(&link.href))
    }

    fn resolve_sentinel(
        &self,
        items: &HashMap<String, Arc<IsolationSegmentMetadata>>,
    ) -> Option<Arc<IsolationSegmentMetadata>> {
        if let Some(shared) = items.values().find(|seg| seg.is_shared()) {
            return Some(shared.clone());
        }

        tracing::info!(
            guid = DEFAULT_ISOLATION_SEGMENT_GUID,
            "No '{}' isolation segment upstream, using placeholder",
            SHARED_ISOLATION_SEGMENT_NAME
        );
        Some(Arc::new(IsolationSegmentMetadata::shared_placeholder()))
    }
}

/// Cache of isolation segment metadata
pub struct IsolationSegmentMetadataManager {
    inner: ResponseManager<IsolationSegmentHandler>,
}

impl IsolationSegmentMetadataManager {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self::with_options(fetcher, LoadOptions::default())
    }

    pub fn with_options(fetcher: Arc<dyn PageFetcher>, options: LoadOptions) -> Self {
        Self {
            inner: ResponseManager::new(
                IsolationSegmentHandler,
                fetcher,
                ISOLATION_SEGMENTS_URL,
                options,
            ),
        }
    }

    /// Reload every isolation segment and re-resolve the shared segment
    ///
    /// On failure the previous contents remain queryable.
    pub async fn load_all_items(&self) -> Result<LoadReport> {
        self.inner.load_all_items().await
    }

    /// Look up an isolation segment by guid
    ///
    /// - empty guid: the unknown entity
    /// - `DEFAULT_ISOLATION_SEGMENT_GUID`: the shared segment
    /// - anything else: the cached entity, or `NotFound`
    pub async fn find_item(&self, guid: &str) -> ItemLookup<IsolationSegmentMetadata> {
        if guid.is_empty() {
            return ItemLookup::Unknown(IsolationSegmentMetadata::unknown());
        }
        if guid == DEFAULT_ISOLATION_SEGMENT_GUID {
            return ItemLookup::Found(self.shared_segment().await);
        }
        match self.inner.find_item_internal(guid).await {
            Some(item) => ItemLookup::Found(item),
            None => ItemLookup::NotFound(guid.to_string()),
        }
    }

    /// The shared segment resolved by the last reload
    ///
    /// Before the first reload completes the item endpoint is queried
    /// directly; if that yields nothing the placeholder is returned.
    pub async fn shared_segment(&self) -> Arc<IsolationSegmentMetadata> {
        if let Some(sentinel) = self.inner.sentinel().await {
            return sentinel;
        }

        match self
            .inner
            .fetch_item_by_id(DEFAULT_ISOLATION_SEGMENT_GUID)
            .await
        {
            Ok(Some(item)) => Arc::new(item),
            Ok(None) => Arc::new(IsolationSegmentMetadata::shared_placeholder()),
            Err(e) => {
                tracing::warn!(
                    guid = DEFAULT_ISOLATION_SEGMENT_GUID,
                    error = %e,
                    "Shared isolation segment fetch failed, using placeholder"
                );
                Arc::new(IsolationSegmentMetadata::shared_placeholder())
            }
        }
    }

    /// Snapshot of every cached isolation segment (order unspecified)
    ///
    /// A synthesized shared placeholder is never included.
    pub async fn get_all(&self) -> Vec<Arc<IsolationSegmentMetadata>> {
        self.inner.all_items().await
    }

    pub async fn find_by_name(&self, name: &str) -> Option<Arc<IsolationSegmentMetadata>> {
        self.inner.find_by_name(name).await
    }

    pub async fn len(&self) -> usize {
        self.inner.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.is_empty().await
    }

    pub async fn is_loaded(&self) -> bool {
        self.inner.is_loaded().await
    }
}
