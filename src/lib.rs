//! cf-metadata - Cloud Foundry metadata cache
//!
//! Keeps an in-memory, guid-keyed cache of metadata pulled from a paginated
//! Cloud Foundry v3 collection endpoint. The generic engine walks every page
//! of a collection; each metadata kind plugs in its wire types and
//! transformation through `ResourceHandler`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Consumers: find_item(guid), get_all(), shared_segment()        │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │            IsolationSegmentMetadataManager                       │
//! │     (unknown / shared sentinel handling, lookups)               │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │              ResponseManager<IsolationSegmentHandler>            │
//! │     page loop -> decode -> transform -> atomic swap             │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 PageFetcher (reqwest / static)                   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use cf_metadata::{HttpPageFetcher, IsolationSegmentMetadataManager, MetadataConfig};
//!
//! let config = MetadataConfig::from_file("config/cf-metadata.yaml")?.with_env_overrides();
//! let fetcher = Arc::new(HttpPageFetcher::from_config(&config.api)?);
//! let segments = IsolationSegmentMetadataManager::new(fetcher);
//!
//! segments.load_all_items().await?;
//! let shared = segments.shared_segment().await;
//! ```

pub mod common;
pub mod config;
pub mod error;
pub mod isolation_segment;

// Re-export main types
pub use common::{
    ItemLookup, LoadOptions, LoadReport, Metadata, PageFetcher, ResourceHandler, ResponseManager,
};
pub use common::{HttpPageFetcher, StaticPageFetcher};
pub use config::{ApiConfig, LoadConfig, MetadataConfig};
pub use error::{MetadataError, Result};
pub use isolation_segment::{
    IsolationSegment, IsolationSegmentMetadata, IsolationSegmentMetadataManager,
    DEFAULT_ISOLATION_SEGMENT_GUID, SHARED_ISOLATION_SEGMENT_NAME,
};
