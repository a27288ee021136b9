//! Isolation segment metadata
//!
//! This module provides:
//! - v3 API wire types for isolation segments
//! - The cache-resident entity and its well-known instances
//! - The manager that loads and serves the cache

pub mod manager;
pub mod metadata;
pub mod types;

pub use manager::{IsolationSegmentHandler, IsolationSegmentMetadataManager, ISOLATION_SEGMENTS_URL};
pub use metadata::*;
pub use types::*;
