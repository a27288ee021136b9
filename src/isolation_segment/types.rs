//! Cloud Foundry v3 isolation segment wire types
//!
//! Reference: GET /v3/isolation_segments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Paginated list envelope
#[derive(Debug, Clone, Deserialize)]
pub struct IsolationSegmentResponse {
    #[serde(default)]
    pub pagination: Pagination,
    pub resources: Vec<IsolationSegment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u64>,
    #[serde(default)]
    pub first: Option<Link>,
    #[serde(default)]
    pub last: Option<Link>,
    #[serde(default)]
    pub next: Option<Link>,
    #[serde(default)]
    pub previous: Option<Link>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Link {
    #[serde(default)]
    pub href: String,
}

/// One isolation segment as returned by the API
///
/// Fields this crate does not interpret (metadata, links, ...) are kept in
/// `extra` and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IsolationSegment {
    pub guid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IsolationSegment {
    /// A segment carrying only a guid and name
    pub fn named(guid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            name: name.into(),
            created_at: None,
            updated_at: None,
            extra: Map::new(),
        }
    }
}
