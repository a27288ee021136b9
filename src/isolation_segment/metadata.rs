//! Cache-resident isolation segment entity and its well-known instances

use serde::Serialize;
use std::sync::{Arc, OnceLock};

use super::types::IsolationSegment;
use crate::common::Metadata;

/// Name of the platform's default isolation segment
pub const SHARED_ISOLATION_SEGMENT_NAME: &str = "shared";

/// Guid callers use to refer to the default isolation segment
pub const DEFAULT_ISOLATION_SEGMENT_GUID: &str = "default-isolation-segment";

pub const UNKNOWN_ISOLATION_SEGMENT_GUID: &str = "unknown";
pub const UNKNOWN_ISOLATION_SEGMENT_NAME: &str = "unknown";

/// Isolation segment as held by the metadata cache
///
/// Immutable once constructed; guid and name are only exposed by accessor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IsolationSegmentMetadata {
    segment: IsolationSegment,
}

impl IsolationSegmentMetadata {
    pub fn new(segment: IsolationSegment) -> Self {
        Self { segment }
    }

    /// Placeholder for platforms that predate isolation segments
    pub fn shared_placeholder() -> Self {
        Self::new(IsolationSegment::named(
            DEFAULT_ISOLATION_SEGMENT_GUID,
            SHARED_ISOLATION_SEGMENT_NAME,
        ))
    }

    /// Process-wide "unknown" entity returned for empty guids
    pub fn unknown() -> Arc<Self> {
        static UNKNOWN: OnceLock<Arc<IsolationSegmentMetadata>> = OnceLock::new();
        UNKNOWN
            .get_or_init(|| {
                Arc::new(Self::new(IsolationSegment::named(
                    UNKNOWN_ISOLATION_SEGMENT_GUID,
                    UNKNOWN_ISOLATION_SEGMENT_NAME,
                )))
            })
            .clone()
    }

    pub fn guid(&self) -> &str {
        &self.segment.guid
    }

    pub fn name(&self) -> &str {
        &self.segment.name
    }

    /// Underlying wire resource, including pass-through fields
    pub fn segment(&self) -> &IsolationSegment {
        &self.segment
    }

    pub fn is_shared(&self) -> bool {
        self.segment.name == SHARED_ISOLATION_SEGMENT_NAME
    }
}

impl Metadata for IsolationSegmentMetadata {
    fn guid(&self) -> &str {
        &self.segment.guid
    }

    fn name(&self) -> &str {
        &self.segment.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_identity() {
        let placeholder = IsolationSegmentMetadata::shared_placeholder();
        assert_eq!(placeholder.guid(), DEFAULT_ISOLATION_SEGMENT_GUID);
        assert_eq!(placeholder.name(), SHARED_ISOLATION_SEGMENT_NAME);
        assert!(placeholder.is_shared());
    }

    #[test]
    fn test_unknown_is_shared_instance() {
        let a = IsolationSegmentMetadata::unknown();
        let b = IsolationSegmentMetadata::unknown();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.guid(), UNKNOWN_ISOLATION_SEGMENT_GUID);
    }

    #[test]
    fn test_serializes_as_wire_resource() {
        let md = IsolationSegmentMetadata::new(IsolationSegment::named("g-1", "payments"));
        let value = serde_json::to_value(&md).unwrap();
        assert_eq!(value, serde_json::json!({ "guid": "g-1", "name": "payments" }));
    }
}
