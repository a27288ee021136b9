use thiserror::Error;

pub type Result<T> = std::result::Result<T, MetadataError>;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("request to {uri} failed: {source}")]
    Transport {
        uri: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("upstream returned {status} for {uri}: {body}")]
    Status { uri: String, status: u16, body: String },

    #[error("failed to decode response from {uri}: {source}")]
    Decode {
        uri: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("page limit of {limit} exceeded while loading {kind}")]
    PageLimitExceeded { kind: &'static str, limit: usize },

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}

impl MetadataError {
    /// True when the upstream answered 404 for the requested URI.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_only_for_404_status() {
        let missing = MetadataError::Status {
            uri: "/v3/isolation_segments/x".into(),
            status: 404,
            body: String::new(),
        };
        let forbidden = MetadataError::Status {
            uri: "/v3/isolation_segments/x".into(),
            status: 403,
            body: String::new(),
        };
        assert!(missing.is_not_found());
        assert!(!forbidden.is_not_found());
        assert!(!MetadataError::PageLimitExceeded {
            kind: "isolation_segment",
            limit: 1
        }
        .is_not_found());
    }

    #[test]
    fn page_limit_message_names_kind() {
        let err = MetadataError::PageLimitExceeded {
            kind: "isolation_segment",
            limit: 3,
        };
        assert_eq!(
            err.to_string(),
            "page limit of 3 exceeded while loading isolation_segment"
        );
    }
}
