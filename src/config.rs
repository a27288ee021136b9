//! Metadata cache configuration
//!
//! Loads the upstream API settings and reload limits from YAML.
//! `CF_API_URL` in the environment overrides `api.base_url`.

use serde::Deserialize;

use crate::error::{MetadataError, Result};

/// Environment variable that overrides the configured API base URL
pub const API_URL_ENV: &str = "CF_API_URL";

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub load: LoadConfig,
}

/// Upstream API connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL every request is issued against (e.g. "https://api.sys.example.com")
    pub base_url: String,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Page size requested on the first page of a collection
    #[serde(default)]
    pub per_page: Option<u32>,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Limits applied to a single reload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoadConfig {
    /// Maximum pages followed per reload (None = unlimited)
    #[serde(default)]
    pub max_pages: Option<usize>,
}

impl MetadataConfig {
    /// Create a configuration for a base URL with default settings
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
                timeout_secs: default_timeout_secs(),
                per_page: None,
            },
            load: LoadConfig::default(),
        }
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| MetadataError::ConfigRead {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: MetadataConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Apply `CF_API_URL` if it is set and non-empty
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
api:
  base_url: "https://api.sys.example.com"
  timeout_secs: 10
  per_page: 50

load:
  max_pages: 200
"#;

        let config = MetadataConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.api.base_url, "https://api.sys.example.com");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.api.per_page, Some(50));
        assert_eq!(config.load.max_pages, Some(200));
    }

    #[test]
    fn test_defaults_applied() {
        let yaml = r#"
api:
  base_url: "https://api.sys.example.com"
"#;

        let config = MetadataConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.api.per_page.is_none());
        assert!(config.load.max_pages.is_none());
    }

    #[test]
    fn test_missing_base_url_rejected() {
        let err = MetadataConfig::from_yaml("api:\n  timeout_secs: 5\n").unwrap_err();
        assert!(matches!(err, MetadataError::ConfigParse(_)));
    }

    #[test]
    fn test_bundled_config_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/cf-metadata.yaml");
        let config = MetadataConfig::from_file(path).unwrap();
        assert_eq!(config.api.per_page, Some(50));
        assert_eq!(config.load.max_pages, Some(1000));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = MetadataConfig::from_file("/nonexistent/cf-metadata.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cf-metadata.yaml"));
    }
}
