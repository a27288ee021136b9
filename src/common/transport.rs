//! Page transport
//!
//! `PageFetcher` is the seam between the response manager and HTTP.
//! `HttpPageFetcher` talks to the real API; `StaticPageFetcher` serves
//! canned bodies for tests and offline runs.

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{MetadataError, Result};

/// Fetches the raw body of a request URI relative to a fixed base
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `uri` (path plus query) and return the response body
    ///
    /// Non-success statuses are returned as `MetadataError::Status`.
    async fn fetch(&self, uri: &str) -> Result<String>;
}

/// reqwest-backed fetcher bound to one API base URL
pub struct HttpPageFetcher {
    http: Client,
    base_url: Url,
}

impl HttpPageFetcher {
    /// Create a fetcher for the given base URL and request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| MetadataError::Transport {
                uri: base_url.to_string(),
                source,
            })?;

        Ok(Self { http, base_url })
    }

    /// Create a fetcher from API configuration
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, uri: &str) -> Result<String> {
        let url = self.base_url.join(uri)?;

        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| MetadataError::Transport {
                uri: uri.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataError::Status {
                uri: uri.to_string(),
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        response.text().await.map_err(|source| MetadataError::Transport {
            uri: uri.to_string(),
            source,
        })
    }
}

/// In-memory fetcher serving canned responses keyed by request URI
///
/// URIs without a canned response answer 404. Every request is recorded.
#[derive(Default)]
pub struct StaticPageFetcher {
    pages: HashMap<String, (u16, String)>,
    requests: Mutex<Vec<String>>,
}

impl StaticPageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with status 200 for `uri`
    pub fn with_page(mut self, uri: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(uri.into(), (200, body.into()));
        self
    }

    /// Serve `body` with an arbitrary status for `uri`
    pub fn with_status(
        mut self,
        uri: impl Into<String>,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        self.pages.insert(uri.into(), (status, body.into()));
        self
    }

    /// Request URIs seen so far, in order
    pub async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl PageFetcher for StaticPageFetcher {
    async fn fetch(&self, uri: &str) -> Result<String> {
        self.requests.lock().await.push(uri.to_string());

        match self.pages.get(uri) {
            Some((200, body)) => Ok(body.clone()),
            Some((status, body)) => Err(MetadataError::Status {
                uri: uri.to_string(),
                status: *status,
                body: body.clone(),
            }),
            None => Err(MetadataError::Status {
                uri: uri.to_string(),
                status: 404,
                body: String::new(),
            }),
        }
    }
}
