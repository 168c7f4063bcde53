//! HTTP client for the public SoundCloud API
//!
//! Only the three calls the resolver needs are implemented: URL resolution,
//! track search and batch track lookup. Responses are returned as raw JSON;
//! normalization happens in [`crate::models`].
//!
//! The API requires a `client_id` query parameter. When none is configured
//! it is discovered from the web app's script bundles and cached.

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::error::{MetadataError, Result};

/// Default API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api-v2.soundcloud.com";

/// Default web app URL, used for client id discovery
pub const DEFAULT_WEB_BASE_URL: &str = "https://soundcloud.com";

/// Default timeout for HTTP requests
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Tracks per batch lookup request
const TRACK_BATCH_SIZE: usize = 50;

/// SoundCloud API collaborator
#[async_trait]
pub trait SoundCloudApi: Send + Sync {
    /// Resolve a public URL to its API resource; `None` when it does not exist
    async fn resolve(&self, url: &str) -> Result<Option<Value>>;

    /// Search tracks matching `query`, at most `limit` results
    async fn search_tracks(&self, query: &str, limit: usize) -> Result<Vec<Value>>;

    /// Fetch full track resources by id; unknown ids are omitted
    async fn tracks_by_ids(&self, ids: &[u64]) -> Result<Vec<Value>>;
}

/// reqwest-backed SoundCloud client
#[derive(Debug)]
pub struct HttpSoundCloudClient {
    client: Client,
    api_base_url: String,
    web_base_url: String,
    client_id: RwLock<Option<String>>,
}

impl HttpSoundCloudClient {
    pub fn builder() -> SoundCloudClientBuilder {
        SoundCloudClientBuilder::default()
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Shared HTTP client, also used by the page scraper
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    async fn client_id(&self) -> Result<String> {
        if let Some(id) = self.client_id.read().await.as_ref() {
            return Ok(id.clone());
        }

        let mut cached = self.client_id.write().await;
        if let Some(id) = cached.as_ref() {
            return Ok(id.clone());
        }

        let id = self.discover_client_id().await?;
        log::info!("Discovered SoundCloud client id");
        *cached = Some(id.clone());
        Ok(id)
    }

    /// Scan the web app's script bundles for the embedded client id
    async fn discover_client_id(&self) -> Result<String> {
        let html = self
            .client
            .get(&self.web_base_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let scripts = script_sources(&html, &self.web_base_url);
        let pattern = Regex::new(r#"client_id\s*[:=]\s*"([0-9A-Za-z]+)""#)
            .map_err(|e| MetadataError::UpstreamUnavailable(e.to_string()))?;

        // The id lives in one of the last bundles
        for src in scripts.iter().rev() {
            let body = match self.client.get(src).send().await.and_then(|r| r.error_for_status()) {
                Ok(response) => response.text().await?,
                Err(e) => {
                    log::debug!("Skipping script {}: {}", src, e);
                    continue;
                }
            };
            if let Some(caps) = pattern.captures(&body) {
                return Ok(caps[1].to_string());
            }
        }

        Err(MetadataError::UpstreamUnavailable(
            "no client id found in SoundCloud web app".to_string(),
        ))
    }

    async fn forget_client_id(&self) {
        *self.client_id.write().await = None;
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Option<Value>> {
        let client_id = self.client_id().await?;
        let url = format!("{}{}", self.api_base_url, path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("client_id", client_id.as_str())])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                log::warn!("SoundCloud rejected client id ({}), will rediscover", response.status());
                self.forget_client_id().await;
            }
            _ => {}
        }

        let value = response.error_for_status()?.json::<Value>().await?;
        Ok(Some(value))
    }
}

#[async_trait]
impl SoundCloudApi for HttpSoundCloudClient {
    async fn resolve(&self, url: &str) -> Result<Option<Value>> {
        log::debug!("Resolving {}", url);
        self.get_json("/resolve", &[("url", url.to_string())]).await
    }

    async fn search_tracks(&self, query: &str, limit: usize) -> Result<Vec<Value>> {
        let body = self
            .get_json(
                "/search/tracks",
                &[("q", query.to_string()), ("limit", limit.to_string())],
            )
            .await?;

        let mut tracks = body
            .as_ref()
            .and_then(|b| b.get("collection"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        tracks.truncate(limit);
        Ok(tracks)
    }

    async fn tracks_by_ids(&self, ids: &[u64]) -> Result<Vec<Value>> {
        let mut tracks = Vec::with_capacity(ids.len());
        for batch in ids.chunks(TRACK_BATCH_SIZE) {
            let joined = batch.iter().map(u64::to_string).collect::<Vec<_>>().join(",");
            if let Some(Value::Array(found)) = self.get_json("/tracks", &[("ids", joined)]).await? {
                tracks.extend(found);
            }
        }
        Ok(tracks)
    }
}

/// Absolute `src` of every `<script>` on the page
fn script_sources(html: &str, base_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("script[src]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|el| el.value().attr("src"))
        .map(|src| {
            if src.starts_with("http://") || src.starts_with("https://") {
                src.to_string()
            } else {
                format!("{}/{}", base_url.trim_end_matches('/'), src.trim_start_matches('/'))
            }
        })
        .collect()
}

/// Builder for [`HttpSoundCloudClient`]
#[derive(Debug, Default)]
pub struct SoundCloudClientBuilder {
    api_base_url: Option<String>,
    web_base_url: Option<String>,
    client_id: Option<String>,
    timeout: Option<Duration>,
    client: Option<Client>,
}

impl SoundCloudClientBuilder {
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    pub fn web_base_url(mut self, url: impl Into<String>) -> Self {
        self.web_base_url = Some(url.into());
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set the client id when one is configured, otherwise keep discovery
    pub fn maybe_client_id(mut self, client_id: Option<String>) -> Self {
        if let Some(id) = client_id {
            self.client_id = Some(id);
        }
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use an existing reqwest client; `timeout` is then ignored
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Result<HttpSoundCloudClient> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .timeout(
                    self.timeout
                        .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
                )
                .build()?,
        };

        Ok(HttpSoundCloudClient {
            client,
            api_base_url: self
                .api_base_url
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            web_base_url: self
                .web_base_url
                .unwrap_or_else(|| DEFAULT_WEB_BASE_URL.to_string()),
            client_id: RwLock::new(self.client_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_sources_are_absolute() {
        let html = r#"<html><body>
            <script src="https://a-v2.sndcdn.com/assets/0-abc.js"></script>
            <script>window.inline = true;</script>
            <script src="/assets/49-def.js"></script>
        </body></html>"#;

        let sources = script_sources(html, "https://soundcloud.com/");
        assert_eq!(
            sources,
            vec![
                "https://a-v2.sndcdn.com/assets/0-abc.js".to_string(),
                "https://soundcloud.com/assets/49-def.js".to_string(),
            ]
        );
    }

    #[test]
    fn test_builder_defaults() {
        let client = HttpSoundCloudClient::builder().build().unwrap();
        assert_eq!(client.api_base_url(), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let client = HttpSoundCloudClient::builder()
            .api_base_url("http://localhost:9999/")
            .build()
            .unwrap();
        assert_eq!(client.api_base_url(), "http://localhost:9999");
    }

    #[tokio::test]
    async fn test_unset_client_id_keeps_discovery() {
        let configured = HttpSoundCloudClient::builder()
            .maybe_client_id(Some("abc".to_string()))
            .build()
            .unwrap();
        assert_eq!(configured.client_id.read().await.as_deref(), Some("abc"));

        let discovered = HttpSoundCloudClient::builder()
            .maybe_client_id(None)
            .build()
            .unwrap();
        assert!(discovered.client_id.read().await.is_none());
    }
}
