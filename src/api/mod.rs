//! HTTP implementations of the collaborator traits against a PeerTube-style
//! REST API.

use crate::config::ApiConfig;
use crate::engine::{CatalogFilter, ContentCatalog, ContentItem, ModerationGateway};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

const PAGE_SIZE: usize = 100;

// One slow call must not delay ledger persistence and rescheduling
// indefinitely.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct VideoPage {
    total: usize,
    data: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    uuid: String,
    url: String,
    #[serde(rename = "isLocal")]
    is_local: bool,
}

/// Pages through the platform's full video listing each call.
pub struct HttpCatalog {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpCatalog {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent("OriginGuard/1.0")
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }
}

#[async_trait]
impl ContentCatalog for HttpCatalog {
    // The hostname hint is ignored; the listing endpoint has no origin
    // filter, so the engine matches hostnames itself.
    async fn list(&self, _filter: CatalogFilter) -> Result<Vec<ContentItem>> {
        let mut items = Vec::new();
        let mut start = 0usize;
        loop {
            let url = format!(
                "{}/api/v1/videos?isLocal=false&start={}&count={}",
                self.base_url, start, PAGE_SIZE
            );
            let page: VideoPage = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .send()
                .await
                .context("video listing request failed")?
                .error_for_status()
                .context("video listing rejected")?
                .json()
                .await
                .context("video listing payload unreadable")?;

            let fetched = page.data.len();
            items.extend(page.data.into_iter().map(|video| ContentItem {
                id: video.uuid,
                origin_url: video.url,
                is_remote: !video.is_local,
            }));
            start += fetched;
            if fetched == 0 || start >= page.total {
                break;
            }
        }
        Ok(items)
    }
}

/// Issues blacklist actions through the moderation API.
pub struct HttpGateway {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpGateway {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent("OriginGuard/1.0")
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }
}

#[async_trait]
impl ModerationGateway for HttpGateway {
    async fn blacklist(&self, content_id: &str, reason: &str) -> Result<()> {
        let url = format!("{}/api/v1/videos/{}/blacklist", self.base_url, content_id);
        self.client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "reason": reason }))
            .send()
            .await
            .context("blacklist request failed")?
            .error_for_status()
            .context("blacklist rejected")?;
        info!(id = %content_id, "Blacklist action accepted");
        Ok(())
    }
}
