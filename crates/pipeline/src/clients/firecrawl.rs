//! Firecrawl page scraping (`POST /scrape`, markdown format).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::collaborators::WebCrawler;
use crate::error::{ensure_success, CollaboratorError};

const SERVICE: &str = "firecrawl";

pub struct FirecrawlClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    data: Option<ScrapeData>,
}

#[derive(Debug, Deserialize)]
struct ScrapeData {
    #[serde(default)]
    markdown: Option<String>,
}

impl FirecrawlClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, CollaboratorError> {
        Ok(Self {
            client: super::http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl WebCrawler for FirecrawlClient {
    async fn scrape(&self, url: &str) -> Result<String, CollaboratorError> {
        let response = self
            .client
            .post(format!("{}/scrape", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "url": url, "formats": ["markdown"] }))
            .send()
            .await?;

        let scraped: ScrapeResponse = ensure_success(SERVICE, response).await?.json().await?;
        let markdown = scraped.data.and_then(|d| d.markdown).unwrap_or_default();
        tracing::debug!(url, chars = markdown.len(), "Page scraped");
        Ok(markdown)
    }
}
