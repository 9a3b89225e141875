//! Hacker News story search through the public Algolia API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use crate::collaborators::{Discussion, DiscussionSearch};
use crate::error::{ensure_success, CollaboratorError};

const SERVICE: &str = "hn";

/// Only stories newer than this are returned.
const LOOKBACK_DAYS: i64 = 2 * 365;

const ITEM_URL: &str = "https://news.ycombinator.com/item?id=";

pub struct HnSearchClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "objectID")]
    object_id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    points: Option<u64>,
    #[serde(default)]
    num_comments: Option<u64>,
}

impl From<Hit> for Discussion {
    fn from(hit: Hit) -> Self {
        Self {
            title: hit.title.unwrap_or_default(),
            url: format!("{ITEM_URL}{}", hit.object_id),
            story_url: hit.url.filter(|u| !u.is_empty()),
            points: hit.points.unwrap_or(0),
            num_comments: hit.num_comments.unwrap_or(0),
        }
    }
}

impl HnSearchClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CollaboratorError> {
        Ok(Self {
            client: super::http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl DiscussionSearch for HnSearchClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Discussion>, CollaboratorError> {
        let cutoff = (Utc::now() - chrono::Duration::days(LOOKBACK_DAYS)).timestamp();
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("query", query.to_string()),
                ("tags", "story".to_string()),
                ("numericFilters", format!("created_at_i>{cutoff}")),
                ("hitsPerPage", limit.to_string()),
            ])
            .send()
            .await?;

        let found: SearchResponse = ensure_success(SERVICE, response).await?.json().await?;
        tracing::debug!(query, hits = found.hits.len(), "Discussion search finished");
        Ok(found.hits.into_iter().take(limit).map(Discussion::from).collect())
    }
}
