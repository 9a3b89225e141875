//! Interfaces of the external research collaborators.
//!
//! Each collaborator is an async trait object so the orchestrator can be run
//! against the real HTTP clients in [`crate::clients`] or against test
//! doubles. Implementations bound their own latency; nothing above them
//! enforces a timeout.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::clients::{FirecrawlClient, HnSearchClient, OpenRouterClient, ReductoClient};
use crate::config::CollaboratorConfig;
use crate::error::CollaboratorError;

/// One community discussion thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discussion {
    pub title: String,
    /// Link to the discussion thread itself.
    pub url: String,
    /// Link the discussion is about, if any.
    pub story_url: Option<String>,
    pub points: u64,
    pub num_comments: u64,
}

#[async_trait]
pub trait WebCrawler: Send + Sync {
    /// Fetch a page and return its content as markdown.
    async fn scrape(&self, url: &str) -> Result<String, CollaboratorError>;
}

#[async_trait]
pub trait DocumentParser: Send + Sync {
    /// Extract plain text from the document at `document_url`.
    async fn parse(&self, document_url: &str) -> Result<String, CollaboratorError>;
}

#[async_trait]
pub trait DiscussionSearch: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Discussion>, CollaboratorError>;
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Run one chat completion that is expected to answer with a JSON
    /// object. Returns the raw message content.
    async fn complete_json(&self, system: &str, prompt: &str) -> Result<String, CollaboratorError>;
}

/// Stand-in for a collaborator that has no configuration.
///
/// Every call fails with [`CollaboratorError::NotConfigured`], which the
/// orchestrator treats like any other collaborator failure.
#[derive(Debug, Clone, Copy)]
pub struct Unavailable(pub &'static str);

#[async_trait]
impl WebCrawler for Unavailable {
    async fn scrape(&self, _url: &str) -> Result<String, CollaboratorError> {
        Err(CollaboratorError::NotConfigured(self.0))
    }
}

#[async_trait]
impl DocumentParser for Unavailable {
    async fn parse(&self, _document_url: &str) -> Result<String, CollaboratorError> {
        Err(CollaboratorError::NotConfigured(self.0))
    }
}

#[async_trait]
impl DiscussionSearch for Unavailable {
    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<Discussion>, CollaboratorError> {
        Err(CollaboratorError::NotConfigured(self.0))
    }
}

#[async_trait]
impl LanguageModel for Unavailable {
    async fn complete_json(&self, _system: &str, _prompt: &str) -> Result<String, CollaboratorError> {
        Err(CollaboratorError::NotConfigured(self.0))
    }
}

/// The full set of collaborators used by one orchestrator.
#[derive(Clone)]
pub struct Collaborators {
    pub crawler: Arc<dyn WebCrawler>,
    pub parser: Arc<dyn DocumentParser>,
    pub search: Arc<dyn DiscussionSearch>,
    pub llm: Arc<dyn LanguageModel>,
}

impl Collaborators {
    /// Build HTTP clients for every collaborator that has credentials.
    ///
    /// Collaborators without an API key are replaced by [`Unavailable`].
    pub fn from_config(config: &CollaboratorConfig) -> Result<Self, CollaboratorError> {
        let crawler: Arc<dyn WebCrawler> = match &config.firecrawl_api_key {
            Some(key) => Arc::new(FirecrawlClient::new(
                &config.firecrawl_base_url,
                key,
                config.timeout,
            )?),
            None => {
                tracing::warn!("FIRECRAWL_API_KEY not set, web crawling disabled");
                Arc::new(Unavailable("firecrawl"))
            }
        };

        let parser: Arc<dyn DocumentParser> = match &config.reducto_api_key {
            Some(key) => Arc::new(ReductoClient::new(
                &config.reducto_base_url,
                key,
                config.timeout,
            )?),
            None => {
                tracing::warn!("REDUCTO_API_KEY not set, document parsing disabled");
                Arc::new(Unavailable("reducto"))
            }
        };

        let llm: Arc<dyn LanguageModel> = match &config.openrouter_api_key {
            Some(key) => Arc::new(OpenRouterClient::new(
                &config.openrouter_base_url,
                key,
                &config.model_name,
                config.timeout,
            )?),
            None => {
                tracing::warn!("OPENROUTER_API_KEY not set, LLM steps will use fallbacks");
                Arc::new(Unavailable("openrouter"))
            }
        };

        let search = Arc::new(HnSearchClient::new(&config.hn_api_url, config.timeout)?);

        Ok(Self {
            crawler,
            parser,
            search,
            llm,
        })
    }

    /// Every collaborator unavailable. The pipeline still runs end to end on
    /// its fallbacks.
    pub fn unavailable() -> Self {
        Self {
            crawler: Arc::new(Unavailable("crawler")),
            parser: Arc::new(Unavailable("parser")),
            search: Arc::new(Unavailable("search")),
            llm: Arc::new(Unavailable("llm")),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn unavailable_reports_not_configured() {
        let c = Collaborators::unavailable();
        assert_matches!(
            c.llm.complete_json("s", "p").await,
            Err(CollaboratorError::NotConfigured("llm"))
        );
        assert_matches!(
            c.search.search("q", 5).await,
            Err(CollaboratorError::NotConfigured("search"))
        );
    }

    #[test]
    fn from_config_without_keys_succeeds() {
        assert!(Collaborators::from_config(&CollaboratorConfig::default()).is_ok());
    }
}
