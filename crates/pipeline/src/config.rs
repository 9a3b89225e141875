use std::time::Duration;

const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL_NAME: &str = "openai/gpt-4o-mini";
const DEFAULT_FIRECRAWL_BASE_URL: &str = "https://api.firecrawl.dev/v1";
const DEFAULT_REDUCTO_BASE_URL: &str = "https://platform.reducto.ai";
const DEFAULT_HN_API_URL: &str = "https://hn.algolia.com/api/v1";

/// Connection settings for the external research collaborators.
///
/// A collaborator whose API key is missing is left unconfigured; the
/// orchestrator then falls back to its documented default for that step.
#[derive(Debug, Clone)]
pub struct CollaboratorConfig {
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub model_name: String,
    pub firecrawl_api_key: Option<String>,
    pub firecrawl_base_url: String,
    pub reducto_api_key: Option<String>,
    pub reducto_base_url: String,
    /// Hacker News search needs no key.
    pub hn_api_url: String,
    /// Per-request timeout applied by every collaborator HTTP client.
    pub timeout: Duration,
}

impl CollaboratorConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                          |
    /// |-----------------------------|----------------------------------|
    /// | `OPENROUTER_API_KEY`        | unset                            |
    /// | `OPENROUTER_BASE_URL`       | `https://openrouter.ai/api/v1`   |
    /// | `MODEL_NAME`                | `openai/gpt-4o-mini`             |
    /// | `FIRECRAWL_API_KEY`         | unset                            |
    /// | `FIRECRAWL_BASE_URL`        | `https://api.firecrawl.dev/v1`   |
    /// | `REDUCTO_API_KEY`           | unset                            |
    /// | `REDUCTO_BASE_URL`          | `https://platform.reducto.ai`    |
    /// | `HN_API_URL`                | `https://hn.algolia.com/api/v1`  |
    /// | `COLLABORATOR_TIMEOUT_SECS` | `90`                             |
    pub fn from_env() -> Self {
        let timeout_secs: u64 = std::env::var("COLLABORATOR_TIMEOUT_SECS")
            .unwrap_or_else(|_| "90".into())
            .parse()
            .expect("COLLABORATOR_TIMEOUT_SECS must be a valid u64");

        Self {
            openrouter_api_key: non_empty_var("OPENROUTER_API_KEY"),
            openrouter_base_url: url_var("OPENROUTER_BASE_URL", DEFAULT_OPENROUTER_BASE_URL),
            model_name: std::env::var("MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL_NAME.into()),
            firecrawl_api_key: non_empty_var("FIRECRAWL_API_KEY"),
            firecrawl_base_url: url_var("FIRECRAWL_BASE_URL", DEFAULT_FIRECRAWL_BASE_URL),
            reducto_api_key: non_empty_var("REDUCTO_API_KEY"),
            reducto_base_url: url_var("REDUCTO_BASE_URL", DEFAULT_REDUCTO_BASE_URL),
            hn_api_url: url_var("HN_API_URL", DEFAULT_HN_API_URL),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            openrouter_api_key: None,
            openrouter_base_url: DEFAULT_OPENROUTER_BASE_URL.into(),
            model_name: DEFAULT_MODEL_NAME.into(),
            firecrawl_api_key: None,
            firecrawl_base_url: DEFAULT_FIRECRAWL_BASE_URL.into(),
            reducto_api_key: None,
            reducto_base_url: DEFAULT_REDUCTO_BASE_URL.into(),
            hn_api_url: DEFAULT_HN_API_URL.into(),
            timeout: Duration::from_secs(90),
        }
    }
}

/// Behavior of the orchestrator itself.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Keywords used when idea extraction fails.
    pub fallback_keywords: Vec<String>,
    /// Industry used when idea extraction fails.
    pub fallback_industry: String,
    /// Maximum number of discussions fetched per job.
    pub discussion_limit: usize,
    /// Base URL of the public dashboard; reports link to
    /// `{public_base_url}/signup/{job_id}`.
    pub public_base_url: String,
}

impl PipelineConfig {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    pub fn result_url(&self, job_id: signals_core::types::JobId) -> String {
        format!("{}/signup/{job_id}", self.public_base_url)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fallback_keywords: vec!["startup".into(), "market".into(), "product".into()],
            fallback_industry: "technology".into(),
            discussion_limit: 5,
            public_base_url: "http://localhost:3001".into(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn url_var(name: &str, default: &str) -> String {
    std::env::var(name)
        .map(|u| u.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| default.to_string())
}
