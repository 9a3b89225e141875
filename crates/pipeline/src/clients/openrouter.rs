//! OpenRouter chat completions (OpenAI-compatible API).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::collaborators::LanguageModel;
use crate::error::{ensure_success, CollaboratorError};

const SERVICE: &str = "openrouter";

pub struct OpenRouterClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenRouterClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, CollaboratorError> {
        Ok(Self {
            client: super::http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    fn request_body(&self, system: &str, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt },
            ],
            "response_format": { "type": "json_object" },
        })
    }
}

#[async_trait]
impl LanguageModel for OpenRouterClient {
    async fn complete_json(&self, system: &str, prompt: &str) -> Result<String, CollaboratorError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.request_body(system, prompt))
            .send()
            .await?;

        let chat: ChatResponse = ensure_success(SERVICE, response).await?.json().await?;
        content_of(chat)
    }
}

fn content_of(chat: ChatResponse) -> Result<String, CollaboratorError> {
    chat.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| CollaboratorError::Parse {
            service: SERVICE,
            message: "response contained no message content".into(),
        })
}
