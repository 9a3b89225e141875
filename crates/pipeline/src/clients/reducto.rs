//! Reducto document parsing (`POST /parse`).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::collaborators::DocumentParser;
use crate::error::{ensure_success, CollaboratorError};

const SERVICE: &str = "reducto";

pub struct ReductoClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Default, Deserialize)]
struct ParseResponse {
    #[serde(default)]
    result: Option<ParseResult>,
}

#[derive(Debug, Default, Deserialize)]
struct ParseResult {
    #[serde(default)]
    blocks: Vec<Block>,
}

#[derive(Debug, Deserialize)]
struct Block {
    #[serde(default)]
    content: String,
}

impl ParseResponse {
    /// Block contents joined by newlines.
    fn into_text(self) -> String {
        self.result
            .map(|r| {
                r.blocks
                    .into_iter()
                    .map(|b| b.content)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default()
    }
}

impl ReductoClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, CollaboratorError> {
        Ok(Self {
            client: super::http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl DocumentParser for ReductoClient {
    async fn parse(&self, document_url: &str) -> Result<String, CollaboratorError> {
        let response = self
            .client
            .post(format!("{}/parse", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "document_url": document_url }))
            .send()
            .await?;

        let parsed: ParseResponse = ensure_success(SERVICE, response).await?.json().await?;
        Ok(parsed.into_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_are_flattened() {
        let parsed: ParseResponse = serde_json::from_value(serde_json::json!({
            "result": { "blocks": [{ "content": "Title" }, { "content": "Body" }, { "type": "figure" }] }
        }))
        .unwrap();
        assert_eq!(parsed.into_text(), "Title\nBody\n");
    }

    #[test]
    fn missing_result_is_empty_text() {
        assert_eq!(ParseResponse::default().into_text(), "");
    }
}
