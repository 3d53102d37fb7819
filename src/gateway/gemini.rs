//! Gemini `generateContent` client.

use super::TextGenerator;
use crate::errors::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

/// Public Gemini REST endpoint.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// HTTP client for one Gemini model.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Client for `model` at the public endpoint.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    /// Points the client at a different endpoint (proxies, tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

fn first_text(body: GenerateContentResponse) -> Result<String> {
    body.candidates
        .into_iter()
        .next()
        .ok_or_else(|| Error::gateway("No candidates returned"))?
        .content
        .ok_or_else(|| Error::gateway("Candidate has no content"))?
        .parts
        .into_iter()
        .find_map(|part| part.text)
        .ok_or_else(|| Error::gateway("Model returned non-text content"))
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip(self, prompt, response_schema), fields(model = %self.model))]
    async fn generate(&self, prompt: &str, response_schema: &Value) -> Result<String> {
        let payload = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema,
            },
        };

        let res = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(Error::gateway(format!(
                "Gemini API error (status {status}): {err_text}"
            )));
        }

        let body: GenerateContentResponse = res.json().await?;
        let text = first_text(body)?;
        debug!(chars = text.len(), "Gemini response received");
        Ok(text)
    }
}
