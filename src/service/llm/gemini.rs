//! Gemini model client speaking the `generateContent` REST API via `reqwest`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{GenericModelClient, ModelClient, ProviderError, map_http_status};
use crate::base::config::Config;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// Extra methods on `ModelClient` applied by the gemini implementation.

impl ModelClient {
    /// Create a model client backed by Gemini.
    pub fn gemini(config: &Config) -> Self {
        let client = GeminiModelClient::new(config);
        Self::new(Arc::new(client))
    }
}

// Specific implementations.

/// Gemini model client implementation.
#[derive(Clone)]
pub struct GeminiModelClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    base_url: String,
}

impl GeminiModelClient {
    /// Create a new Gemini model client from configuration.
    #[instrument(name = "GeminiModelClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.gemini_api_key.clone().unwrap_or_default(),
            model: config.gemini_model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl GenericModelClient for GeminiModelClient {
    #[instrument(name = "GeminiModelClient::generate", skip_all)]
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: prompt.to_string() }],
            }],
            system_instruction: Some(SystemInstruction {
                parts: vec![Part { text: system.to_string() }],
            }),
            generation_config: Some(GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_tokens,
            }),
        };

        let url = format!("{}/models/{}:generateContent?key={}", self.base_url, self.model, self.api_key);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_status(status, body));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        debug!("Received generateContent response with {} candidate(s).", body.candidates.len());

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text);

        match text {
            Some(text) => Ok(text),
            None => Err(ProviderError::MalformedResponse("generateContent returned no candidates".to_string())),
        }
    }
}

// Gemini API types.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    /// A safety-stopped candidate may come back with no parts at all.
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    /// Absent entirely when the prompt is blocked, so default to empty.
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}
