//! Anthropic model client speaking the Messages REST API via `reqwest`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{GenericModelClient, ModelClient, ProviderError, map_http_status};
use crate::base::config::Config;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

// Extra methods on `ModelClient` applied by the anthropic implementation.

impl ModelClient {
    /// Create a model client backed by Anthropic.
    pub fn anthropic(config: &Config) -> Self {
        let client = AnthropicModelClient::new(config);
        Self::new(Arc::new(client))
    }
}

// Specific implementations.

/// Anthropic model client implementation.
#[derive(Clone)]
pub struct AnthropicModelClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    base_url: String,
}

impl AnthropicModelClient {
    /// Create a new Anthropic model client from configuration.
    #[instrument(name = "AnthropicModelClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.anthropic_api_key.clone().unwrap_or_default(),
            model: config.anthropic_model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl GenericModelClient for AnthropicModelClient {
    #[instrument(name = "AnthropicModelClient::generate", skip_all)]
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, ProviderError> {
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: system.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let url = format!("{}/messages", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_status(status, body));
        }

        let body: MessagesResponse = response.json().await.map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        debug!("Received message {} with {} content block(s).", body.id, body.content.len());

        let text = body.content.into_iter().find_map(|block| match block {
            ResponseContent::Text { text } => Some(text),
            ResponseContent::Other => None,
        });

        match text {
            Some(text) => Ok(text),
            None => Err(ProviderError::MalformedResponse("message carried no text content".to_string())),
        }
    }
}

// Anthropic API types.

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    id: String,
    content: Vec<ResponseContent>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseContent {
    Text { text: String },
    #[serde(other)]
    Other,
}
