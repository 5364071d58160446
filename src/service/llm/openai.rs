//! OpenAI model client built on `async-openai` chat completions.

use std::sync::Arc;

use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage, ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage, ChatCompletionRequestUserMessageContent,
        CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{GenericModelClient, ModelClient, ProviderError};
use crate::base::config::Config;

// Extra methods on `ModelClient` applied by the openai implementation.

impl ModelClient {
    /// Create a model client backed by OpenAI.
    pub fn openai(config: &Config) -> Self {
        let client = OpenAiModelClient::new(config);
        Self::new(Arc::new(client))
    }
}

// Specific implementations.

/// OpenAI model client implementation.
#[derive(Clone)]
pub struct OpenAiModelClient {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiModelClient {
    /// Create a new OpenAI model client from configuration.
    #[instrument(name = "OpenAiModelClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        let cfg = OpenAIConfig::new().with_api_key(config.openai_api_key.clone().unwrap_or_default());

        Self {
            client: Client::with_config(cfg),
            model: config.openai_model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl GenericModelClient for OpenAiModelClient {
    #[instrument(name = "OpenAiModelClient::generate", skip_all)]
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, ProviderError> {
        let messages = vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(system.to_string()),
                name: None,
            }),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(prompt.to_string()),
                name: None,
            }),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .max_completion_tokens(self.max_tokens)
            .build()
            .map_err(map_openai_error)?;

        let response = self.client.chat().create(request).await.map_err(map_openai_error)?;

        debug!("Received chat completion {}.", response.id);

        let content = response.choices.into_iter().next().and_then(|choice| choice.message.content);

        match content {
            Some(text) => Ok(text),
            None => Err(ProviderError::MalformedResponse("chat completion carried no message content".to_string())),
        }
    }
}

/// Map an `async-openai` error onto the provider error taxonomy.
fn map_openai_error(err: OpenAIError) -> ProviderError {
    match err {
        OpenAIError::ApiError(api) => {
            let code = api.code.as_deref().unwrap_or_default();

            if code == "invalid_api_key" || api.message.contains("Incorrect API key") {
                ProviderError::Auth(api.message)
            } else if code == "rate_limit_exceeded" {
                ProviderError::RateLimited(api.message)
            } else {
                ProviderError::Api(api.message)
            }
        }
        OpenAIError::Reqwest(e) => ProviderError::Network(e.to_string()),
        OpenAIError::JSONDeserialize(e) => ProviderError::MalformedResponse(e.to_string()),
        other => ProviderError::Api(other.to_string()),
    }
}
