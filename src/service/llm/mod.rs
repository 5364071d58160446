//! Model provider clients.
//!
//! Each provider adapter implements [`GenericModelClient`], the single
//! capability the analyzer needs: turn a system directive and a prompt into
//! raw model text. Everything provider-specific (endpoints, auth headers,
//! wire formats) stays inside the adapter.

pub mod anthropic;
pub mod gemini;
pub mod openai;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;

// Errors.

/// Failure reported by a provider adapter during a generation call.
///
/// Every variant makes the attempt eligible for fallback to the next
/// candidate provider. Failing to parse an otherwise successful reply is not
/// a provider error and is handled separately by the extraction layer.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport-level failure before a usable response arrived.
    #[error("network error: {0}")]
    Network(String),
    /// The provider rejected the configured credentials.
    #[error("authentication failed: {0}")]
    Auth(String),
    /// The provider throttled the request.
    #[error("rate limited: {0}")]
    RateLimited(String),
    /// The provider returned an API-level error for the request.
    #[error("provider API error: {0}")]
    Api(String),
    /// The provider answered, but the response carried no usable text.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
    /// The call did not complete within the configured deadline.
    #[error("provider call timed out after {0} seconds")]
    Timeout(u64),
}

// Functions.

/// Map an HTTP error status onto the provider error taxonomy.
///
/// Shared by the adapters that speak raw REST through `reqwest`.
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: String) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::Auth(body),
        429 => ProviderError::RateLimited(body),
        400..=599 => ProviderError::Api(format!("HTTP {status}: {body}")),
        _ => ProviderError::Network(format!("HTTP {status}: {body}")),
    }
}

// Traits.

/// Generic model client trait that provider adapters must implement.
///
/// This trait defines the core functionality for interacting with large
/// language models. Implementing this trait allows different providers to be
/// used interchangeably by the analyzer.
#[async_trait]
pub trait GenericModelClient: Send + Sync + 'static {
    /// Execute one generation call and return the model's raw text output.
    ///
    /// The output is returned untouched; callers own any parsing of it.
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, ProviderError>;
}

// Structs.

/// Model client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ModelClient {
    inner: Arc<dyn GenericModelClient>,
}

impl Deref for ModelClient {
    type Target = dyn GenericModelClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ModelClient {
    /// Wrap any [`GenericModelClient`] implementation.
    pub fn new(inner: Arc<dyn GenericModelClient>) -> Self {
        Self { inner }
    }
}
