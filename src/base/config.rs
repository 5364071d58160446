//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use super::types::{Res, Void};

/// Default Gemini model to use
fn default_gemini_model() -> String {
    "gemini-1.5-flash-8b".to_string()
}

/// Default OpenAI model to use
fn default_openai_model() -> String {
    "gpt-4.1-mini".to_string()
}

/// Default Anthropic model to use
fn default_anthropic_model() -> String {
    "claude-3-5-haiku-latest".to_string()
}

/// Default selection weight for the Gemini provider
fn default_gemini_weight() -> f64 {
    0.4
}

/// Default selection weight for the OpenAI provider
fn default_openai_weight() -> f64 {
    0.4
}

/// Default selection weight for the Anthropic provider
fn default_anthropic_weight() -> f64 {
    0.2
}

/// Default sampling temperature for analysis calls
fn default_temperature() -> f32 {
    0.2
}

/// Default max output tokens for analysis calls
fn default_max_tokens() -> u32 {
    1024
}

/// Default per-call deadline, in seconds
fn default_request_timeout_secs() -> u64 {
    120
}

/// Configuration for the ticket analyzer.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// Gemini API key (`TICKET_TRIAGE_GEMINI_API_KEY`). Unset disables the provider.
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    /// OpenAI API key (`TICKET_TRIAGE_OPENAI_API_KEY`). Unset disables the provider.
    #[serde(default)]
    pub openai_api_key: Option<String>,
    /// Anthropic API key (`TICKET_TRIAGE_ANTHROPIC_API_KEY`). Unset disables the provider.
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    /// Gemini model to use (`TICKET_TRIAGE_GEMINI_MODEL`).
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    /// OpenAI model to use (`TICKET_TRIAGE_OPENAI_MODEL`).
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    /// Anthropic model to use (`TICKET_TRIAGE_ANTHROPIC_MODEL`).
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    /// Selection weight for Gemini (`TICKET_TRIAGE_GEMINI_WEIGHT`).
    /// Value between 0 and 1. Weights across providers should sum to 1; any
    /// uncovered remainder falls to the first configured provider.
    #[serde(default = "default_gemini_weight")]
    pub gemini_weight: f64,
    /// Selection weight for OpenAI (`TICKET_TRIAGE_OPENAI_WEIGHT`).
    /// Value between 0 and 1.
    #[serde(default = "default_openai_weight")]
    pub openai_weight: f64,
    /// Selection weight for Anthropic (`TICKET_TRIAGE_ANTHROPIC_WEIGHT`).
    /// Value between 0 and 1.
    #[serde(default = "default_anthropic_weight")]
    pub anthropic_weight: f64,
    /// Sampling temperature for analysis calls (`TICKET_TRIAGE_TEMPERATURE`).
    /// Value between 0 and 2. Higher values like 0.8 make output more random,
    /// while lower values like 0.2 make it more focused and deterministic.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Max output tokens for analysis calls (`TICKET_TRIAGE_MAX_TOKENS`).
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Per-call deadline in seconds (`TICKET_TRIAGE_REQUEST_TIMEOUT_SECS`).
    /// A call that exceeds the deadline counts as a provider failure and
    /// triggers fallback.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Whether an unparseable model reply advances to the next provider
    /// instead of ending the analysis (`TICKET_TRIAGE_PARSE_FAILOVER`).
    #[serde(default)]
    pub parse_failover: bool,
    /// Optional custom system directive to override the default (`TICKET_TRIAGE_SYSTEM_DIRECTIVE`).
    #[serde(default)]
    pub system_directive: Option<String>,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            openai_api_key: None,
            anthropic_api_key: None,
            gemini_model: default_gemini_model(),
            openai_model: default_openai_model(),
            anthropic_model: default_anthropic_model(),
            gemini_weight: default_gemini_weight(),
            openai_weight: default_openai_weight(),
            anthropic_weight: default_anthropic_weight(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
            parse_failover: false,
            system_directive: None,
        }
    }
}

impl ConfigInner {
    /// Check range constraints that deserialization cannot express.
    pub fn validate(&self) -> Void {
        for (name, weight) in [
            ("gemini", self.gemini_weight),
            ("openai", self.openai_weight),
            ("anthropic", self.anthropic_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(anyhow::anyhow!("Selection weight for {name} must be between 0 and 1."));
            }
        }

        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(anyhow::anyhow!("Temperature must be between 0 and 2."));
        }

        if self.max_tokens < 1 || self.max_tokens > 128000 {
            return Err(anyhow::anyhow!("Max tokens must be between 1 and 128000."));
        }

        if self.request_timeout_secs < 1 {
            return Err(anyhow::anyhow!("Request timeout must be at least 1 second."));
        }

        Ok(())
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("TICKET_TRIAGE"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }
}

// Tests.
