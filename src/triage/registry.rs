//! Immutable registry of configured model providers.

use std::fmt;

use tracing::{info, instrument, warn};

use crate::{
    base::{config::Config, types::Res},
    service::llm::ModelClient,
};

// Types.

/// Identity of a model provider known to the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Gemini,
    OpenAi,
    Anthropic,
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderId::Gemini => "gemini",
            ProviderId::OpenAi => "openai",
            ProviderId::Anthropic => "anthropic",
        };

        write!(f, "{name}")
    }
}

// Structs.

/// One registry entry: a provider identity, its client, and its selection weight.
#[derive(Clone)]
pub struct ProviderEntry {
    pub id: ProviderId,
    pub client: ModelClient,
    pub weight: f64,
}

/// Immutable table of the model backends available to the analyzer.
///
/// Entry order is fixed at construction and is the enumeration order used by
/// weighted selection and by fallback candidate plans. The registry is never
/// mutated after construction; a provider failure changes which entry is
/// consulted, never the entries themselves.
#[derive(Clone)]
pub struct ProviderRegistry {
    entries: Vec<ProviderEntry>,
}

impl ProviderRegistry {
    /// Build the registry from configuration.
    ///
    /// A provider participates iff its API key is configured. A key that is
    /// set but empty is rejected here, at startup, rather than surfacing later
    /// as an opaque call failure.
    #[instrument(name = "ProviderRegistry::from_config", skip_all)]
    pub fn from_config(config: &Config) -> Res<Self> {
        let mut entries = Vec::new();

        if let Some(key) = &config.gemini_api_key {
            if key.is_empty() {
                return Err(anyhow::anyhow!("Gemini API key is set but empty."));
            }

            entries.push(ProviderEntry {
                id: ProviderId::Gemini,
                client: ModelClient::gemini(config),
                weight: config.gemini_weight,
            });
        }

        if let Some(key) = &config.openai_api_key {
            if key.is_empty() {
                return Err(anyhow::anyhow!("OpenAI API key is set but empty."));
            }

            entries.push(ProviderEntry {
                id: ProviderId::OpenAi,
                client: ModelClient::openai(config),
                weight: config.openai_weight,
            });
        }

        if let Some(key) = &config.anthropic_api_key {
            if key.is_empty() {
                return Err(anyhow::anyhow!("Anthropic API key is set but empty."));
            }

            entries.push(ProviderEntry {
                id: ProviderId::Anthropic,
                client: ModelClient::anthropic(config),
                weight: config.anthropic_weight,
            });
        }

        let registry = Self::from_parts(entries)?;

        info!("Provider registry holds {} provider(s).", registry.len());

        Ok(registry)
    }

    /// Build a registry from pre-built entries.
    ///
    /// Rejects an empty entry list; every other aspect of the entries is
    /// taken as given, so tests can register stub clients with any weights.
    pub fn from_parts(entries: Vec<ProviderEntry>) -> Res<Self> {
        if entries.is_empty() {
            return Err(anyhow::anyhow!("No model providers are configured; set at least one API key."));
        }

        let total: f64 = entries.iter().map(|entry| entry.weight).sum();
        if (total - 1.0).abs() > 1e-6 {
            warn!("Provider weights sum to {total} rather than 1.0; draws beyond the covered range fall to {}.", entries[0].id);
        }

        Ok(Self { entries })
    }

    /// The registry entries in enumeration order.
    pub fn entries(&self) -> &[ProviderEntry] {
        &self.entries
    }

    /// Look up an entry by provider identity.
    pub fn get(&self, id: ProviderId) -> Option<&ProviderEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no providers. Construction forbids this, so
    /// it only exists to pair with [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Candidate order for one analysis call: the primary first, then every
    /// other entry in registry order. The plan length equals the provider
    /// count, which caps attempts per call.
    pub fn candidate_plan(&self, primary: ProviderId) -> Vec<ProviderId> {
        let mut plan = vec![primary];
        plan.extend(self.entries.iter().map(|entry| entry.id).filter(|id| *id != primary));

        plan
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::{
        base::config::ConfigInner,
        service::llm::{GenericModelClient, ProviderError},
    };

    struct StaticModel;

    #[async_trait]
    impl GenericModelClient for StaticModel {
        async fn generate(&self, _system: &str, _prompt: &str) -> Result<String, ProviderError> {
            Ok("{}".to_string())
        }
    }

    fn entry(id: ProviderId, weight: f64) -> ProviderEntry {
        ProviderEntry {
            id,
            client: ModelClient::new(Arc::new(StaticModel)),
            weight,
        }
    }

    #[test]
    fn empty_registry_is_rejected() {
        assert!(ProviderRegistry::from_parts(vec![]).is_err());
    }

    #[test]
    fn from_config_registers_only_keyed_providers() {
        let config = Config {
            inner: Arc::new(ConfigInner {
                openai_api_key: Some("sk-test".to_string()),
                ..Default::default()
            }),
        };

        let registry = ProviderRegistry::from_config(&config).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.entries()[0].id, ProviderId::OpenAi);
    }

    #[test]
    fn from_config_preserves_declaration_order() {
        let config = Config {
            inner: Arc::new(ConfigInner {
                gemini_api_key: Some("g".to_string()),
                openai_api_key: Some("o".to_string()),
                anthropic_api_key: Some("a".to_string()),
                ..Default::default()
            }),
        };

        let registry = ProviderRegistry::from_config(&config).unwrap();
        let order: Vec<_> = registry.entries().iter().map(|entry| entry.id).collect();

        assert_eq!(order, vec![ProviderId::Gemini, ProviderId::OpenAi, ProviderId::Anthropic]);
    }

    #[test]
    fn from_config_rejects_empty_key() {
        let config = Config {
            inner: Arc::new(ConfigInner {
                gemini_api_key: Some(String::new()),
                openai_api_key: Some("o".to_string()),
                ..Default::default()
            }),
        };

        assert!(ProviderRegistry::from_config(&config).is_err());
    }

    #[test]
    fn from_config_rejects_no_keys() {
        let config = Config {
            inner: Arc::new(ConfigInner::default()),
        };

        assert!(ProviderRegistry::from_config(&config).is_err());
    }

    #[test]
    fn candidate_plan_starts_with_primary_and_covers_all() {
        let registry = ProviderRegistry::from_parts(vec![
            entry(ProviderId::Gemini, 0.4),
            entry(ProviderId::OpenAi, 0.4),
            entry(ProviderId::Anthropic, 0.2),
        ])
        .unwrap();

        let plan = registry.candidate_plan(ProviderId::OpenAi);

        assert_eq!(plan, vec![ProviderId::OpenAi, ProviderId::Gemini, ProviderId::Anthropic]);
        assert_eq!(plan.len(), registry.len());
    }

    #[test]
    fn candidate_plan_for_single_provider_has_one_entry() {
        let registry = ProviderRegistry::from_parts(vec![entry(ProviderId::Gemini, 1.0)]).unwrap();

        assert_eq!(registry.candidate_plan(ProviderId::Gemini), vec![ProviderId::Gemini]);
    }
}
