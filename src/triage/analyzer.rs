//! The ticket analyzer: selection, invocation, extraction, and fallback.

use std::{sync::Arc, time::Duration};

use tokio::time::timeout;
use tracing::{info, instrument, warn};

use super::{
    extract::extract_analysis,
    registry::{ProviderEntry, ProviderRegistry},
    selector::{self, RandomSource, ThreadRandom},
};
use crate::{
    base::{
        config::Config,
        prompts,
        types::{Res, Ticket, TicketAnalysis},
    },
    service::llm::ProviderError,
};

/// Ticket analyzer for the application.
///
/// Owns the provider registry and the random source behind weighted
/// selection. This is trivially cloneable and can be passed around without
/// the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct TicketAnalyzer {
    config: Config,
    registry: ProviderRegistry,
    rng: Arc<dyn RandomSource>,
}

impl TicketAnalyzer {
    /// Create an analyzer with providers built from configuration.
    #[instrument(name = "TicketAnalyzer::new", skip_all)]
    pub fn new(config: Config) -> Res<Self> {
        let registry = ProviderRegistry::from_config(&config)?;

        Ok(Self::with_parts(config, registry, Arc::new(ThreadRandom)))
    }

    /// Create an analyzer from pre-built parts.
    pub fn with_parts(config: Config, registry: ProviderRegistry, rng: Arc<dyn RandomSource>) -> Self {
        Self { config, registry, rng }
    }

    /// Analyze one support ticket.
    ///
    /// One provider is chosen by weighted random selection; if its call
    /// fails, the remaining providers are tried in registry order, each at
    /// most once. Returns `None` when every candidate fails, or when a reply
    /// arrives but cannot be parsed and parse failover is disabled.
    #[instrument(name = "TicketAnalyzer::analyze_ticket", skip_all)]
    pub async fn analyze_ticket(&self, ticket: &Ticket) -> Option<TicketAnalysis> {
        let system = prompts::get_system_directive(&self.config);
        let prompt = prompts::build_ticket_prompt(ticket);

        let primary = selector::select(&self.registry, self.rng.as_ref());
        let plan = self.registry.candidate_plan(primary);

        info!("Analyzing ticket {:?} with provider {primary} ({} candidate(s)).", ticket.title, plan.len());

        for (attempt, id) in plan.iter().enumerate() {
            let Some(entry) = self.registry.get(*id) else { continue };

            let raw = match self.invoke(entry, system, &prompt).await {
                Ok(raw) => raw,
                Err(err) => {
                    warn!("Provider {id} failed on attempt {}/{}: {err}", attempt + 1, plan.len());
                    continue;
                }
            };

            match extract_analysis(&raw) {
                Ok(analysis) => {
                    info!("Provider {id} produced an analysis with priority {:?}.", analysis.priority);
                    return Some(analysis);
                }
                Err(err) => {
                    warn!("Could not parse the reply from provider {id}: {err}");

                    if self.config.parse_failover {
                        continue;
                    }

                    // Parse failures are terminal unless failover is enabled.
                    return None;
                }
            }
        }

        warn!("No provider produced an analysis for ticket {:?}.", ticket.title);

        None
    }

    /// One provider invocation under the configured deadline.
    async fn invoke(&self, entry: &ProviderEntry, system: &str, prompt: &str) -> Result<String, ProviderError> {
        let deadline = Duration::from_secs(self.config.request_timeout_secs);

        match timeout(deadline, entry.client.generate(system, prompt)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.config.request_timeout_secs)),
        }
    }
}
