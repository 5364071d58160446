//! Weighted random provider selection.

use rand::Rng;

use super::registry::{ProviderId, ProviderRegistry};

// Traits.

/// Uniform random source behind weighted selection.
///
/// Injected explicitly so selection is deterministic under test; production
/// code draws from the thread-local generator.
pub trait RandomSource: Send + Sync {
    /// Draw the next value, uniform over `[0, 1)`.
    fn draw(&self) -> f64;
}

// Structs.

/// The thread-local `rand` generator as a [`RandomSource`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn draw(&self) -> f64 {
        rand::thread_rng().gen_range(0.0..1.0)
    }
}

// Functions.

/// Pick one provider by weighted random choice.
///
/// Walks the registry in enumeration order accumulating weights and returns
/// the first entry whose cumulative weight reaches the drawn value. A draw
/// beyond the covered range (possible when weights sum to less than one)
/// falls to the registry's first entry.
pub fn select(registry: &ProviderRegistry, rng: &dyn RandomSource) -> ProviderId {
    let r = rng.draw();
    let mut sum = 0.0;

    for entry in registry.entries() {
        sum += entry.weight;

        if r <= sum {
            return entry.id;
        }
    }

    registry.entries()[0].id
}

// Tests.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::{
        service::llm::{GenericModelClient, ModelClient, ProviderError},
        triage::registry::ProviderEntry,
    };

    struct StaticModel;

    #[async_trait]
    impl GenericModelClient for StaticModel {
        async fn generate(&self, _system: &str, _prompt: &str) -> Result<String, ProviderError> {
            Ok("{}".to_string())
        }
    }

    struct FixedRandom(f64);

    impl RandomSource for FixedRandom {
        fn draw(&self) -> f64 {
            self.0
        }
    }

    fn registry() -> ProviderRegistry {
        let entry = |id, weight| ProviderEntry {
            id,
            client: ModelClient::new(Arc::new(StaticModel)),
            weight,
        };

        ProviderRegistry::from_parts(vec![
            entry(ProviderId::Gemini, 0.4),
            entry(ProviderId::OpenAi, 0.4),
            entry(ProviderId::Anthropic, 0.2),
        ])
        .unwrap()
    }

    #[test]
    fn draw_in_first_band_selects_first_provider() {
        assert_eq!(select(&registry(), &FixedRandom(0.3)), ProviderId::Gemini);
    }

    #[test]
    fn draw_in_second_band_selects_second_provider() {
        assert_eq!(select(&registry(), &FixedRandom(0.75)), ProviderId::OpenAi);
    }

    #[test]
    fn draw_in_third_band_selects_third_provider() {
        assert_eq!(select(&registry(), &FixedRandom(0.95)), ProviderId::Anthropic);
    }

    #[test]
    fn draw_beyond_covered_range_falls_to_first_provider() {
        assert_eq!(select(&registry(), &FixedRandom(1.05)), ProviderId::Gemini);
    }

    #[test]
    fn zero_draw_selects_first_provider() {
        assert_eq!(select(&registry(), &FixedRandom(0.0)), ProviderId::Gemini);
    }

    #[test]
    fn single_provider_is_always_selected() {
        let single = ProviderRegistry::from_parts(vec![ProviderEntry {
            id: ProviderId::Anthropic,
            client: ModelClient::new(Arc::new(StaticModel)),
            weight: 1.0,
        }])
        .unwrap();

        for draw in [0.0, 0.3, 0.99] {
            assert_eq!(select(&single, &FixedRandom(draw)), ProviderId::Anthropic);
        }
    }

    #[test]
    fn thread_random_stays_in_unit_interval() {
        let rng = ThreadRandom;

        for _ in 0..1000 {
            let draw = rng.draw();
            assert!((0.0..1.0).contains(&draw));
        }
    }
}
