use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::core::{ProviderId, QcError, ResolverConfig};
use crate::symbol::MarketRules;

use super::QuoteProvider;
use super::alpha_vantage::AlphaVantageProvider;
use super::finnhub::FinnhubProvider;
use super::nse::NseProvider;
use super::twelve_data::TwelveDataProvider;
use super::yahoo::YahooProvider;

/// Adapters by id. Chains are assembled from it in configured order.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderId, Arc<dyn QuoteProvider>>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every enabled built-in adapter from `cfg`.
    ///
    /// Adapters that need an API key are built even without one; they report
    /// `MissingCredentials` without touching the network.
    ///
    /// # Errors
    /// Returns `QcError` if an adapter's base URL or HTTP client is invalid.
    pub fn from_config(cfg: &ResolverConfig, rules: &MarketRules) -> Result<Self, QcError> {
        let mut registry = Self::new();
        for id in ProviderId::builtin() {
            let settings = cfg.provider(&id);
            if !settings.enabled {
                info!(provider = %id, "provider disabled, skipping");
                continue;
            }
            let provider: Arc<dyn QuoteProvider> = match id.as_str() {
                "yahoo" => Arc::new(YahooProvider::new(&settings, rules.clone())?),
                "nse" => Arc::new(NseProvider::new(&settings)?),
                "finnhub" => Arc::new(FinnhubProvider::new(&settings, rules.clone())?),
                "alpha_vantage" => Arc::new(AlphaVantageProvider::new(&settings, rules.clone())?),
                "twelve_data" => Arc::new(TwelveDataProvider::new(&settings, rules.clone())?),
                _ => continue,
            };
            registry.insert(provider);
        }
        Ok(registry)
    }

    /// Register an adapter, replacing any adapter with the same id.
    pub fn insert(&mut self, provider: Arc<dyn QuoteProvider>) -> Option<Arc<dyn QuoteProvider>> {
        self.providers.insert(provider.id(), provider)
    }

    #[must_use]
    pub fn get(&self, id: &ProviderId) -> Option<&Arc<dyn QuoteProvider>> {
        self.providers.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Resolve an ordered id list into adapters. Ids disabled in `cfg` are
    /// dropped; duplicates keep their first position.
    ///
    /// # Errors
    /// `QcError::UnknownProvider` if an enabled id has no registered adapter.
    pub fn chain(
        &self,
        ids: &[ProviderId],
        cfg: &ResolverConfig,
    ) -> Result<Vec<Arc<dyn QuoteProvider>>, QcError> {
        let mut out: Vec<Arc<dyn QuoteProvider>> = Vec::with_capacity(ids.len());
        for id in ids {
            if !cfg.provider(id).enabled || out.iter().any(|p| p.id() == *id) {
                continue;
            }
            let provider = self
                .providers
                .get(id)
                .ok_or_else(|| QcError::UnknownProvider(id.to_string()))?;
            out.push(Arc::clone(provider));
        }
        Ok(out)
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&str> = self.providers.keys().map(ProviderId::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("ProviderRegistry").field("providers", &ids).finish()
    }
}
