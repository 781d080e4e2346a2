//! Single-symbol resolution: ordered provider chain, then the static store.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tracing::{debug, error, info, warn};

use crate::core::{ProviderResult, Quote, Resolution, Unavailable};
use crate::fallback::StaticFallbackStore;
use crate::provider::QuoteProvider;
use crate::symbol::MarketRules;

/// Priority lists per symbol class.
///
/// Indices (`^…`) use `index`, symbols with a domestic suffix use `domestic`,
/// everything else uses `global`.
#[derive(Clone, Default, Debug)]
pub struct ProviderChain {
    pub domestic: Vec<Arc<dyn QuoteProvider>>,
    pub global: Vec<Arc<dyn QuoteProvider>>,
    pub index: Vec<Arc<dyn QuoteProvider>>,
}

impl ProviderChain {
    /// The same order for every symbol class.
    #[must_use]
    pub fn uniform(providers: Vec<Arc<dyn QuoteProvider>>) -> Self {
        Self {
            domestic: providers.clone(),
            global: providers.clone(),
            index: providers,
        }
    }

    #[must_use]
    pub fn for_symbol(&self, symbol: &str, rules: &MarketRules) -> &[Arc<dyn QuoteProvider>] {
        if symbol.starts_with('^') {
            &self.index
        } else if rules.domestic_suffix_of(symbol).is_some() {
            &self.domestic
        } else {
            &self.global
        }
    }
}

/// Tries adapters in order and stops at the first valid quote.
///
/// Adapter failures, timeouts and panics are absorbed here; callers only
/// ever see a [`Resolution`].
#[derive(Debug)]
pub struct FallbackResolver {
    chain: ProviderChain,
    store: Arc<StaticFallbackStore>,
    rules: MarketRules,
    symbol_budget: Option<Duration>,
}

impl FallbackResolver {
    #[must_use]
    pub fn new(chain: ProviderChain, store: Arc<StaticFallbackStore>, rules: MarketRules) -> Self {
        Self {
            chain,
            store,
            rules,
            symbol_budget: None,
        }
    }

    /// Hard wall-clock cap per symbol. Without it the cap is the sum of the
    /// chain's adapter timeouts.
    #[must_use]
    pub const fn with_symbol_budget(mut self, budget: Duration) -> Self {
        self.symbol_budget = Some(budget);
        self
    }

    #[must_use]
    pub fn chain_for(&self, symbol: &str) -> &[Arc<dyn QuoteProvider>] {
        self.chain.for_symbol(symbol, &self.rules)
    }

    #[must_use]
    pub fn budget_for(&self, chain: &[Arc<dyn QuoteProvider>]) -> Duration {
        self.symbol_budget
            .unwrap_or_else(|| chain.iter().map(|p| p.timeout()).sum())
    }

    pub(crate) const fn store(&self) -> &Arc<StaticFallbackStore> {
        &self.store
    }

    /// Resolve one canonical symbol.
    ///
    /// Returns a live quote from the first adapter that yields one, else a
    /// `mock` quote from the static store, else `SymbolNotFound`.
    #[tracing::instrument(skip(self), fields(symbol = %symbol))]
    pub async fn resolve(&self, symbol: &str) -> Resolution {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Resolution::not_found(symbol);
        }
        if let Some(q) = self.resolve_live(symbol).await {
            return Resolution::Resolved(q);
        }
        self.resolve_static(symbol)
    }

    /// The live part of [`resolve`](Self::resolve): the chain under the
    /// per-symbol budget, without the static store.
    pub(crate) async fn resolve_live(&self, symbol: &str) -> Option<Quote> {
        let chain = self.chain_for(symbol);
        let budget = self.budget_for(chain);
        match tokio::time::timeout(budget, try_chain(chain, symbol)).await {
            Ok(found) => found,
            Err(_) => {
                warn!(
                    symbol,
                    budget_ms = budget.as_millis() as u64,
                    "symbol budget exhausted"
                );
                None
            }
        }
    }

    pub(crate) fn resolve_static(&self, symbol: &str) -> Resolution {
        match self.store.lookup(symbol) {
            Some(q) => {
                warn!(symbol, "all providers failed; using static fallback data");
                Resolution::Resolved(q)
            }
            None => {
                info!(symbol, "no provider or fallback data for symbol");
                Resolution::not_found(symbol)
            }
        }
    }
}

async fn try_chain(chain: &[Arc<dyn QuoteProvider>], symbol: &str) -> Option<Quote> {
    for provider in chain {
        let id = provider.id();
        debug!(provider = %id, symbol, "trying provider");
        match attempt(provider.as_ref(), symbol).await {
            ProviderResult::Found(q) if accept(&q) => {
                debug!(provider = %id, symbol, price = %q.price, "provider returned quote");
                return Some(q);
            }
            ProviderResult::Found(q) => {
                warn!(
                    provider = %id,
                    symbol,
                    price = %q.price,
                    source = %q.source,
                    "discarding unusable quote; trying next"
                );
            }
            ProviderResult::Unavailable(Unavailable::Panicked(msg)) => {
                error!(provider = %id, symbol, panic = %msg, "provider panicked; trying next");
            }
            ProviderResult::Unavailable(reason) => {
                info!(provider = %id, symbol, %reason, "provider unavailable; trying next");
            }
        }
    }
    None
}

/// Live quotes must carry a positive price and must not claim to be mock.
pub(crate) fn accept(q: &Quote) -> bool {
    q.is_valid() && !q.is_mock()
}

/// One adapter call under its own timeout, with panics turned into
/// `Unavailable::Panicked`.
pub(crate) async fn attempt(provider: &dyn QuoteProvider, symbol: &str) -> ProviderResult {
    let call = AssertUnwindSafe(async {
        tokio::time::timeout(provider.timeout(), provider.fetch(symbol)).await
    });
    match call.catch_unwind().await {
        Ok(Ok(result)) => result,
        Ok(Err(_elapsed)) => ProviderResult::Unavailable(Unavailable::Timeout),
        Err(payload) => ProviderResult::Unavailable(Unavailable::Panicked(panic_message(&*payload))),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
