use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::bulk::{BulkResolver, BulkResult};
use crate::core::{
    Category, ProviderId, QcError, Quote, QuoteCache, Resolution, ResolverConfig, Source,
};
use crate::fallback::StaticFallbackStore;
use crate::provider::{ProviderRegistry, QuoteProvider};
use crate::resolver::{FallbackResolver, ProviderChain};
use crate::symbol::{MarketRules, SymbolNormalizer, index_name};

/// What a search hit refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchKind {
    Index,
    Equity,
}

/// A single search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub symbol: String,
    pub name: String,
    pub kind: SearchKind,
}

/// The entry point: normalizer, resolver, bulk path and static store wired
/// together from one [`ResolverConfig`].
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
#[derive(Debug)]
pub struct QuoteService {
    normalizer: SymbolNormalizer,
    resolver: Arc<FallbackResolver>,
    bulk: BulkResolver,
}

impl QuoteService {
    #[must_use]
    pub fn builder() -> QuoteServiceBuilder {
        QuoteServiceBuilder::default()
    }

    /// Build with the built-in adapters and the curated fallback store.
    ///
    /// # Errors
    /// See [`QuoteServiceBuilder::build`].
    pub fn from_config(config: ResolverConfig) -> Result<Self, QcError> {
        Self::builder().config(config).build()
    }

    /// Canonical form of `raw` (no network).
    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        self.normalizer.normalize(raw)
    }

    /// Resolve one symbol as typed by the user.
    pub async fn resolve_quote(&self, symbol: &str) -> Resolution {
        let canonical = self.normalizer.normalize(symbol);
        self.resolver.resolve(&canonical).await
    }

    /// Resolve many symbols; one entry per deduplicated canonical symbol.
    pub async fn resolve_quotes<I, S>(&self, symbols: I) -> BulkResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.bulk
            .resolve_many(symbols, &CancellationToken::new())
            .await
    }

    /// As [`resolve_quotes`](Self::resolve_quotes), stopping early when
    /// `cancel` fires. Unfinished symbols are tagged `Cancelled`.
    pub async fn resolve_quotes_with_cancel<I, S>(
        &self,
        symbols: I,
        cancel: CancellationToken,
    ) -> BulkResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.bulk.resolve_many(symbols, &cancel).await
    }

    /// Curated view for a category name (`"stock"`, `"crypto"`, `"etf"`,
    /// `"mutual_fund"`, `"bond"`). Unknown names yield an empty list.
    pub async fn top_assets(&self, category: &str) -> Vec<Quote> {
        match category.parse::<Category>() {
            Ok(c) => self.bulk.top_assets(c).await,
            Err(e) => {
                warn!(error = %e, "top assets requested for unknown category");
                Vec::new()
            }
        }
    }

    /// Well-known index names map straight to their symbol; anything else is
    /// resolved and reported as an equity when a live or curated quote exists.
    #[tracing::instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Vec<SearchHit> {
        let canonical = self.normalizer.normalize(query);
        if canonical.trim().is_empty() {
            return Vec::new();
        }
        if let Some(name) = index_name(&canonical) {
            return vec![SearchHit {
                symbol: canonical,
                name: name.to_string(),
                kind: SearchKind::Index,
            }];
        }

        match self.resolver.resolve(&canonical).await {
            Resolution::Resolved(q) => {
                let kind = if q.symbol.starts_with('^') {
                    SearchKind::Index
                } else {
                    SearchKind::Equity
                };
                vec![SearchHit {
                    name: q.name.unwrap_or_else(|| q.symbol.clone()),
                    symbol: q.symbol,
                    kind,
                }]
            }
            Resolution::Failed { .. } => Vec::new(),
        }
    }
}

/// Builder for [`QuoteService`].
#[derive(Default)]
pub struct QuoteServiceBuilder {
    config: Option<ResolverConfig>,
    providers: Vec<Arc<dyn QuoteProvider>>,
    skip_builtin: bool,
    store: Option<Arc<StaticFallbackStore>>,
}

impl QuoteServiceBuilder {
    #[must_use]
    pub fn config(mut self, config: ResolverConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Register an adapter. It replaces a built-in adapter with the same id,
    /// or adds a new id that chains can reference.
    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn QuoteProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Skip the built-in adapters; only registered ones are available.
    #[must_use]
    pub const fn without_builtin_providers(mut self) -> Self {
        self.skip_builtin = true;
        self
    }

    /// Replace the curated fallback dataset.
    #[must_use]
    pub fn fallback_store(mut self, store: Arc<StaticFallbackStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// # Errors
    /// - `QcError::Config` if the configuration is inconsistent or a
    ///   registered adapter uses the reserved id `"mock"`.
    /// - `QcError::UnknownProvider` if a chain names an id with no adapter.
    /// - `QcError::Url` / `QcError::Http` if a built-in adapter cannot be built.
    pub fn build(self) -> Result<QuoteService, QcError> {
        let cfg = self.config.unwrap_or_default();
        cfg.validate()?;

        let rules = MarketRules::from_config(&cfg);
        let mut registry = if self.skip_builtin {
            ProviderRegistry::new()
        } else {
            ProviderRegistry::from_config(&cfg, &rules)?
        };
        for p in self.providers {
            let id = p.id();
            if id.as_str() == Source::MOCK_ID {
                return Err(QcError::Config(format!(
                    "provider id \"{id}\" is reserved for the static fallback"
                )));
            }
            registry.insert(p);
        }

        let chain = ProviderChain {
            domestic: registry.chain(&cfg.domestic_chain, &cfg)?,
            global: registry.chain(&cfg.global_chain, &cfg)?,
            index: registry.chain(&cfg.index_chain, &cfg)?,
        };
        for (name, providers) in [
            ("domestic", &chain.domestic),
            ("global", &chain.global),
            ("index", &chain.index),
        ] {
            if providers.is_empty() {
                warn!(chain = name, "every provider in chain is disabled; static data only");
            }
        }

        let chain_heads: Vec<ProviderId> = [&chain.domestic, &chain.global, &chain.index]
            .into_iter()
            .filter_map(|c| c.first().map(|head| head.id()))
            .collect();

        let store = self
            .store
            .unwrap_or_else(|| StaticFallbackStore::curated_for(&rules));
        let mut resolver = FallbackResolver::new(chain, store, rules);
        if let Some(budget) = cfg.symbol_budget() {
            resolver = resolver.with_symbol_budget(budget);
        }
        let resolver = Arc::new(resolver);

        let normalizer = SymbolNormalizer::new(&cfg);
        let mut bulk = BulkResolver::new(Arc::clone(&resolver), normalizer.clone())
            .with_concurrency(cfg.bulk_concurrency)
            .with_category_min_fill(cfg.category_min_fill);
        if let Some(id) = &cfg.batch_provider
            && cfg.provider(id).enabled
        {
            let provider = registry
                .get(id)
                .ok_or_else(|| QcError::UnknownProvider(id.to_string()))?;
            if chain_heads.contains(id) {
                bulk = bulk.with_batch_provider(Arc::clone(provider));
            } else {
                warn!(provider = %id, "batch provider leads no chain; batch path disabled");
            }
        }
        if let Some(ttl) = cfg.cache_ttl() {
            bulk = bulk.with_cache(Arc::new(QuoteCache::new(ttl)));
        }

        Ok(QuoteService {
            normalizer,
            resolver,
            bulk,
        })
    }
}
