//! Multi-symbol resolution with per-symbol failure isolation.
//!
//! Inputs are normalized and deduplicated, answered from the optional cache,
//! then from one batch request for the symbols whose chain is led by the
//! batch-capable adapter, and finally symbol by symbol through the
//! [`FallbackResolver`] with bounded concurrency. Every deduplicated symbol
//! gets exactly one entry.

use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::{FutureExt, StreamExt};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::core::{Category, Failure, ProviderResult, Quote, QuoteCache, Resolution};
use crate::provider::QuoteProvider;
use crate::resolver::{FallbackResolver, accept, panic_message};
use crate::symbol::SymbolNormalizer;

/// One entry per deduplicated canonical symbol.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct BulkResult {
    entries: HashMap<String, Resolution>,
    #[serde(skip)]
    inputs: Vec<(String, String)>,
}

impl BulkResult {
    /// Entry for a canonical symbol.
    #[must_use]
    pub fn get(&self, canonical: &str) -> Option<&Resolution> {
        self.entries.get(canonical)
    }

    /// Entry for a symbol exactly as the caller passed it.
    #[must_use]
    pub fn get_raw(&self, raw: &str) -> Option<&Resolution> {
        self.inputs
            .iter()
            .find(|(r, _)| r == raw)
            .and_then(|(_, canonical)| self.entries.get(canonical))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical symbols present in the result.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(raw, canonical)` pairs in input order, duplicates included.
    #[must_use]
    pub fn inputs(&self) -> &[(String, String)] {
        &self.inputs
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resolution)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn quotes(&self) -> impl Iterator<Item = &Quote> {
        self.entries.values().filter_map(Resolution::quote)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, Failure)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.failure().map(|f| (k.as_str(), f)))
    }

    /// Some symbols resolved and others did not.
    #[must_use]
    pub fn is_partial_failure(&self) -> bool {
        let failed = self.failures().count();
        failed > 0 && failed < self.entries.len()
    }

    #[must_use]
    pub fn into_map(self) -> HashMap<String, Resolution> {
        self.entries
    }
}

/// Resolves many symbols at once and backs the curated category views.
#[derive(Debug)]
pub struct BulkResolver {
    resolver: Arc<FallbackResolver>,
    normalizer: SymbolNormalizer,
    batch: Option<Arc<dyn QuoteProvider>>,
    concurrency: usize,
    cache: Option<Arc<QuoteCache>>,
    category_min_fill: usize,
}

impl BulkResolver {
    #[must_use]
    pub fn new(resolver: Arc<FallbackResolver>, normalizer: SymbolNormalizer) -> Self {
        Self {
            resolver,
            normalizer,
            batch: None,
            concurrency: 8,
            cache: None,
            category_min_fill: 2,
        }
    }

    /// Adapter used for the one-request fast path.
    #[must_use]
    pub fn with_batch_provider(mut self, provider: Arc<dyn QuoteProvider>) -> Self {
        self.batch = Some(provider);
        self
    }

    /// Bound on concurrent per-symbol resolutions (at least 1).
    #[must_use]
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: Arc<QuoteCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    #[must_use]
    pub const fn with_category_min_fill(mut self, n: usize) -> Self {
        self.category_min_fill = n;
        self
    }

    /// Resolve every symbol in `symbols`.
    ///
    /// Cancelling `cancel` stops outstanding work; symbols that completed keep
    /// their result and the rest are tagged [`Failure::Cancelled`].
    #[tracing::instrument(skip_all, fields(requested))]
    pub async fn resolve_many<I, S>(&self, symbols: I, cancel: &CancellationToken) -> BulkResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut inputs = Vec::new();
        let mut unique = Vec::new();
        let mut seen = HashSet::new();
        for raw in symbols {
            let raw = raw.as_ref();
            let canonical = self.normalizer.normalize(raw);
            if seen.insert(canonical.clone()) {
                unique.push(canonical.clone());
            }
            inputs.push((raw.to_string(), canonical));
        }
        tracing::Span::current().record("requested", unique.len() as u64);

        let mut entries: HashMap<String, Resolution> = HashMap::with_capacity(unique.len());
        let mut pending = Vec::with_capacity(unique.len());
        let mut from_cache = HashSet::new();
        for symbol in unique {
            match self.cached(&symbol).await {
                Some(q) => {
                    from_cache.insert(symbol.clone());
                    entries.insert(symbol, Resolution::Resolved(q));
                }
                None => pending.push(symbol),
            }
        }

        if !pending.is_empty()
            && !cancel.is_cancelled()
            && let Some(batch) = &self.batch
        {
            let eligible = self.batch_eligible(batch.as_ref(), &pending);
            let found = tokio::select! {
                biased;
                () = cancel.cancelled() => Vec::new(),
                found = self.batch_fetch(batch.as_ref(), &eligible) => found,
            };
            for (symbol, q) in found {
                entries.insert(symbol, Resolution::Resolved(q));
            }
            pending.retain(|s| !entries.contains_key(s));
        }

        if !pending.is_empty() && !cancel.is_cancelled() {
            let resolver = &*self.resolver;
            let mut per_symbol = futures::stream::iter(pending.iter().cloned())
                .map(|symbol| async move {
                    let resolution = resolver.resolve(&symbol).await;
                    (symbol, resolution)
                })
                .buffer_unordered(self.concurrency);

            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    next = per_symbol.next() => match next {
                        Some((symbol, resolution)) => {
                            entries.insert(symbol, resolution);
                        }
                        None => break,
                    },
                }
            }
        }

        let mut cancelled = 0usize;
        for symbol in pending {
            entries.entry(symbol).or_insert_with_key(|k| {
                cancelled += 1;
                Resolution::cancelled(k.clone())
            });
        }
        if cancelled > 0 {
            info!(cancelled, "bulk resolution cancelled; remaining symbols tagged");
        }

        if let Some(cache) = &self.cache {
            for (symbol, resolution) in &entries {
                if let Some(q) = resolution.quote()
                    && !from_cache.contains(symbol)
                {
                    cache.put(q).await;
                }
            }
        }

        BulkResult { entries, inputs }
    }

    /// Curated view for `category`: live quotes for its symbol list, topped
    /// up from the static store when fewer than the minimum came back live.
    #[tracing::instrument(skip(self), fields(category = %category))]
    pub async fn top_assets(&self, category: Category) -> Vec<Quote> {
        let symbols = category.symbols();
        let result = self
            .resolve_many(symbols.iter().copied(), &CancellationToken::new())
            .await;

        let mut seen = HashSet::new();
        let mut out: Vec<Quote> = result
            .inputs()
            .iter()
            .filter_map(|(_, canonical)| result.get(canonical)?.quote())
            .filter(|q| seen.insert(q.symbol.clone()))
            .cloned()
            .collect();

        let live = out.iter().filter(|q| !q.is_mock()).count();
        if live < self.category_min_fill {
            info!(
                live,
                min = self.category_min_fill,
                "category view sparse; backfilling from static data"
            );
            for q in self.resolver.store().lookup_category(category) {
                if seen.insert(q.symbol.clone()) {
                    out.push(q);
                }
            }
        }
        out
    }

    /// Symbols whose chain starts with the batch adapter. A batch answer for
    /// any other symbol could outrank a higher-priority provider.
    fn batch_eligible(&self, provider: &dyn QuoteProvider, symbols: &[String]) -> Vec<String> {
        let id = provider.id();
        let (eligible, skipped): (Vec<String>, Vec<String>) =
            symbols.iter().cloned().partition(|s| {
                self.resolver
                    .chain_for(s)
                    .first()
                    .is_some_and(|head| head.id() == id)
            });
        if !skipped.is_empty() {
            debug!(
                provider = %id,
                skipped = skipped.len(),
                "batch adapter does not lead these chains; resolving per symbol"
            );
        }
        eligible
    }

    async fn cached(&self, symbol: &str) -> Option<Quote> {
        self.cache.as_ref()?.get(symbol).await
    }

    /// One batch call; only valid live quotes for requested symbols survive.
    async fn batch_fetch(
        &self,
        provider: &dyn QuoteProvider,
        symbols: &[String],
    ) -> Vec<(String, Quote)> {
        if !provider.supports_batch() {
            return Vec::new();
        }
        let wanted: Vec<String> = symbols
            .iter()
            .filter(|s| !s.trim().is_empty())
            .cloned()
            .collect();
        if wanted.is_empty() {
            return Vec::new();
        }

        let id = provider.id();
        let call = AssertUnwindSafe(async {
            tokio::time::timeout(provider.timeout(), provider.fetch_many(&wanted)).await
        });
        let results = match call.catch_unwind().await {
            Ok(Ok(results)) => results,
            Ok(Err(_elapsed)) => {
                info!(provider = %id, "batch request timed out; resolving per symbol");
                return Vec::new();
            }
            Err(payload) => {
                error!(
                    provider = %id,
                    panic = %panic_message(&*payload),
                    "batch provider panicked; resolving per symbol"
                );
                return Vec::new();
            }
        };

        let requested: HashSet<&str> = wanted.iter().map(String::as_str).collect();
        results
            .into_iter()
            .filter(|(symbol, _)| requested.contains(symbol.as_str()))
            .filter_map(|(symbol, result)| match result {
                ProviderResult::Found(q) if accept(&q) => Some((symbol, q)),
                ProviderResult::Found(q) => {
                    debug!(provider = %id, symbol = %symbol, price = %q.price, "batch returned unusable quote");
                    None
                }
                ProviderResult::Unavailable(reason) => {
                    debug!(provider = %id, symbol = %symbol, %reason, "batch miss");
                    None
                }
            })
            .collect()
    }
}
