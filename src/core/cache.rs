use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::core::models::Quote;

#[derive(Debug)]
struct CacheEntry {
    quote: Quote,
    expires_at: Instant,
}

/// Short-lived cache of live quotes keyed by canonical symbol.
///
/// Only quotes from live providers are stored; static fallback quotes are
/// never cached so a recovering provider is picked up on the next request.
#[derive(Debug)]
pub struct QuoteCache {
    map: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl QuoteCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            map: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// A fresh quote for `symbol`, if one was stored within the TTL.
    pub async fn get(&self, symbol: &str) -> Option<Quote> {
        let guard = self.map.read().await;
        if let Some(entry) = guard.get(symbol)
            && Instant::now() <= entry.expires_at
        {
            return Some(entry.quote.clone());
        }
        None
    }

    /// Store a live quote. Mock quotes are ignored.
    pub async fn put(&self, quote: &Quote) {
        if quote.is_mock() || !quote.is_valid() {
            return;
        }
        let entry = CacheEntry {
            quote: quote.clone(),
            expires_at: Instant::now() + self.ttl,
        };
        let mut guard = self.map.write().await;
        guard.retain(|_, e| Instant::now() <= e.expires_at);
        guard.insert(quote.symbol.clone(), entry);
    }
}
