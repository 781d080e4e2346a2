//! The static fallback store: curated quotes used only after every live
//! provider has missed, and as a backstop for sparse category views.
//!
//! The store is immutable once built and is shared behind an `Arc`, so
//! concurrent resolutions read it without locking.

mod data;

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::core::{Category, Market, Quote, Source};
use crate::symbol::{MarketRules, currency_for_symbol};

/// One curated price.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackRecord {
    pub symbol: String,
    pub market: Market,
    pub name: Option<String>,
    pub price: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
}

impl FallbackRecord {
    /// A record tagged with the market `rules` assign to `symbol`.
    #[must_use]
    pub fn new(symbol: impl Into<String>, price: Decimal, rules: &MarketRules) -> Self {
        let symbol = symbol.into();
        Self {
            market: rules.market_of(&symbol),
            symbol,
            name: None,
            price,
            change: Decimal::ZERO,
            change_percent: Decimal::ZERO,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn with_change(mut self, change: Decimal, change_percent: Decimal) -> Self {
        self.change = change;
        self.change_percent = change_percent;
        self
    }

    fn to_quote(&self, as_of: Option<DateTime<Utc>>) -> Quote {
        Quote {
            symbol: self.symbol.clone(),
            market: self.market,
            price: self.price,
            change: self.change,
            change_percent: self.change_percent,
            name: self.name.clone(),
            currency: currency_for_symbol(&self.symbol).map(str::to_string),
            source: Source::Mock,
            market_time: as_of,
            observed_at: Utc::now(),
        }
    }
}

static CURATED: LazyLock<Arc<StaticFallbackStore>> =
    LazyLock::new(|| Arc::new(StaticFallbackStore::build_curated(MarketRules::default())));

/// Read-only curated dataset keyed by symbol and by category.
#[derive(Debug, Clone, Default)]
pub struct StaticFallbackStore {
    by_symbol: HashMap<String, FallbackRecord>,
    /// Bare form (`TCS`) → canonical key (`TCS.NS`).
    by_bare: HashMap<String, String>,
    by_category: HashMap<Category, Vec<FallbackRecord>>,
    as_of: Option<DateTime<Utc>>,
    rules: MarketRules,
}

impl StaticFallbackStore {
    /// The built-in dataset, built once per process.
    #[must_use]
    pub fn curated() -> Arc<Self> {
        Arc::clone(&CURATED)
    }

    /// The built-in dataset keyed under `rules`, so bare-form lookups and
    /// market tags follow the configured domestic suffixes.
    #[must_use]
    pub fn curated_for(rules: &MarketRules) -> Arc<Self> {
        if *rules == MarketRules::default() {
            Self::curated()
        } else {
            Arc::new(Self::build_curated(rules.clone()))
        }
    }

    /// A store with no entries; every lookup misses.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    fn build_curated(rules: MarketRules) -> Self {
        let record = |s: &data::Seed| {
            let mut r = FallbackRecord::new(s.symbol, Decimal::new(s.price.0, s.price.1), &rules)
                .with_change(
                    Decimal::new(s.change.0, s.change.1),
                    Decimal::new(s.change_percent.0, s.change_percent.1),
                );
            r.name = s.name.map(str::to_string);
            r
        };

        let mut store = Self {
            rules: rules.clone(),
            ..Self::empty()
        };
        let (y, m, d) = data::AS_OF;
        store.as_of = NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc());

        for (category, seeds) in data::CATEGORY_SEEDS {
            for s in *seeds {
                store = store.with_category_record(*category, record(s));
            }
        }
        // per-symbol seeds override category values for lookup()
        for s in data::SYMBOL_SEEDS {
            store = store.with_record(record(s));
        }
        store
    }

    /// Add or replace the record for one symbol.
    #[must_use]
    pub fn with_record(mut self, record: FallbackRecord) -> Self {
        let key = record.symbol.to_ascii_uppercase();
        let bare = self.rules.strip_domestic(&key).to_string();
        if bare != key {
            self.by_bare.insert(bare, key.clone());
        }
        self.by_symbol.insert(key, record);
        self
    }

    /// Append a record to a category list. It also serves single-symbol
    /// lookups unless a per-symbol record exists.
    #[must_use]
    pub fn with_category_record(mut self, category: Category, record: FallbackRecord) -> Self {
        let key = record.symbol.to_ascii_uppercase();
        if !self.by_symbol.contains_key(&key) {
            self = self.with_record(record.clone());
        }
        self.by_category.entry(category).or_default().push(record);
        self
    }

    /// Timestamp reported as `market_time` on produced quotes.
    #[must_use]
    pub fn with_as_of(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = Some(as_of);
        self
    }

    /// Curated quote for `symbol`, tried verbatim and then by its bare form
    /// (`TCS.BO` finds the `TCS.NS` record). The quote keeps the record's symbol.
    #[must_use]
    pub fn lookup(&self, symbol: &str) -> Option<Quote> {
        let key = symbol.trim().to_ascii_uppercase();
        if key.is_empty() {
            return None;
        }
        let record = self.by_symbol.get(&key).or_else(|| {
            let bare = self.rules.strip_domestic(&key);
            self.by_bare
                .get(bare)
                .and_then(|canonical| self.by_symbol.get(canonical))
        })?;
        Some(record.to_quote(self.as_of))
    }

    /// The backfill list for a category, in curated order.
    #[must_use]
    pub fn lookup_category(&self, category: Category) -> Vec<Quote> {
        self.by_category
            .get(&category)
            .map(|records| records.iter().map(|r| r.to_quote(self.as_of)).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.lookup(symbol).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }
}
