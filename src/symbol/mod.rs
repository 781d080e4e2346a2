//! Symbol canonicalization and market tagging.
//!
//! [`SymbolNormalizer::normalize`] turns whatever the user typed into the
//! provider-addressable form, in this order:
//!
//! 1. exact alias match (built-in table, then configured overrides),
//! 2. symbols that already carry a market qualifier are kept as-is,
//! 3. known global tickers are kept as-is,
//! 4. everything else gets the domestic exchange suffix.
//!
//! Step 4 is a heuristic: an unscoped short ticker is assumed to be a
//! domestic listing. It can misclassify ambiguous tickers; add them to
//! `global_tickers` or `aliases` in [`ResolverConfig`] to override it.

mod aliases;
mod currency;

use std::collections::{HashMap, HashSet};

use crate::core::{Market, ResolverConfig};

pub(crate) use aliases::index_name;
pub(crate) use currency::currency_for_symbol;

/// Market tagging rules derived from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketRules {
    domestic_suffix: String,
    domestic_suffixes: Vec<String>,
    domestic_indices: HashSet<String>,
}

impl Default for MarketRules {
    fn default() -> Self {
        Self::from_config(&ResolverConfig::default())
    }
}

impl MarketRules {
    #[must_use]
    pub fn from_config(cfg: &ResolverConfig) -> Self {
        let mut domestic_suffixes: Vec<String> = cfg
            .domestic_suffixes
            .iter()
            .map(|s| s.to_ascii_uppercase())
            .collect();
        let primary = cfg.domestic_suffix.to_ascii_uppercase();
        if !domestic_suffixes.contains(&primary) {
            domestic_suffixes.push(primary.clone());
        }
        Self {
            domestic_suffix: primary,
            domestic_suffixes,
            domestic_indices: cfg
                .domestic_index_symbols
                .iter()
                .map(|s| s.to_ascii_uppercase())
                .collect(),
        }
    }

    /// The suffix appended to unqualified tickers.
    #[must_use]
    pub fn domestic_suffix(&self) -> &str {
        &self.domestic_suffix
    }

    /// The domestic suffix `symbol` ends with, if any.
    #[must_use]
    pub fn domestic_suffix_of(&self, symbol: &str) -> Option<&str> {
        let upper = symbol.to_ascii_uppercase();
        self.domestic_suffixes
            .iter()
            .find(|sfx| upper.len() > sfx.len() && upper.ends_with(sfx.as_str()))
            .map(String::as_str)
    }

    #[must_use]
    pub fn is_domestic_index(&self, symbol: &str) -> bool {
        self.domestic_indices.contains(&symbol.to_ascii_uppercase())
    }

    #[must_use]
    pub fn is_domestic(&self, symbol: &str) -> bool {
        self.domestic_suffix_of(symbol).is_some() || self.is_domestic_index(symbol)
    }

    #[must_use]
    pub fn market_of(&self, symbol: &str) -> Market {
        if self.is_domestic(symbol) {
            Market::Domestic
        } else {
            Market::Global
        }
    }

    /// `TCS.NS` → `TCS`; anything else is returned unchanged.
    #[must_use]
    pub fn strip_domestic<'a>(&self, symbol: &'a str) -> &'a str {
        match self.domestic_suffix_of(symbol) {
            Some(sfx) => &symbol[..symbol.len() - sfx.len()],
            None => symbol,
        }
    }
}

/// Pure, network-free symbol canonicalizer.
#[derive(Debug, Clone)]
pub struct SymbolNormalizer {
    rules: MarketRules,
    overrides: HashMap<String, String>,
    global_tickers: HashSet<String>,
}

impl Default for SymbolNormalizer {
    fn default() -> Self {
        Self::new(&ResolverConfig::default())
    }
}

impl SymbolNormalizer {
    #[must_use]
    pub fn new(cfg: &ResolverConfig) -> Self {
        Self {
            rules: MarketRules::from_config(cfg),
            overrides: cfg
                .aliases
                .iter()
                .map(|(k, v)| (aliases::alias_key(k), v.trim().to_string()))
                .collect(),
            global_tickers: cfg
                .global_tickers
                .iter()
                .map(|t| t.trim().to_ascii_uppercase())
                .collect(),
        }
    }

    #[must_use]
    pub const fn rules(&self) -> &MarketRules {
        &self.rules
    }

    /// Canonicalize `raw`. Blank input is returned unchanged.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        let key = aliases::alias_key(raw);
        if key.is_empty() {
            return raw.to_string();
        }

        if let Some(mapped) = self.overrides.get(&key) {
            return mapped.clone();
        }
        if let Some(mapped) = aliases::builtin_alias(&key) {
            return mapped.to_string();
        }

        if is_qualified(&key) || self.global_tickers.contains(&key) {
            return key;
        }

        format!("{key}{}", self.rules.domestic_suffix)
    }

    /// The bare form used for static-store lookups (`TCS.NS` → `TCS`).
    #[must_use]
    pub fn bare<'a>(&self, canonical: &'a str) -> &'a str {
        self.rules.strip_domestic(canonical)
    }
}

/// Carries an explicit market qualifier: an index caret, an exchange suffix,
/// a currency pair (`BTC-USD`) or a Yahoo-style instrument marker (`USDINR=X`).
fn is_qualified(symbol: &str) -> bool {
    symbol.starts_with('^') || symbol.contains(['.', '-', '='])
}
