use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::QcError;
use crate::core::models::{ProviderId, Source};

/// Per-adapter settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Disabled adapters are skipped when chains are assembled.
    pub enabled: bool,
    /// Request timeout; `None` keeps the adapter's own default.
    pub timeout_ms: Option<u64>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Base URL override (tests, proxies, self-hosted mirrors).
    pub base_url: Option<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: None,
            api_key: None,
            base_url: None,
        }
    }
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("enabled", &self.enabled)
            .field("timeout_ms", &self.timeout_ms)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ProviderSettings {
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, dur: Duration) -> Self {
        self.timeout_ms = Some(dur.as_millis() as u64);
        self
    }

    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// The configured timeout, or `default` when none is set.
    #[must_use]
    pub fn timeout_or(&self, default: Duration) -> Duration {
        self.timeout_ms.map_or(default, Duration::from_millis)
    }

    /// The API key, ignoring blank strings.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

/// Everything the resolver needs to know, loadable from JSON.
///
/// Priority order is data: each chain is a list of provider ids tried in
/// order, so adapters can be inserted or reordered without code changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Suffix appended to unqualified tickers.
    pub domestic_suffix: String,
    /// Suffixes that mark a symbol as domestic (`.NS`, `.BO`).
    pub domestic_suffixes: Vec<String>,
    /// Index symbols tagged as domestic.
    pub domestic_index_symbols: Vec<String>,
    /// Unqualified tickers that are left as-is instead of getting the domestic suffix.
    pub global_tickers: Vec<String>,
    /// Extra aliases layered over the built-in table (keys are matched uppercased).
    pub aliases: BTreeMap<String, String>,

    pub domestic_chain: Vec<ProviderId>,
    pub global_chain: Vec<ProviderId>,
    pub index_chain: Vec<ProviderId>,
    /// Provider used for the bulk fast path.
    pub batch_provider: Option<ProviderId>,
    pub providers: BTreeMap<ProviderId, ProviderSettings>,

    /// Hard per-symbol cap; defaults to the sum of the chain's timeouts.
    pub symbol_budget_ms: Option<u64>,
    pub bulk_concurrency: usize,
    /// Live quotes a category view needs before it is backfilled.
    pub category_min_fill: usize,
    /// Live-quote memo for the bulk path; `None` disables it.
    pub cache_ttl_ms: Option<u64>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        let owned = |xs: &[&str]| xs.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();
        Self {
            domestic_suffix: ".NS".into(),
            domestic_suffixes: owned(&[".NS", ".BO"]),
            domestic_index_symbols: owned(&["^NSEI", "^BSESN", "^NSEBANK"]),
            global_tickers: owned(&[
                "AAPL", "MSFT", "GOOGL", "GOOG", "AMZN", "TSLA", "META", "NVDA", "NFLX", "SPY",
                "QQQ",
            ]),
            aliases: BTreeMap::new(),
            domestic_chain: vec![
                ProviderId::YAHOO,
                ProviderId::NSE,
                ProviderId::FINNHUB,
                ProviderId::ALPHA_VANTAGE,
                ProviderId::TWELVE_DATA,
            ],
            global_chain: vec![
                ProviderId::YAHOO,
                ProviderId::FINNHUB,
                ProviderId::ALPHA_VANTAGE,
                ProviderId::TWELVE_DATA,
            ],
            index_chain: vec![ProviderId::YAHOO],
            batch_provider: Some(ProviderId::YAHOO),
            providers: BTreeMap::new(),
            symbol_budget_ms: None,
            bulk_concurrency: 8,
            category_min_fill: 2,
            cache_ttl_ms: None,
        }
    }
}

impl ResolverConfig {
    /// # Errors
    /// Returns `QcError::Json` on malformed input and `QcError::Config` if the
    /// parsed values are inconsistent.
    pub fn from_json_str(json: &str) -> Result<Self, QcError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    /// As [`from_json_str`](Self::from_json_str), plus `QcError::Io`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, QcError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Settings for `id`, or the defaults when none are configured.
    #[must_use]
    pub fn provider(&self, id: &ProviderId) -> ProviderSettings {
        self.providers.get(id).cloned().unwrap_or_default()
    }

    /// Replace the settings for one provider.
    #[must_use]
    pub fn with_provider(mut self, id: ProviderId, settings: ProviderSettings) -> Self {
        self.providers.insert(id, settings);
        self
    }

    #[must_use]
    pub fn symbol_budget(&self) -> Option<Duration> {
        self.symbol_budget_ms.map(Duration::from_millis)
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_ms.map(Duration::from_millis)
    }

    /// # Errors
    /// Returns `QcError::Config` describing the first inconsistency found.
    pub fn validate(&self) -> Result<(), QcError> {
        if self.bulk_concurrency == 0 {
            return Err(QcError::Config("bulk_concurrency must be at least 1".into()));
        }
        if !self.domestic_suffix.starts_with('.') || self.domestic_suffix.len() < 2 {
            return Err(QcError::Config(format!(
                "domestic_suffix must look like \".XX\", got {:?}",
                self.domestic_suffix
            )));
        }
        for (name, chain) in [
            ("domestic_chain", &self.domestic_chain),
            ("global_chain", &self.global_chain),
            ("index_chain", &self.index_chain),
        ] {
            if chain.is_empty() {
                return Err(QcError::Config(format!("{name} is empty")));
            }
            if let Some(id) = chain.iter().find(|id| id.as_str() == Source::MOCK_ID) {
                return Err(QcError::Config(format!(
                    "{name}: provider id \"{id}\" is reserved for the static fallback"
                )));
            }
        }
        if self.symbol_budget_ms == Some(0) {
            return Err(QcError::Config("symbol_budget_ms must be positive".into()));
        }
        Ok(())
    }
}
