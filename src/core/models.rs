use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use crate::core::error::Unavailable;

/* ----- MARKET / SOURCE ----- */

/// Which market a quote belongs to.
///
/// `Domestic` is the home exchange the resolver specializes in (by default the
/// Indian NSE/BSE listings); everything else is `Global`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Market {
    Domestic,
    Global,
}

/// Stable identifier of a provider adapter.
///
/// Built-in adapters use the associated constants; custom adapters pick any
/// other name except `"mock"`, which is reserved for the static fallback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(Cow<'static, str>);

impl ProviderId {
    pub const YAHOO: Self = Self(Cow::Borrowed("yahoo"));
    pub const NSE: Self = Self(Cow::Borrowed("nse"));
    pub const FINNHUB: Self = Self(Cow::Borrowed("finnhub"));
    pub const ALPHA_VANTAGE: Self = Self(Cow::Borrowed("alpha_vantage"));
    pub const TWELVE_DATA: Self = Self(Cow::Borrowed("twelve_data"));

    /// Identifier for a custom adapter.
    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The five adapters shipped with the crate, in their default priority.
    #[must_use]
    pub fn builtin() -> [Self; 5] {
        [
            Self::YAHOO,
            Self::NSE,
            Self::FINNHUB,
            Self::ALPHA_VANTAGE,
            Self::TWELVE_DATA,
        ]
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which layer produced a quote.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    /// A live provider adapter.
    Provider(ProviderId),
    /// The curated static fallback store.
    Mock,
}

impl Source {
    pub const MOCK_ID: &'static str = "mock";

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Provider(id) => id.as_str(),
            Self::Mock => Self::MOCK_ID,
        }
    }

    #[must_use]
    pub const fn is_mock(&self) -> bool {
        matches!(self, Self::Mock)
    }
}

impl From<ProviderId> for Source {
    fn from(id: ProviderId) -> Self {
        Self::Provider(id)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Source {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/* ----- QUOTE ----- */

/// A normalized price quote.
///
/// `price` is always finite and strictly positive; adapters that cannot
/// guarantee this report [`Unavailable`] instead of building a `Quote`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    /// Canonical, provider-addressable symbol (e.g. `TCS.NS`, `AAPL`, `^NSEI`).
    pub symbol: String,
    pub market: Market,
    pub price: Decimal,
    /// Absolute move against the provider's reference price.
    pub change: Decimal,
    /// Relative move in percent (`3.36` means +3.36%).
    pub change_percent: Decimal,
    pub name: Option<String>,
    pub currency: Option<String>,
    pub source: Source,
    /// The provider's own market timestamp, when it reports one.
    pub market_time: Option<DateTime<Utc>>,
    /// When this quote was resolved.
    pub observed_at: DateTime<Utc>,
}

impl Quote {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.price > Decimal::ZERO
    }

    #[must_use]
    pub const fn is_mock(&self) -> bool {
        self.source.is_mock()
    }

    /// Signed percent string with two decimals, e.g. `+3.36%` or `-0.30%`.
    #[must_use]
    pub fn change_percent_display(&self) -> String {
        let pct = self.change_percent.round_dp(2);
        let sign = if pct < Decimal::ZERO { "" } else { "+" };
        format!("{sign}{pct:.2}%")
    }
}

/* ----- ADAPTER RESULT ----- */

/// What a provider adapter hands back for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResult {
    Found(Quote),
    Unavailable(Unavailable),
}

impl ProviderResult {
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    #[must_use]
    pub fn into_quote(self) -> Option<Quote> {
        match self {
            Self::Found(q) => Some(q),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<Result<Quote, Unavailable>> for ProviderResult {
    fn from(r: Result<Quote, Unavailable>) -> Self {
        match r {
            Ok(q) => Self::Found(q),
            Err(e) => Self::Unavailable(e),
        }
    }
}

/* ----- CALLER-VISIBLE OUTCOMES ----- */

/// Caller-visible reason a symbol has no quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum Failure {
    /// Every provider and the static store missed.
    #[error("symbol not found")]
    SymbolNotFound,
    /// The caller cancelled the bulk request before this symbol completed.
    #[error("resolution cancelled")]
    Cancelled,
}

/// Outcome of resolving one symbol.
///
/// A failure keeps the quote's shape (`symbol` plus a typed tag) so it can
/// never be mistaken for a zero price.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Resolved(Quote),
    Failed { symbol: String, failure: Failure },
}

impl Resolution {
    pub(crate) fn not_found(symbol: impl Into<String>) -> Self {
        Self::Failed {
            symbol: symbol.into(),
            failure: Failure::SymbolNotFound,
        }
    }

    pub(crate) fn cancelled(symbol: impl Into<String>) -> Self {
        Self::Failed {
            symbol: symbol.into(),
            failure: Failure::Cancelled,
        }
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        match self {
            Self::Resolved(q) => &q.symbol,
            Self::Failed { symbol, .. } => symbol,
        }
    }

    #[must_use]
    pub const fn quote(&self) -> Option<&Quote> {
        match self {
            Self::Resolved(q) => Some(q),
            Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn into_quote(self) -> Option<Quote> {
        match self {
            Self::Resolved(q) => Some(q),
            Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub const fn failure(&self) -> Option<Failure> {
        match self {
            Self::Resolved(_) => None,
            Self::Failed { failure, .. } => Some(*failure),
        }
    }

    /// Resolved from a live provider.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Resolved(q) if !q.source.is_mock())
    }

    /// Resolved from the static fallback store.
    #[must_use]
    pub const fn is_mock(&self) -> bool {
        matches!(self, Self::Resolved(q) if q.source.is_mock())
    }
}

/* ----- CATEGORIES ----- */

/// Curated "top assets" views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Stock,
    Crypto,
    Etf,
    MutualFund,
    Bond,
}

impl Category {
    pub const ALL: [Self; 5] = [
        Self::Stock,
        Self::Crypto,
        Self::Etf,
        Self::MutualFund,
        Self::Bond,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::Crypto => "crypto",
            Self::Etf => "etf",
            Self::MutualFund => "mutual_fund",
            Self::Bond => "bond",
        }
    }

    /// Symbols resolved live for this category view.
    #[must_use]
    pub const fn symbols(self) -> &'static [&'static str] {
        match self {
            Self::Stock => &[
                "RELIANCE.NS",
                "TCS.NS",
                "HDFCBANK.NS",
                "INFY.NS",
                "ICICIBANK.NS",
                "SBIN.NS",
            ],
            Self::Crypto => &["BTC-USD", "ETH-USD", "SOL-USD", "BNB-USD", "XRP-USD"],
            Self::Etf => &[
                "NIFTYBEES.NS",
                "GOLDBEES.NS",
                "LIQUIDBEES.NS",
                "JUNIORBEES.NS",
                "BANKBEES.NS",
            ],
            // index proxies and broad ETFs
            Self::MutualFund => &["^NSEI", "^BSESN", "^NSEBANK", "NIFTYBEES.NS", "BANKBEES.NS"],
            Self::Bond => &["^TNX"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == key)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}
