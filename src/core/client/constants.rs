//! Centralized constants for default endpoints and UA.
//!
//! Provider roots end with `/`; adapters join their endpoint paths onto them
//! so a configured `base_url` can replace the whole host.

/// Default desktop UA to avoid trivial bot blocking.
pub(crate) const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (X11; Linux x86_64) ",
    "AppleWebKit/537.36 (KHTML, like Gecko) ",
    "Chrome/122.0.0.0 Safari/537.36"
);

/// Yahoo query host (chart v8, quote v7, crumb).
pub(crate) const DEFAULT_YAHOO_BASE: &str = "https://query1.finance.yahoo.com/";

/// A URL that returns a Set-Cookie header for Yahoo domains.
pub(crate) const DEFAULT_YAHOO_COOKIE: &str = "https://fc.yahoo.com/consent";

pub(crate) const YAHOO_CHART_PATH: &str = "v8/finance/chart/";
pub(crate) const YAHOO_QUOTE_V7_PATH: &str = "v7/finance/quote";
pub(crate) const YAHOO_CRUMB_PATH: &str = "v1/test/getcrumb";
/// Cookie path used when the Yahoo root is overridden.
pub(crate) const YAHOO_COOKIE_PATH: &str = "consent";

/// NSE host; quotes take the bare symbol in the `symbol` query parameter.
pub(crate) const DEFAULT_NSE_BASE: &str = "https://www1.nseindia.com/";
pub(crate) const NSE_QUOTE_PATH: &str = "live_nse/CommonDntUtils/getQuote.jsp";

pub(crate) const DEFAULT_FINNHUB_BASE: &str = "https://finnhub.io/api/v1/";
pub(crate) const FINNHUB_QUOTE_PATH: &str = "quote";

pub(crate) const DEFAULT_ALPHA_VANTAGE_BASE: &str = "https://www.alphavantage.co/";
pub(crate) const ALPHA_VANTAGE_QUERY_PATH: &str = "query";

pub(crate) const DEFAULT_TWELVE_DATA_BASE: &str = "https://api.twelvedata.com/";
pub(crate) const TWELVE_DATA_QUOTE_PATH: &str = "quote";
