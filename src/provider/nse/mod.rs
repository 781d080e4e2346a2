//! National Stock Exchange of India: regional adapter for `.NS` listings.

mod wire;

use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Client;
use url::Url;

use crate::core::client::{DEFAULT_NSE_BASE, HttpClientBuilder, NSE_QUOTE_PATH, api_root};
use crate::core::{
    Market, ProviderId, ProviderResult, ProviderSettings, QcError, Quote, Unavailable, net,
};
use crate::provider::{QuoteDraft, QuoteProvider};

use wire::NseEnvelope;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// The only listing suffix this exchange serves.
const NSE_SUFFIX: &str = ".NS";

/// IST, UTC+05:30.
const EXCHANGE_UTC_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

pub struct NseProvider {
    http: Client,
    quote_url: Url,
    timeout: Duration,
}

impl NseProvider {
    /// # Errors
    /// Returns `QcError` if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(settings: &ProviderSettings) -> Result<Self, QcError> {
        let timeout = settings.timeout_or(DEFAULT_TIMEOUT);
        let root = api_root(settings.base_url.as_deref(), DEFAULT_NSE_BASE)?;
        let http = HttpClientBuilder::new()
            .timeout(timeout)
            .cookie_store(true)
            .default_header("Referer", root.as_str())
            .build()?;
        Ok(Self {
            http,
            quote_url: root.join(NSE_QUOTE_PATH)?,
            timeout,
        })
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, Unavailable> {
        let bare = bare_nse_symbol(symbol).ok_or(Unavailable::NotCovered)?;

        let mut url = self.quote_url.clone();
        url.query_pairs_mut().append_pair("symbol", bare);

        let env: NseEnvelope = net::get_json(self.http.get(url), "nse_quote", symbol).await?;
        let market_time = env.last_update_time.as_deref().and_then(parse_exchange_time);
        let node = env.data.into_iter().next().ok_or(Unavailable::NoData)?;

        let mut draft = QuoteDraft::new(symbol, Market::Domestic);
        draft.price = node.last_price;
        draft.change = node.change;
        draft.change_percent = node.p_change;
        draft.reference_price = node.previous_close;
        draft.name = node.company_name;
        draft.currency = Some("INR".into());
        draft.market_time = market_time;
        draft.finish(ProviderId::NSE)
    }
}

/// `TCS.NS` → `TCS`. Other listings and indices are not served here.
fn bare_nse_symbol(symbol: &str) -> Option<&str> {
    if symbol.starts_with('^') {
        return None;
    }
    let idx = symbol
        .len()
        .checked_sub(NSE_SUFFIX.len())
        .filter(|i| *i > 0)?;
    let suffix = symbol.get(idx..)?;
    suffix
        .eq_ignore_ascii_case(NSE_SUFFIX)
        .then(|| symbol.get(..idx))
        .flatten()
}

fn parse_exchange_time(s: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), "%d-%b-%Y %H:%M:%S").ok()?;
    FixedOffset::east_opt(EXCHANGE_UTC_OFFSET_SECS)?
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

impl QuoteProvider for NseProvider {
    fn id(&self) -> ProviderId {
        ProviderId::NSE
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, ProviderResult> {
        async move { self.fetch_quote(symbol).await.into() }.boxed()
    }
}
