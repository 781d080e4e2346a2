//! Twelve Data: final live tier. Requires an API key.
//!
//! Indian listings are addressed as bare ticker plus `exchange`
//! (`TCS.NS` → `symbol=TCS&exchange=NSE`).

mod wire;

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Client;
use url::Url;

use crate::core::client::{
    DEFAULT_TWELVE_DATA_BASE, HttpClientBuilder, TWELVE_DATA_QUOTE_PATH, api_root,
};
use crate::core::conversions::{date_str_to_datetime, epoch_to_datetime};
use crate::core::{
    ProviderId, ProviderResult, ProviderSettings, QcError, Quote, Unavailable, net,
};
use crate::provider::{QuoteDraft, QuoteProvider};
use crate::symbol::MarketRules;

use wire::TwelveQuote;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// Listing suffix → Twelve Data exchange code.
const EXCHANGES: &[(&str, &str)] = &[(".NS", "NSE"), (".BO", "BSE")];

pub struct TwelveDataProvider {
    http: Client,
    quote_url: Url,
    api_key: Option<String>,
    timeout: Duration,
    rules: MarketRules,
}

impl TwelveDataProvider {
    /// # Errors
    /// Returns `QcError` if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(settings: &ProviderSettings, rules: MarketRules) -> Result<Self, QcError> {
        let timeout = settings.timeout_or(DEFAULT_TIMEOUT);
        let root = api_root(settings.base_url.as_deref(), DEFAULT_TWELVE_DATA_BASE)?;
        Ok(Self {
            http: HttpClientBuilder::new().timeout(timeout).build()?,
            quote_url: root.join(TWELVE_DATA_QUOTE_PATH)?,
            api_key: settings.api_key().map(str::to_string),
            timeout,
            rules,
        })
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, Unavailable> {
        let key = self.api_key.as_deref().ok_or(Unavailable::MissingCredentials)?;
        let (ticker, exchange) = split_exchange(symbol);

        let mut url = self.quote_url.clone();
        {
            let mut qp = url.query_pairs_mut();
            qp.append_pair("symbol", ticker);
            if let Some(ex) = exchange {
                qp.append_pair("exchange", ex);
            }
            qp.append_pair("apikey", key);
        }

        let q: TwelveQuote = net::get_json(self.http.get(url), "twelve_data_quote", symbol).await?;
        if let Some(code) = q.code.filter(|c| *c != 200) {
            return Err(Unavailable::Rejected(format!(
                "{code}: {}",
                q.message.as_deref().unwrap_or("error")
            )));
        }

        let mut draft = QuoteDraft::new(symbol, self.rules.market_of(symbol));
        draft.price = q.close;
        draft.change = q.change;
        draft.change_percent = q.percent_change;
        draft.reference_price = q.previous_close;
        draft.name = q.name;
        draft.currency = q.currency;
        draft.market_time = q
            .timestamp
            .and_then(epoch_to_datetime)
            .or_else(|| q.datetime.as_deref().and_then(date_str_to_datetime));
        draft.finish(ProviderId::TWELVE_DATA)
    }
}

/// `TCS.NS` → (`TCS`, `Some("NSE")`); unknown suffixes are sent unchanged.
fn split_exchange(symbol: &str) -> (&str, Option<&'static str>) {
    for (suffix, exchange) in EXCHANGES {
        if let Some(idx) = symbol.len().checked_sub(suffix.len())
            && idx > 0
            && symbol
                .get(idx..)
                .is_some_and(|s| s.eq_ignore_ascii_case(suffix))
            && let Some(ticker) = symbol.get(..idx)
        {
            return (ticker, Some(exchange));
        }
    }
    (symbol, None)
}

impl QuoteProvider for TwelveDataProvider {
    fn id(&self) -> ProviderId {
        ProviderId::TWELVE_DATA
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, ProviderResult> {
        async move { self.fetch_quote(symbol).await.into() }.boxed()
    }
}
