//! Alpha Vantage: high-reliability tier. Requires an API key.

mod wire;

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Client;
use url::Url;

use crate::core::client::{
    ALPHA_VANTAGE_QUERY_PATH, DEFAULT_ALPHA_VANTAGE_BASE, HttpClientBuilder, api_root,
};
use crate::core::conversions::{date_str_to_datetime, parse_percent};
use crate::core::{
    ProviderId, ProviderResult, ProviderSettings, QcError, Quote, Unavailable, net,
};
use crate::provider::{QuoteDraft, QuoteProvider};
use crate::symbol::MarketRules;

use wire::GlobalQuoteResponse;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

pub struct AlphaVantageProvider {
    http: Client,
    query_url: Url,
    api_key: Option<String>,
    timeout: Duration,
    rules: MarketRules,
}

impl AlphaVantageProvider {
    /// # Errors
    /// Returns `QcError` if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(settings: &ProviderSettings, rules: MarketRules) -> Result<Self, QcError> {
        let timeout = settings.timeout_or(DEFAULT_TIMEOUT);
        let root = api_root(settings.base_url.as_deref(), DEFAULT_ALPHA_VANTAGE_BASE)?;
        Ok(Self {
            http: HttpClientBuilder::new().timeout(timeout).build()?,
            query_url: root.join(ALPHA_VANTAGE_QUERY_PATH)?,
            api_key: settings.api_key().map(str::to_string),
            timeout,
            rules,
        })
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, Unavailable> {
        let key = self.api_key.as_deref().ok_or(Unavailable::MissingCredentials)?;

        let mut url = self.query_url.clone();
        url.query_pairs_mut()
            .append_pair("function", "GLOBAL_QUOTE")
            .append_pair("symbol", symbol)
            .append_pair("apikey", key);

        let resp: GlobalQuoteResponse =
            net::get_json(self.http.get(url), "alpha_vantage_quote", symbol).await?;
        if let Some(msg) = resp.api_message() {
            return Err(Unavailable::Rejected(msg.to_string()));
        }
        let q = resp.global_quote.ok_or(Unavailable::NoData)?;
        if q.price.is_none() {
            return Err(Unavailable::NoData);
        }

        let mut draft = QuoteDraft::new(symbol, self.rules.market_of(symbol));
        draft.price = q.price;
        draft.change = q.change;
        draft.change_percent = q.change_percent.as_deref().and_then(parse_percent);
        draft.reference_price = q.previous_close;
        draft.market_time = q.latest_trading_day.as_deref().and_then(date_str_to_datetime);
        draft.finish(ProviderId::ALPHA_VANTAGE)
    }
}

impl QuoteProvider for AlphaVantageProvider {
    fn id(&self) -> ProviderId {
        ProviderId::ALPHA_VANTAGE
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, ProviderResult> {
        async move { self.fetch_quote(symbol).await.into() }.boxed()
    }
}
