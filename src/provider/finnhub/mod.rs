//! Finnhub: secondary global adapter. Requires an API key.

mod wire;

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Client;
use url::Url;

use crate::core::client::{DEFAULT_FINNHUB_BASE, FINNHUB_QUOTE_PATH, HttpClientBuilder, api_root};
use crate::core::conversions::epoch_to_datetime;
use crate::core::{
    ProviderId, ProviderResult, ProviderSettings, QcError, Quote, Unavailable, net,
};
use crate::provider::{QuoteDraft, QuoteProvider};
use crate::symbol::MarketRules;

use wire::FinnhubQuote;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const TOKEN_HEADER: &str = "X-Finnhub-Token";

pub struct FinnhubProvider {
    /// `None` when no API key is configured.
    http: Option<Client>,
    quote_url: Url,
    timeout: Duration,
    rules: MarketRules,
}

impl FinnhubProvider {
    /// The key travels in a header so it never appears in URLs or logs.
    ///
    /// # Errors
    /// Returns `QcError` if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(settings: &ProviderSettings, rules: MarketRules) -> Result<Self, QcError> {
        let timeout = settings.timeout_or(DEFAULT_TIMEOUT);
        let root = api_root(settings.base_url.as_deref(), DEFAULT_FINNHUB_BASE)?;
        let http = settings
            .api_key()
            .map(|key| {
                HttpClientBuilder::new()
                    .timeout(timeout)
                    .default_header(TOKEN_HEADER, key)
                    .build()
            })
            .transpose()?;
        Ok(Self {
            http,
            quote_url: root.join(FINNHUB_QUOTE_PATH)?,
            timeout,
            rules,
        })
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, Unavailable> {
        let http = self.http.as_ref().ok_or(Unavailable::MissingCredentials)?;

        let mut url = self.quote_url.clone();
        url.query_pairs_mut().append_pair("symbol", symbol);

        let fetched = net::send(http.get(url), "finnhub_quote", symbol).await?;
        if fetched.status == 403 {
            return Err(Unavailable::Rejected("access to this symbol is restricted".into()));
        }
        let q: FinnhubQuote = fetched.ensure_success()?.decode("finnhub_quote")?;
        if let Some(err) = q.error {
            return Err(Unavailable::Rejected(err));
        }
        // unknown symbols come back as c = 0
        if q.c.is_none_or(|c| c == 0.0) {
            return Err(Unavailable::NoData);
        }

        let mut draft = QuoteDraft::new(symbol, self.rules.market_of(symbol));
        draft.price = q.c;
        draft.change = q.d;
        draft.change_percent = q.dp;
        draft.reference_price = q.pc;
        draft.market_time = q.t.and_then(epoch_to_datetime);
        draft.finish(ProviderId::FINNHUB)
    }
}

impl QuoteProvider for FinnhubProvider {
    fn id(&self) -> ProviderId {
        ProviderId::FINNHUB
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, ProviderResult> {
        async move { self.fetch_quote(symbol).await.into() }.boxed()
    }
}
