//! Yahoo Finance: primary adapter for both markets.
//!
//! Single symbols go through the chart v8 endpoint, which needs no
//! credentials. Batches go through the v7 quote endpoint with a lazily
//! acquired cookie + crumb.

mod auth;
mod wire;

use std::collections::HashMap;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Client;
use tokio::sync::{Mutex, RwLock};
use url::Url;

use crate::core::client::{
    DEFAULT_YAHOO_BASE, DEFAULT_YAHOO_COOKIE, HttpClientBuilder, YAHOO_CHART_PATH,
    YAHOO_COOKIE_PATH, YAHOO_CRUMB_PATH, YAHOO_QUOTE_V7_PATH, api_root,
};
use crate::core::conversions::epoch_to_datetime;
use crate::core::{
    ProviderId, ProviderResult, ProviderSettings, QcError, Quote, Unavailable, net,
};
use crate::provider::{QuoteDraft, QuoteProvider};
use crate::symbol::MarketRules;

use auth::Credentials;
use wire::{ChartEnvelope, V7Envelope, V7QuoteNode};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct YahooProvider {
    http: Client,
    chart_url: Url,
    quote_v7_url: Url,
    cookie_url: Url,
    crumb_url: Url,
    timeout: Duration,
    rules: MarketRules,
    state: RwLock<Credentials>,
    credential_fetch_lock: Mutex<()>,
}

impl YahooProvider {
    /// Build from settings. A `base_url` override moves every endpoint,
    /// including the cookie handshake, onto that host.
    ///
    /// # Errors
    /// Returns `QcError` if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(settings: &ProviderSettings, rules: MarketRules) -> Result<Self, QcError> {
        let timeout = settings.timeout_or(DEFAULT_TIMEOUT);
        let root = api_root(settings.base_url.as_deref(), DEFAULT_YAHOO_BASE)?;
        let cookie_url = if settings.base_url.is_some() {
            root.join(YAHOO_COOKIE_PATH)?
        } else {
            Url::parse(DEFAULT_YAHOO_COOKIE)?
        };

        let http = HttpClientBuilder::new()
            .timeout(timeout)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            http,
            chart_url: root.join(YAHOO_CHART_PATH)?,
            quote_v7_url: root.join(YAHOO_QUOTE_V7_PATH)?,
            cookie_url,
            crumb_url: root.join(YAHOO_CRUMB_PATH)?,
            timeout,
            rules,
            state: RwLock::new(Credentials::default()),
            credential_fetch_lock: Mutex::new(()),
        })
    }

    async fn fetch_chart(&self, symbol: &str) -> Result<Quote, Unavailable> {
        let mut url = self.chart_url.clone();
        url.path_segments_mut()
            .map_err(|()| Unavailable::Malformed("chart URL cannot take a path".into()))?
            .pop_if_empty()
            .push(symbol);
        url.query_pairs_mut()
            .append_pair("range", "1d")
            .append_pair("interval", "1d");

        let env: ChartEnvelope = net::get_json(self.http.get(url), "chart", symbol).await?;
        let chart = env.chart.ok_or(Unavailable::NoData)?;
        if let Some(err) = chart.error {
            return Err(Unavailable::Rejected(format!(
                "{}: {}",
                err.code, err.description
            )));
        }
        let result = chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or(Unavailable::NoData)?;

        let last_close = result.last_close();
        let first_open = result.first_open();
        let meta = result.meta.unwrap_or_default();

        let mut draft = QuoteDraft::new(symbol, self.rules.market_of(symbol));
        draft.price = meta.regular_market_price.or(last_close);
        draft.reference_price = meta
            .chart_previous_close
            .or(meta.previous_close)
            .or(first_open);
        draft.name = meta.short_name.or(meta.long_name);
        draft.currency = meta.currency;
        draft.market_time = meta.regular_market_time.and_then(epoch_to_datetime);
        draft.finish(ProviderId::YAHOO)
    }

    /// One v7 request for all `symbols`. A 401/403 drops the crumb so the next
    /// batch re-authenticates; the failing batch itself is not retried.
    async fn fetch_v7(&self, symbols: &[String]) -> Result<Vec<V7QuoteNode>, Unavailable> {
        let crumb = match self.ensure_credentials().await {
            Ok(()) => self.crumb().await,
            Err(e) => {
                tracing::debug!(error = %e, "yahoo crumb unavailable; trying without");
                None
            }
        };

        let joined = symbols.join(",");
        let mut url = self.quote_v7_url.clone();
        {
            let mut qp = url.query_pairs_mut();
            qp.append_pair("symbols", &joined);
            if let Some(c) = &crumb {
                qp.append_pair("crumb", c);
            }
        }

        let fetched = net::send(self.http.get(url), "quote_v7", &joined).await?;
        if fetched.status == 401 || fetched.status == 403 {
            self.clear_crumb().await;
        }
        let env: V7Envelope = fetched.ensure_success()?.decode("quote_v7")?;

        Ok(env
            .quote_response
            .and_then(|qr| qr.result)
            .unwrap_or_default())
    }

    fn node_to_quote(&self, symbol: &str, node: V7QuoteNode) -> Result<Quote, Unavailable> {
        let mut draft = QuoteDraft::new(symbol, self.rules.market_of(symbol));
        draft.price = node.regular_market_price;
        draft.change = node.regular_market_change;
        draft.change_percent = node.regular_market_change_percent;
        draft.reference_price = node.regular_market_previous_close;
        draft.name = node.short_name.or(node.long_name);
        draft.currency = node.currency;
        draft.market_time = node.regular_market_time.and_then(epoch_to_datetime);
        draft.finish(ProviderId::YAHOO)
    }

    async fn fetch_batch(&self, symbols: &[String]) -> HashMap<String, ProviderResult> {
        if symbols.is_empty() {
            return HashMap::new();
        }

        let mut by_symbol: HashMap<String, V7QuoteNode> = match self.fetch_v7(symbols).await {
            Ok(nodes) => nodes
                .into_iter()
                .filter_map(|n| Some((n.symbol.clone()?.to_ascii_uppercase(), n)))
                .collect(),
            Err(e) => {
                return symbols
                    .iter()
                    .map(|s| (s.clone(), ProviderResult::Unavailable(e.clone())))
                    .collect();
            }
        };

        symbols
            .iter()
            .map(|s| {
                let result = match by_symbol.remove(&s.to_ascii_uppercase()) {
                    Some(node) => self.node_to_quote(s, node).into(),
                    None => ProviderResult::Unavailable(Unavailable::NoData),
                };
                (s.clone(), result)
            })
            .collect()
    }
}

impl QuoteProvider for YahooProvider {
    fn id(&self) -> ProviderId {
        ProviderId::YAHOO
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, ProviderResult> {
        async move { self.fetch_chart(symbol).await.into() }.boxed()
    }

    fn supports_batch(&self) -> bool {
        true
    }

    fn fetch_many<'a>(
        &'a self,
        symbols: &'a [String],
    ) -> BoxFuture<'a, HashMap<String, ProviderResult>> {
        async move { self.fetch_batch(symbols).await }.boxed()
    }
}
