#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::Utc;
use futures::FutureExt;
use futures::future::BoxFuture;
use httpmock::{Method::GET, Mock, MockServer};
use rust_decimal::Decimal;

use quote_cascade::{
    Market, ProviderId, ProviderResult, ProviderSettings, Quote, QuoteProvider, Source,
    Unavailable,
};

pub fn setup_server() -> MockServer {
    MockServer::start()
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// Settings pointing an adapter at the mock server.
pub fn settings_for(server: &MockServer) -> ProviderSettings {
    ProviderSettings::default().with_base_url(server.base_url())
}

pub fn mock_cookie_crumb(server: &'_ MockServer) -> (Mock<'_>, Mock<'_>) {
    let cookie_mock = server.mock(|when, then| {
        when.method(GET).path("/consent");
        then.status(200).header(
            "set-cookie",
            "A=B; Max-Age=315360000; Domain=.yahoo.com; Path=/; Secure; SameSite=None",
        );
    });
    let crumb_mock = server.mock(|when, then| {
        when.method(GET).path("/v1/test/getcrumb");
        then.status(200).body("crumb-value");
    });
    (cookie_mock, crumb_mock)
}

pub fn chart_body(symbol: &str, price: f64, previous_close: f64) -> String {
    format!(
        r#"{{
          "chart": {{
            "result": [{{
              "meta": {{
                "symbol": "{symbol}",
                "currency": "INR",
                "regularMarketPrice": {price},
                "chartPreviousClose": {previous_close},
                "regularMarketTime": 1768208400,
                "shortName": "Test Corp"
              }},
              "timestamp": [1768208400],
              "indicators": {{ "quote": [{{ "open": [{previous_close}], "close": [{price}] }}] }}
            }}],
            "error": null
          }}
        }}"#
    )
}

pub fn mock_chart<'a>(server: &'a MockServer, symbol: &str, body: String) -> Mock<'a> {
    let path = format!("/v8/finance/chart/{symbol}");
    server.mock(move |when, then| {
        when.method(GET)
            .path(path)
            .query_param("range", "1d")
            .query_param("interval", "1d");
        then.status(200)
            .header("content-type", "application/json")
            .body(body);
    })
}

pub fn v7_body(quotes: &[(&str, f64)]) -> String {
    let nodes: Vec<String> = quotes
        .iter()
        .map(|(s, p)| {
            format!(
                r#"{{ "symbol": "{s}", "regularMarketPrice": {p}, "regularMarketChange": 1.5, "regularMarketChangePercent": 0.75, "shortName": "{s} Inc" }}"#
            )
        })
        .collect();
    format!(
        r#"{{ "quoteResponse": {{ "result": [{}], "error": null }} }}"#,
        nodes.join(",")
    )
}

/// What a [`FakeProvider`] does for a symbol.
#[derive(Clone, Debug)]
pub enum Behavior {
    Price(Decimal),
    Missing,
    Panic,
    /// Sleep, then answer with price 1.
    Sleep(Duration),
    /// A positive price that claims to be mock data.
    MockSource(Decimal),
    ZeroPrice,
}

/// In-process adapter with scripted answers and call accounting.
pub struct FakeProvider {
    id: ProviderId,
    timeout: Duration,
    default: Behavior,
    per_symbol: HashMap<String, Behavior>,
    batch: bool,
    calls: AtomicUsize,
    batch_calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new(id: &str, default: Behavior) -> Self {
        Self {
            id: ProviderId::new(id),
            timeout: Duration::from_secs(5),
            default,
            per_symbol: HashMap::new(),
            batch: false,
            calls: AtomicUsize::new(0),
            batch_calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_id(mut self, id: ProviderId) -> Self {
        self.id = id;
        self
    }

    pub fn on(mut self, symbol: &str, behavior: Behavior) -> Self {
        self.per_symbol.insert(symbol.to_string(), behavior);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn batching(mut self) -> Self {
        self.batch = true;
        self
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    async fn respond(&self, symbol: &str) -> ProviderResult {
        let behavior = self
            .per_symbol
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| self.default.clone());
        match behavior {
            Behavior::Price(p) => ProviderResult::Found(quote(symbol, p, self.id.clone())),
            Behavior::Missing => ProviderResult::Unavailable(Unavailable::NoData),
            Behavior::Panic => panic!("{} exploded on {symbol}", self.id),
            Behavior::Sleep(d) => {
                tokio::time::sleep(d).await;
                ProviderResult::Found(quote(symbol, Decimal::ONE, self.id.clone()))
            }
            Behavior::MockSource(p) => {
                let mut q = quote(symbol, p, self.id.clone());
                q.source = Source::Mock;
                ProviderResult::Found(q)
            }
            Behavior::ZeroPrice => {
                ProviderResult::Found(quote(symbol, Decimal::ZERO, self.id.clone()))
            }
        }
    }
}

impl QuoteProvider for FakeProvider {
    fn id(&self) -> ProviderId {
        self.id.clone()
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, ProviderResult> {
        async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(symbol.to_string());
            self.respond(symbol).await
        }
        .boxed()
    }

    fn supports_batch(&self) -> bool {
        self.batch
    }

    fn fetch_many<'a>(
        &'a self,
        symbols: &'a [String],
    ) -> BoxFuture<'a, HashMap<String, ProviderResult>> {
        async move {
            self.batch_calls.fetch_add(1, Ordering::SeqCst);
            let mut out = HashMap::new();
            for s in symbols {
                out.insert(s.clone(), self.respond(s).await);
            }
            out
        }
        .boxed()
    }
}

pub fn quote(symbol: &str, price: Decimal, source: ProviderId) -> Quote {
    Quote {
        symbol: symbol.to_string(),
        market: if symbol.ends_with(".NS") {
            Market::Domestic
        } else {
            Market::Global
        },
        price,
        change: Decimal::ZERO,
        change_percent: Decimal::ZERO,
        name: None,
        currency: None,
        source: Source::Provider(source),
        market_time: None,
        observed_at: Utc::now(),
    }
}

pub fn as_dyn(p: &Arc<FakeProvider>) -> Arc<dyn QuoteProvider> {
    p.clone()
}
