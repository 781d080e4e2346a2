use httpmock::Method::GET;
use quote_cascade::provider::yahoo::YahooProvider;
use quote_cascade::{Market, MarketRules, ProviderId, ProviderResult, QuoteProvider, Source, Unavailable};

use crate::common::{chart_body, dec, mock_chart, mock_cookie_crumb, settings_for, setup_server, v7_body};

fn provider(server: &httpmock::MockServer) -> YahooProvider {
    YahooProvider::new(&settings_for(server), MarketRules::default()).unwrap()
}

#[tokio::test]
async fn chart_quote_derives_change_from_previous_close() {
    let server = setup_server();
    let mock = mock_chart(&server, "TCS.NS", chart_body("TCS.NS", 3850.5, 3725.0));

    let q = provider(&server).fetch("TCS.NS").await.into_quote().unwrap();
    mock.assert();

    assert_eq!(q.symbol, "TCS.NS");
    assert_eq!(q.market, Market::Domestic);
    assert_eq!(q.price, dec("3850.5"));
    assert_eq!(q.change, dec("125.5"));
    assert_eq!(q.change_percent, dec("3.37"));
    assert_eq!(q.currency.as_deref(), Some("INR"));
    assert_eq!(q.name.as_deref(), Some("Test Corp"));
    assert_eq!(q.source, Source::Provider(ProviderId::YAHOO));
    assert!(q.market_time.is_some());
}

#[tokio::test]
async fn chart_falls_back_to_last_close_without_meta_price() {
    let server = setup_server();
    let body = r#"{
      "chart": {
        "result": [{
          "meta": { "currency": "USD" },
          "indicators": { "quote": [{ "open": [180.0, null], "close": [null, 185.5] }] }
        }],
        "error": null
      }
    }"#;
    let _m = mock_chart(&server, "AAPL", body.to_string());

    let q = provider(&server).fetch("AAPL").await.into_quote().unwrap();
    assert_eq!(q.price, dec("185.5"));
    assert_eq!(q.change, dec("5.5"));
    assert_eq!(q.market, Market::Global);
}

#[tokio::test]
async fn chart_error_payload_is_rejected() {
    let server = setup_server();
    let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
    let _m = mock_chart(&server, "NOPE.NS", body.to_string());

    match provider(&server).fetch("NOPE.NS").await {
        ProviderResult::Unavailable(Unavailable::Rejected(msg)) => {
            assert!(msg.contains("delisted"), "{msg}");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn chart_status_codes_are_classified() {
    let server = setup_server();
    let _missing = server.mock(|when, then| {
        when.method(GET).path("/v8/finance/chart/GONE.NS");
        then.status(404).body("{}");
    });
    let _broken = server.mock(|when, then| {
        when.method(GET).path("/v8/finance/chart/AAPL");
        then.status(503).body("upstream down");
    });

    let yahoo = provider(&server);
    assert!(matches!(
        yahoo.fetch("GONE.NS").await,
        ProviderResult::Unavailable(Unavailable::NotFound { .. })
    ));
    assert!(matches!(
        yahoo.fetch("AAPL").await,
        ProviderResult::Unavailable(Unavailable::ServerError { status: 503, .. })
    ));
}

#[tokio::test]
async fn zero_price_is_never_a_quote() {
    let server = setup_server();
    let _m = mock_chart(&server, "ZERO.NS", chart_body("ZERO.NS", 0.0, 10.0));

    assert!(matches!(
        provider(&server).fetch("ZERO.NS").await,
        ProviderResult::Unavailable(Unavailable::InvalidPrice(_))
    ));
}

#[tokio::test]
async fn batch_uses_crumb_and_reports_missing_symbols() {
    let server = setup_server();
    let (cookie, crumb) = mock_cookie_crumb(&server);
    let v7 = server.mock(|when, then| {
        when.method(GET)
            .path("/v7/finance/quote")
            .query_param("symbols", "AAPL,MSFT")
            .query_param("crumb", "crumb-value");
        then.status(200)
            .header("content-type", "application/json")
            .body(v7_body(&[("AAPL", 185.5)]));
    });

    let yahoo = provider(&server);
    assert!(yahoo.supports_batch());
    let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];
    let out = yahoo.fetch_many(&symbols).await;

    cookie.assert();
    crumb.assert();
    v7.assert();

    assert_eq!(out.len(), 2);
    let aapl = out["AAPL"].clone().into_quote().unwrap();
    assert_eq!(aapl.price, dec("185.5"));
    assert_eq!(aapl.change, dec("1.5"));
    assert_eq!(aapl.change_percent, dec("0.75"));
    assert_eq!(aapl.name.as_deref(), Some("AAPL Inc"));
    assert!(matches!(
        out["MSFT"],
        ProviderResult::Unavailable(Unavailable::NoData)
    ));
}

#[tokio::test]
async fn batch_auth_failure_drops_crumb_without_retrying() {
    let server = setup_server();
    let (_cookie, crumb) = mock_cookie_crumb(&server);
    let v7 = server.mock(|when, then| {
        when.method(GET).path("/v7/finance/quote");
        then.status(401).body("unauthorized");
    });

    let yahoo = provider(&server);
    let symbols = vec!["AAPL".to_string()];

    let first = yahoo.fetch_many(&symbols).await;
    assert!(matches!(
        first["AAPL"],
        ProviderResult::Unavailable(Unavailable::Status { status: 401, .. })
    ));
    v7.assert_hits(1);
    crumb.assert_hits(1);

    // the next batch negotiates a fresh crumb
    let _ = yahoo.fetch_many(&symbols).await;
    v7.assert_hits(2);
    crumb.assert_hits(2);
}
