use httpmock::Method::GET;
use quote_cascade::provider::twelve_data::TwelveDataProvider;
use quote_cascade::{MarketRules, ProviderResult, QuoteProvider, Unavailable};

use crate::common::{dec, settings_for, setup_server};

fn provider(server: &httpmock::MockServer) -> TwelveDataProvider {
    TwelveDataProvider::new(&settings_for(server).with_api_key("td-key"), MarketRules::default())
        .unwrap()
}

#[tokio::test]
async fn domestic_symbols_are_sent_with_exchange() {
    let server = setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/quote")
            .query_param("symbol", "TCS")
            .query_param("exchange", "NSE")
            .query_param("apikey", "td-key");
        then.status(200)
            .header("content-type", "application/json")
            .body(
                r#"{
                  "symbol": "TCS",
                  "name": "Tata Consultancy Services Limited",
                  "exchange": "NSE",
                  "currency": "INR",
                  "datetime": "2026-01-12",
                  "timestamp": 1768208400,
                  "close": "3850.50000",
                  "previous_close": "3725.00000",
                  "change": "125.50000",
                  "percent_change": "3.36913"
                }"#,
            );
    });

    let q = provider(&server).fetch("TCS.NS").await.into_quote().unwrap();
    mock.assert();

    assert_eq!(q.symbol, "TCS.NS");
    assert_eq!(q.price, dec("3850.5"));
    assert_eq!(q.change_percent, dec("3.3691"));
    assert_eq!(q.name.as_deref(), Some("Tata Consultancy Services Limited"));
    assert!(q.market_time.is_some());
}

#[tokio::test]
async fn error_code_in_body_is_a_rejection() {
    let server = setup_server();
    let _m = server.mock(|when, then| {
        when.method(GET).path("/quote").query_param("symbol", "NOPE");
        then.status(200).body(
            r#"{"code":404,"message":"**symbol** not found: NOPE","status":"error"}"#,
        );
    });

    match provider(&server).fetch("NOPE").await {
        ProviderResult::Unavailable(Unavailable::Rejected(msg)) => {
            assert!(msg.starts_with("404"), "{msg}");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}
