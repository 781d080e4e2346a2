use httpmock::Method::GET;
use quote_cascade::provider::alpha_vantage::AlphaVantageProvider;
use quote_cascade::{MarketRules, ProviderResult, QuoteProvider, Unavailable};

use crate::common::{dec, settings_for, setup_server};

fn provider(server: &httpmock::MockServer) -> AlphaVantageProvider {
    AlphaVantageProvider::new(&settings_for(server).with_api_key("av-key"), MarketRules::default())
        .unwrap()
}

#[tokio::test]
async fn parses_global_quote_strings() {
    let server = setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/query")
            .query_param("function", "GLOBAL_QUOTE")
            .query_param("symbol", "RELIANCE.NS")
            .query_param("apikey", "av-key");
        then.status(200)
            .header("content-type", "application/json")
            .body(
                r#"{
                  "Global Quote": {
                    "01. symbol": "RELIANCE.NS",
                    "05. price": "2895.3000",
                    "07. latest trading day": "2026-01-12",
                    "08. previous close": "2799.5000",
                    "09. change": "95.8000",
                    "10. change percent": "3.4220%"
                  }
                }"#,
            );
    });

    let q = provider(&server)
        .fetch("RELIANCE.NS")
        .await
        .into_quote()
        .unwrap();
    mock.assert();

    assert_eq!(q.price, dec("2895.3"));
    assert_eq!(q.change, dec("95.8"));
    assert_eq!(q.change_percent, dec("3.422"));
    assert_eq!(q.currency.as_deref(), Some("INR"));
    assert_eq!(q.market_time.unwrap().date_naive().to_string(), "2026-01-12");
}

#[tokio::test]
async fn throttle_note_is_a_rejection() {
    let server = setup_server();
    let _m = server.mock(|when, then| {
        when.method(GET).path("/query");
        then.status(200).body(
            r#"{"Note":"Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}"#,
        );
    });

    match provider(&server).fetch("AAPL").await {
        ProviderResult::Unavailable(Unavailable::Rejected(msg)) => {
            assert!(msg.contains("call frequency"), "{msg}");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_global_quote_is_no_data() {
    let server = setup_server();
    let _m = server.mock(|when, then| {
        when.method(GET).path("/query");
        then.status(200).body(r#"{"Global Quote": {}}"#);
    });

    assert!(matches!(
        provider(&server).fetch("NOPE").await,
        ProviderResult::Unavailable(Unavailable::NoData)
    ));
}
