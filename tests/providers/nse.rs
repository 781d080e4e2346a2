use httpmock::Method::GET;
use quote_cascade::provider::nse::NseProvider;
use quote_cascade::{Market, ProviderResult, QuoteProvider, Unavailable};

use crate::common::{dec, settings_for, setup_server};

const QUOTE_PATH: &str = "/live_nse/CommonDntUtils/getQuote.jsp";

#[tokio::test]
async fn parses_comma_grouped_strings() {
    let server = setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET).path(QUOTE_PATH).query_param("symbol", "TCS");
        then.status(200)
            .header("content-type", "application/json")
            .body(
                r#"{
                  "data": [{
                    "companyName": "Tata Consultancy Services Limited",
                    "lastPrice": "3,850.50",
                    "previousClose": "3,725.00",
                    "change": "125.50",
                    "pChange": "3.37"
                  }],
                  "lastUpdateTime": "12-JAN-2026 15:30:00"
                }"#,
            );
    });

    let nse = NseProvider::new(&settings_for(&server)).unwrap();
    let q = nse.fetch("TCS.NS").await.into_quote().unwrap();
    mock.assert();

    assert_eq!(q.symbol, "TCS.NS");
    assert_eq!(q.market, Market::Domestic);
    assert_eq!(q.price, dec("3850.5"));
    assert_eq!(q.change, dec("125.5"));
    assert_eq!(q.change_percent, dec("3.37"));
    assert_eq!(q.currency.as_deref(), Some("INR"));
    assert_eq!(
        q.market_time.unwrap().to_rfc3339(),
        "2026-01-12T10:00:00+00:00"
    );
}

#[tokio::test]
async fn other_listings_are_not_requested() {
    let server = setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET).path(QUOTE_PATH);
        then.status(200).body("{}");
    });

    let nse = NseProvider::new(&settings_for(&server)).unwrap();
    for symbol in ["AAPL", "TCS.BO", "^NSEI"] {
        assert!(matches!(
            nse.fetch(symbol).await,
            ProviderResult::Unavailable(Unavailable::NotCovered)
        ));
    }
    mock.assert_hits(0);
}

#[tokio::test]
async fn empty_data_and_html_are_unavailable() {
    let server = setup_server();
    let _empty = server.mock(|when, then| {
        when.method(GET).path(QUOTE_PATH).query_param("symbol", "NOPE");
        then.status(200).body(r#"{"data": []}"#);
    });
    let _html = server.mock(|when, then| {
        when.method(GET).path(QUOTE_PATH).query_param("symbol", "TCS");
        then.status(200).body("<html>Access Denied</html>");
    });

    let nse = NseProvider::new(&settings_for(&server)).unwrap();
    assert!(matches!(
        nse.fetch("NOPE.NS").await,
        ProviderResult::Unavailable(Unavailable::NoData)
    ));
    assert!(matches!(
        nse.fetch("TCS.NS").await,
        ProviderResult::Unavailable(Unavailable::Malformed(_))
    ));
}
