use httpmock::Method::GET;
use quote_cascade::provider::finnhub::FinnhubProvider;
use quote_cascade::{MarketRules, ProviderId, ProviderResult, QuoteProvider, Source, Unavailable};

use crate::common::{dec, settings_for, setup_server};

fn provider(server: &httpmock::MockServer, key: Option<&str>) -> FinnhubProvider {
    let mut settings = settings_for(server);
    if let Some(k) = key {
        settings = settings.with_api_key(k);
    }
    FinnhubProvider::new(&settings, MarketRules::default()).unwrap()
}

#[tokio::test]
async fn sends_token_header_and_parses_quote() {
    let server = setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/quote")
            .query_param("symbol", "AAPL")
            .header("X-Finnhub-Token", "fh-key");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"c":185.5,"d":2.5,"dp":1.3661,"h":186,"l":183,"o":183.2,"pc":183,"t":1768208400}"#);
    });

    let q = provider(&server, Some("fh-key"))
        .fetch("AAPL")
        .await
        .into_quote()
        .unwrap();
    mock.assert();

    assert_eq!(q.price, dec("185.5"));
    assert_eq!(q.change, dec("2.5"));
    assert_eq!(q.change_percent, dec("1.3661"));
    assert_eq!(q.source, Source::Provider(ProviderId::FINNHUB));
    assert_eq!(q.currency.as_deref(), Some("USD"));
}

#[tokio::test]
async fn missing_key_never_hits_the_network() {
    let server = setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/quote");
        then.status(200).body("{}");
    });

    for key in [None, Some("   ")] {
        assert!(matches!(
            provider(&server, key).fetch("AAPL").await,
            ProviderResult::Unavailable(Unavailable::MissingCredentials)
        ));
    }
    mock.assert_hits(0);
}

#[tokio::test]
async fn unknown_symbol_zero_price_is_no_data() {
    let server = setup_server();
    let _m = server.mock(|when, then| {
        when.method(GET).path("/quote");
        then.status(200)
            .body(r#"{"c":0,"d":null,"dp":null,"h":0,"l":0,"o":0,"pc":0,"t":0}"#);
    });

    assert!(matches!(
        provider(&server, Some("k")).fetch("NOPE").await,
        ProviderResult::Unavailable(Unavailable::NoData)
    ));
}

#[tokio::test]
async fn forbidden_and_api_errors_are_rejections() {
    let server = setup_server();
    let _forbidden = server.mock(|when, then| {
        when.method(GET).path("/quote").query_param("symbol", "TCS.NS");
        then.status(403).body(r#"{"error":"You don't have access to this resource."}"#);
    });
    let _bad_key = server.mock(|when, then| {
        when.method(GET).path("/quote").query_param("symbol", "AAPL");
        then.status(200).body(r#"{"error":"Invalid API key"}"#);
    });

    let finnhub = provider(&server, Some("k"));
    assert!(matches!(
        finnhub.fetch("TCS.NS").await,
        ProviderResult::Unavailable(Unavailable::Rejected(_))
    ));
    match finnhub.fetch("AAPL").await {
        ProviderResult::Unavailable(Unavailable::Rejected(msg)) => assert_eq!(msg, "Invalid API key"),
        other => panic!("expected Rejected, got {other:?}"),
    }
}
