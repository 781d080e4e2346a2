mod common;

use httpmock::Method::GET;
use quote_cascade::{
    CancellationToken, Failure, ProviderId, ProviderSettings, QcError, QuoteService,
    ResolverConfig, SearchKind, Source,
};

use common::{Behavior, FakeProvider, as_dyn, dec, mock_cookie_crumb, setup_server, v7_body};

/// One chain entry per symbol class, no batch path.
fn single_chain(id: &str) -> ResolverConfig {
    let id = ProviderId::new(id);
    ResolverConfig {
        domestic_chain: vec![id.clone()],
        global_chain: vec![id.clone()],
        index_chain: vec![id],
        batch_provider: None,
        ..ResolverConfig::default()
    }
}

#[test]
fn builds_with_defaults_without_network() {
    let service = QuoteService::from_config(ResolverConfig::default()).unwrap();
    assert_eq!(service.normalize("reliance"), "RELIANCE.NS");
    assert_eq!(service.normalize("nifty"), "^NSEI");
    assert_eq!(service.normalize("aapl"), "AAPL");
}

#[test]
fn unknown_chain_entry_is_a_construction_error() {
    let err = QuoteService::from_config(single_chain("bloomberg")).unwrap_err();
    assert!(matches!(err, QcError::UnknownProvider(ref id) if id == "bloomberg"), "{err}");
}

#[test]
fn inconsistent_config_is_rejected() {
    let cfg = ResolverConfig {
        bulk_concurrency: 0,
        ..ResolverConfig::default()
    };
    assert!(matches!(
        QuoteService::from_config(cfg),
        Err(QcError::Config(_))
    ));
}

#[tokio::test]
async fn custom_provider_replaces_builtin_id() {
    let fake = FakeProvider::new("ignored", Behavior::Price(dec("3901.25")))
        .with_id(ProviderId::YAHOO)
        .arc();
    let service = QuoteService::builder()
        .config(single_chain("yahoo"))
        .without_builtin_providers()
        .provider(as_dyn(&fake))
        .build()
        .unwrap();

    let r = service.resolve_quote("tcs").await;
    let q = r.quote().unwrap();
    assert_eq!(q.symbol, "TCS.NS");
    assert_eq!(q.price, dec("3901.25"));
    assert_eq!(q.source, Source::Provider(ProviderId::YAHOO));
}

#[tokio::test]
async fn disabled_provider_is_left_out_of_the_chain() {
    let off = FakeProvider::new("off", Behavior::Price(dec("1"))).arc();
    let mut cfg = single_chain("off");
    cfg = cfg.with_provider(ProviderId::new("off"), ProviderSettings::default().disabled());

    let service = QuoteService::builder()
        .config(cfg)
        .without_builtin_providers()
        .provider(as_dyn(&off))
        .build()
        .unwrap();

    let r = service.resolve_quote("TCS").await;
    assert!(r.is_mock());
    assert_eq!(off.calls(), 0);
}

#[tokio::test]
async fn json_config_drives_chain_order() {
    let cfg = ResolverConfig::from_json_str(
        r#"{
          "global_chain": ["primary", "secondary"],
          "domestic_chain": ["secondary"],
          "index_chain": ["secondary"],
          "batch_provider": null,
          "bulk_concurrency": 2
        }"#,
    )
    .unwrap();
    let primary = FakeProvider::new("primary", Behavior::Missing).arc();
    let secondary = FakeProvider::new("secondary", Behavior::Price(dec("9"))).arc();

    let service = QuoteService::builder()
        .config(cfg)
        .without_builtin_providers()
        .provider(as_dyn(&primary))
        .provider(as_dyn(&secondary))
        .build()
        .unwrap();

    let result = service.resolve_quotes(["AAPL", "MSFT", "TCS"]).await;
    assert_eq!(result.quotes().count(), 3);
    assert_eq!(primary.calls(), 2);
    assert_eq!(secondary.calls(), 3);
}

#[tokio::test]
async fn search_maps_index_names_and_resolves_the_rest() {
    let down = FakeProvider::new("down", Behavior::Missing).arc();
    let service = QuoteService::builder()
        .config(single_chain("down"))
        .without_builtin_providers()
        .provider(as_dyn(&down))
        .build()
        .unwrap();

    let nifty = service.search("nifty 50").await;
    assert_eq!(nifty.len(), 1);
    assert_eq!(nifty[0].symbol, "^NSEI");
    assert_eq!(nifty[0].name, "NIFTY 50");
    assert_eq!(nifty[0].kind, SearchKind::Index);
    assert_eq!(down.calls(), 0);

    let tcs = service.search("tcs").await;
    assert_eq!(tcs.len(), 1);
    assert_eq!(tcs[0].symbol, "TCS.NS");
    assert_eq!(tcs[0].name, "Tata Consultancy Services");
    assert_eq!(tcs[0].kind, SearchKind::Equity);

    assert!(service.search("  ").await.is_empty());
    assert!(service.search("NOSUCHCO").await.is_empty());
}

#[tokio::test]
async fn top_assets_by_category_name() {
    let down = FakeProvider::new("down", Behavior::Missing).arc();
    let service = QuoteService::builder()
        .config(single_chain("down"))
        .without_builtin_providers()
        .provider(as_dyn(&down))
        .build()
        .unwrap();

    assert!(service.top_assets("commodities").await.is_empty());

    let bonds = service.top_assets("BOND").await;
    assert_eq!(bonds.len(), 1);
    assert_eq!(bonds[0].symbol, "^TNX");
    assert!(bonds[0].is_mock());
}

#[tokio::test]
async fn cancelled_bulk_request_keeps_every_symbol() {
    let live = FakeProvider::new("live", Behavior::Price(dec("1"))).arc();
    let service = QuoteService::builder()
        .config(single_chain("live"))
        .without_builtin_providers()
        .provider(as_dyn(&live))
        .build()
        .unwrap();
    let token = CancellationToken::new();
    token.cancel();

    let result = service
        .resolve_quotes_with_cancel(["AAPL", "TCS", "AAPL"], token)
        .await;
    assert_eq!(result.len(), 2);
    assert!(result.failures().all(|(_, f)| f == Failure::Cancelled));
}

#[tokio::test]
async fn builtin_yahoo_batch_end_to_end() {
    let server = setup_server();
    let (_cookie, _crumb) = mock_cookie_crumb(&server);
    let v7 = server.mock(|when, then| {
        when.method(GET)
            .path("/v7/finance/quote")
            .query_param("symbols", "TCS.NS,AAPL");
        then.status(200)
            .header("content-type", "application/json")
            .body(v7_body(&[("TCS.NS", 3850.5), ("AAPL", 185.5)]));
    });

    let mut cfg = ResolverConfig::default().with_provider(
        ProviderId::YAHOO,
        ProviderSettings::default().with_base_url(server.base_url()),
    );
    for id in [
        ProviderId::NSE,
        ProviderId::FINNHUB,
        ProviderId::ALPHA_VANTAGE,
        ProviderId::TWELVE_DATA,
    ] {
        cfg = cfg.with_provider(id, ProviderSettings::default().disabled());
    }
    let service = QuoteService::from_config(cfg).unwrap();

    let result = service.resolve_quotes(["tcs", "aapl"]).await;
    v7.assert();

    assert_eq!(result.len(), 2);
    let tcs = result.get_raw("tcs").unwrap().quote().unwrap();
    assert_eq!(tcs.price, dec("3850.5"));
    assert_eq!(tcs.currency.as_deref(), Some("INR"));
    assert_eq!(tcs.source, Source::Provider(ProviderId::YAHOO));
    assert!(result.get("AAPL").unwrap().is_live());
}

#[test]
fn reserved_mock_id_cannot_be_registered() {
    let impostor = FakeProvider::new("mock", Behavior::Price(dec("1"))).arc();
    let err = QuoteService::builder()
        .config(single_chain("yahoo"))
        .provider(as_dyn(&impostor))
        .build()
        .unwrap_err();
    assert!(matches!(err, QcError::Config(ref msg) if msg.contains("reserved")), "{err}");
}

#[tokio::test]
async fn bulk_and_single_agree_on_the_winning_provider() {
    let cfg = ResolverConfig {
        domestic_chain: vec![ProviderId::new("first"), ProviderId::new("second")],
        global_chain: vec![ProviderId::new("first"), ProviderId::new("second")],
        index_chain: vec![ProviderId::new("first")],
        batch_provider: Some(ProviderId::new("second")),
        ..ResolverConfig::default()
    };
    let first = FakeProvider::new("first", Behavior::Price(dec("101"))).arc();
    let second = FakeProvider::new("second", Behavior::Price(dec("202")))
        .batching()
        .arc();
    let service = QuoteService::builder()
        .config(cfg)
        .without_builtin_providers()
        .provider(as_dyn(&first))
        .provider(as_dyn(&second))
        .build()
        .unwrap();

    let single = service.resolve_quote("AAPL").await;
    let bulk = service.resolve_quotes(["AAPL"]).await;

    let winner = Source::Provider(ProviderId::new("first"));
    assert_eq!(single.quote().unwrap().source, winner);
    assert_eq!(bulk.get("AAPL").unwrap().quote().unwrap().source, winner);
    assert_eq!(second.batch_calls(), 0);
}

#[tokio::test]
async fn configured_suffixes_reach_the_static_store() {
    let down = FakeProvider::new("down", Behavior::Missing).arc();
    let cfg = ResolverConfig {
        domestic_suffixes: vec![".NS".into(), ".BO".into(), ".XN".into()],
        ..single_chain("down")
    };
    let service = QuoteService::builder()
        .config(cfg)
        .without_builtin_providers()
        .provider(as_dyn(&down))
        .build()
        .unwrap();

    let r = service.resolve_quote("TCS.XN").await;
    let q = r.quote().unwrap();
    assert!(q.is_mock());
    assert_eq!(q.symbol, "TCS.NS");
}
