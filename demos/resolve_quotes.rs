use quote_cascade::{ProviderId, QuoteService, Resolution, ResolverConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Log adapter fallthrough with RUST_LOG=quote_cascade=debug.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Start from a JSON config when one is given, and pick up keys from the environment.
    let mut config = match std::env::args().nth(1) {
        Some(path) => ResolverConfig::from_json_file(path)?,
        None => ResolverConfig::default(),
    };
    for (id, var) in [
        (ProviderId::FINNHUB, "FINNHUB_API_KEY"),
        (ProviderId::ALPHA_VANTAGE, "ALPHA_VANTAGE_API_KEY"),
        (ProviderId::TWELVE_DATA, "TWELVE_DATA_API_KEY"),
    ] {
        if let Ok(key) = std::env::var(var) {
            let settings = config.provider(&id).with_api_key(key);
            config = config.with_provider(id, settings);
        }
    }

    let service = QuoteService::from_config(config)?;

    println!("--- Single symbol ---");
    print_resolution(&service.resolve_quote("tcs").await);
    println!();

    println!("--- Bulk, one bad symbol ---");
    let result = service
        .resolve_quotes(["RELIANCE", "INVALID123", "AAPL", "nifty 50"])
        .await;
    for (raw, canonical) in result.inputs() {
        print!("{raw:>12} -> ");
        if let Some(r) = result.get(canonical) {
            print_resolution(r);
        }
    }
    println!();

    println!("--- Top crypto ---");
    for q in service.top_assets("crypto").await {
        println!("  {:<10} {:>12} {:>8}  [{}]", q.symbol, q.price, q.change_percent_display(), q.source);
    }

    Ok(())
}

fn print_resolution(r: &Resolution) {
    match r {
        Resolution::Resolved(q) => println!(
            "{} {} {} ({}) via {}",
            q.symbol,
            q.currency.as_deref().unwrap_or(""),
            q.price,
            q.change_percent_display(),
            q.source
        ),
        Resolution::Failed { symbol, failure } => println!("{symbol}: {failure}"),
    }
}
