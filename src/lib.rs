//! quote-cascade: resilient market quote resolution.
//!
//! A symbol typed by a user (`"tcs"`, `"nifty 50"`, `"AAPL"`) is normalized
//! to a canonical exchange ticker and resolved against an ordered chain of
//! upstream providers. The first valid live quote wins; when every provider
//! misses, a curated static quote tagged `mock` is returned instead, and only
//! a symbol unknown everywhere ends up as `SymbolNotFound`.
//!
//! ```no_run
//! # async fn run() -> Result<(), quote_cascade::QcError> {
//! use quote_cascade::{QuoteService, ResolverConfig};
//!
//! let service = QuoteService::from_config(ResolverConfig::default())?;
//! let tcs = service.resolve_quote("tcs").await;
//! if let Some(q) = tcs.quote() {
//!     println!("{} {} ({}) via {}", q.symbol, q.price, q.change_percent_display(), q.source);
//! }
//!
//! let many = service.resolve_quotes(["RELIANCE", "INVALID123", "AAPL"]).await;
//! for (symbol, failure) in many.failures() {
//!     println!("{symbol}: {failure}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod bulk;
pub mod core;
pub mod fallback;
pub mod provider;
pub mod resolver;
mod service;
pub mod symbol;

pub use bulk::{BulkResolver, BulkResult};
pub use core::{
    Category, Failure, HttpClientBuilder, Market, ProviderId, ProviderResult, ProviderSettings,
    QcError, Quote, QuoteCache, Resolution, ResolverConfig, Source, Unavailable,
};
pub use fallback::{FallbackRecord, StaticFallbackStore};
pub use provider::{ProviderRegistry, QuoteDraft, QuoteProvider};
pub use resolver::{FallbackResolver, ProviderChain};
pub use service::{QuoteService, QuoteServiceBuilder, SearchHit, SearchKind};
pub use symbol::{MarketRules, SymbolNormalizer};

pub use tokio_util::sync::CancellationToken;
