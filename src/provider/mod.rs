//! Provider adapters and the trait they share.
//!
//! An adapter translates one upstream market-data API into the canonical
//! [`Quote`](crate::core::Quote). Every failure mode (HTTP status, transport
//! error, malformed body, missing or corrupt price) is reported as
//! [`ProviderResult::Unavailable`]; adapters never retry and never panic on
//! bad input.

mod draft;
mod registry;

pub mod alpha_vantage;
pub mod finnhub;
pub mod nse;
pub mod twelve_data;
pub mod yahoo;

use std::collections::HashMap;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::core::{ProviderId, ProviderResult, Unavailable};

pub use draft::QuoteDraft;
pub use registry::ProviderRegistry;

/// A single upstream quote source.
///
/// Implementors must apply their own request timeout (reported by
/// [`timeout`](Self::timeout)) and must not retry internally.
pub trait QuoteProvider: Send + Sync {
    /// Stable identifier used in chains and in `Quote::source`.
    fn id(&self) -> ProviderId;

    /// Upper bound for one `fetch` call. The resolver enforces it too.
    fn timeout(&self) -> Duration;

    /// Fetch one canonical symbol.
    fn fetch<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, ProviderResult>;

    /// Whether [`fetch_many`](Self::fetch_many) issues a real multi-symbol request.
    fn supports_batch(&self) -> bool {
        false
    }

    /// Fetch several symbols at once.
    ///
    /// The returned map should have an entry for every input; a failure for one
    /// symbol must not turn into a failure for the others. The default reports
    /// every symbol as [`Unavailable::BatchUnsupported`].
    fn fetch_many<'a>(
        &'a self,
        symbols: &'a [String],
    ) -> BoxFuture<'a, HashMap<String, ProviderResult>> {
        let out = symbols
            .iter()
            .map(|s| {
                (
                    s.clone(),
                    ProviderResult::Unavailable(Unavailable::BatchUnsupported),
                )
            })
            .collect();
        futures::future::ready(out).boxed()
    }
}

impl std::fmt::Debug for dyn QuoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteProvider")
            .field("id", &self.id())
            .field("timeout", &self.timeout())
            .finish()
    }
}
