//! Core components of the `quote-cascade` crate.
//!
//! This module contains the foundational building blocks of the library, including:
//! - The shared HTTP client builder and default endpoints.
//! - The error types ([`QcError`], [`Unavailable`]).
//! - Shared data models like [`Quote`] and [`Resolution`].
//! - Configuration, numeric conversions and the optional quote cache.

/// Short-lived memo of live quotes.
pub mod cache;
/// HTTP client construction and default endpoints.
pub mod client;
/// Resolver configuration (`ResolverConfig`).
pub mod config;
/// Numeric and timestamp conversions used by the adapters.
pub mod conversions;
/// Error types for construction and adapter failures.
pub mod error;
/// Shared data models used across the pipeline.
pub mod models;

pub(crate) mod net;
pub(crate) mod wire;

// convenient re-exports so most code can just `use crate::core::Quote`
pub use cache::QuoteCache;
pub use client::HttpClientBuilder;
pub use config::{ProviderSettings, ResolverConfig};
pub use error::{QcError, Unavailable};
pub use models::{
    Category, Failure, Market, ProviderId, ProviderResult, Quote, Resolution, Source,
};
