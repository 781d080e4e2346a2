use serde::Deserialize;

use crate::core::wire::{de_f64_lenient, de_i64_lenient};

/// `/quote` response. An unknown symbol comes back as all zeros.
#[derive(Deserialize)]
pub(crate) struct FinnhubQuote {
    /// Current price.
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub(crate) c: Option<f64>,
    /// Change.
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub(crate) d: Option<f64>,
    /// Percent change.
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub(crate) dp: Option<f64>,
    /// Previous close.
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub(crate) pc: Option<f64>,
    /// Unix seconds.
    #[serde(default, deserialize_with = "de_i64_lenient")]
    pub(crate) t: Option<i64>,
    /// Set instead of the fields above on API-level errors.
    #[serde(default)]
    pub(crate) error: Option<String>,
}
