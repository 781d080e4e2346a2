use serde::Deserialize;

use crate::core::wire::{de_f64_lenient, de_i64_lenient};

/// `/quote` response. Errors come back as `{"code": 4xx, "message": ...}`,
/// sometimes with HTTP 200.
#[derive(Deserialize)]
pub(crate) struct TwelveQuote {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) currency: Option<String>,
    /// `"2026-01-12"`
    #[serde(default)]
    pub(crate) datetime: Option<String>,
    #[serde(default, deserialize_with = "de_i64_lenient")]
    pub(crate) timestamp: Option<i64>,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub(crate) close: Option<f64>,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub(crate) previous_close: Option<f64>,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub(crate) change: Option<f64>,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub(crate) percent_change: Option<f64>,

    #[serde(default, deserialize_with = "de_i64_lenient")]
    pub(crate) code: Option<i64>,
    #[serde(default)]
    pub(crate) message: Option<String>,
}
