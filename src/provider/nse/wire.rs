use serde::Deserialize;

use crate::core::wire::de_f64_lenient;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NseEnvelope {
    #[serde(default)]
    pub(crate) data: Vec<NseQuoteNode>,
    /// `"12-JAN-2026 15:30:00"`, exchange local time.
    #[serde(default)]
    pub(crate) last_update_time: Option<String>,
}

/// Numbers arrive as comma-grouped strings (`"3,850.50"`).
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NseQuoteNode {
    #[serde(default)]
    pub(crate) company_name: Option<String>,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub(crate) last_price: Option<f64>,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub(crate) previous_close: Option<f64>,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub(crate) change: Option<f64>,
    #[serde(default, deserialize_with = "de_f64_lenient")]
    pub(crate) p_change: Option<f64>,
}
