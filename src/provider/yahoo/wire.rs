use serde::Deserialize;

/* ----- chart v8 (single symbol) ----- */

#[derive(Deserialize)]
pub(crate) struct ChartEnvelope {
    pub(crate) chart: Option<ChartNode>,
}

#[derive(Deserialize)]
pub(crate) struct ChartNode {
    pub(crate) result: Option<Vec<ChartResult>>,
    pub(crate) error: Option<ChartError>,
}

#[derive(Deserialize)]
pub(crate) struct ChartError {
    #[serde(default)]
    pub(crate) code: String,
    #[serde(default)]
    pub(crate) description: String,
}

#[derive(Deserialize)]
pub(crate) struct ChartResult {
    #[serde(default)]
    pub(crate) meta: Option<MetaNode>,
    #[serde(default)]
    pub(crate) indicators: Option<Indicators>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MetaNode {
    #[serde(default)]
    pub(crate) currency: Option<String>,
    #[serde(default)]
    pub(crate) regular_market_price: Option<f64>,
    #[serde(default)]
    pub(crate) chart_previous_close: Option<f64>,
    #[serde(default)]
    pub(crate) previous_close: Option<f64>,
    #[serde(default)]
    pub(crate) regular_market_time: Option<i64>,
    #[serde(default)]
    pub(crate) short_name: Option<String>,
    #[serde(default)]
    pub(crate) long_name: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct Indicators {
    #[serde(default)]
    pub(crate) quote: Vec<QuoteBlock>,
}

#[derive(Deserialize)]
pub(crate) struct QuoteBlock {
    #[serde(default)]
    pub(crate) open: Vec<Option<f64>>,
    #[serde(default)]
    pub(crate) close: Vec<Option<f64>>,
}

impl ChartResult {
    /// Last non-null close of the session.
    pub(crate) fn last_close(&self) -> Option<f64> {
        self.indicators
            .as_ref()?
            .quote
            .first()?
            .close
            .iter()
            .rev()
            .find_map(|c| *c)
    }

    /// First non-null open of the session.
    pub(crate) fn first_open(&self) -> Option<f64> {
        self.indicators
            .as_ref()?
            .quote
            .first()?
            .open
            .iter()
            .find_map(|o| *o)
    }
}

/* ----- quote v7 (batch) ----- */

#[derive(Deserialize)]
pub(crate) struct V7Envelope {
    #[serde(rename = "quoteResponse")]
    pub(crate) quote_response: Option<V7QuoteResponse>,
}

#[derive(Deserialize)]
pub(crate) struct V7QuoteResponse {
    pub(crate) result: Option<Vec<V7QuoteNode>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct V7QuoteNode {
    #[serde(default)]
    pub(crate) symbol: Option<String>,
    #[serde(default)]
    pub(crate) short_name: Option<String>,
    #[serde(default)]
    pub(crate) long_name: Option<String>,
    #[serde(default)]
    pub(crate) regular_market_price: Option<f64>,
    #[serde(default)]
    pub(crate) regular_market_change: Option<f64>,
    #[serde(default)]
    pub(crate) regular_market_change_percent: Option<f64>,
    #[serde(default)]
    pub(crate) regular_market_previous_close: Option<f64>,
    #[serde(default)]
    pub(crate) regular_market_time: Option<i64>,
    #[serde(default)]
    pub(crate) currency: Option<String>,
}
