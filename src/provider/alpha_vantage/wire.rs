use serde::Deserialize;

use crate::core::wire::de_f64_lenient;

/// `GLOBAL_QUOTE` response. Throttling and bad keys come back with HTTP 200
/// and one of the message fields instead of the quote.
#[derive(Deserialize)]
pub(crate) struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote", default)]
    pub(crate) global_quote: Option<GlobalQuote>,
    #[serde(rename = "Note", default)]
    pub(crate) note: Option<String>,
    #[serde(rename = "Information", default)]
    pub(crate) information: Option<String>,
    #[serde(rename = "Error Message", default)]
    pub(crate) error_message: Option<String>,
}

impl GlobalQuoteResponse {
    pub(crate) fn api_message(&self) -> Option<&str> {
        self.error_message
            .as_deref()
            .or(self.note.as_deref())
            .or(self.information.as_deref())
    }
}

/// All values are strings; an unknown symbol yields an empty object.
#[derive(Deserialize)]
pub(crate) struct GlobalQuote {
    #[serde(rename = "05. price", default, deserialize_with = "de_f64_lenient")]
    pub(crate) price: Option<f64>,
    #[serde(rename = "07. latest trading day", default)]
    pub(crate) latest_trading_day: Option<String>,
    #[serde(rename = "08. previous close", default, deserialize_with = "de_f64_lenient")]
    pub(crate) previous_close: Option<f64>,
    #[serde(rename = "09. change", default, deserialize_with = "de_f64_lenient")]
    pub(crate) change: Option<f64>,
    /// `"3.3600%"`
    #[serde(rename = "10. change percent", default)]
    pub(crate) change_percent: Option<String>,
}
