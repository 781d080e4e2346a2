use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use url::Url;

use crate::core::error::Unavailable;

/// A completed HTTP exchange: final URL, status code and body text.
pub(crate) struct Fetched {
    pub(crate) url: Url,
    pub(crate) status: u16,
    pub(crate) body: String,
}

impl Fetched {
    pub(crate) const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Map a non-2xx status onto the shared classification.
    pub(crate) fn ensure_success(self) -> Result<Self, Unavailable> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Unavailable::from_status(self.status, &self.url))
        }
    }

    pub(crate) fn decode<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, Unavailable> {
        serde_json::from_str(&self.body)
            .map_err(|e| Unavailable::Malformed(format!("{endpoint}: {e}")))
    }
}

/// Send one request and read the body as text. Exactly one attempt is made.
pub(crate) async fn send(
    req: RequestBuilder,
    endpoint: &str,
    symbol: &str,
) -> Result<Fetched, Unavailable> {
    let resp = req
        .header("accept", "application/json")
        .send()
        .await?;
    let url = resp.url().clone();
    let status = resp.status().as_u16();
    let body = resp.text().await?;

    tracing::debug!(
        endpoint,
        symbol,
        status,
        bytes = body.len(),
        "provider response"
    );

    Ok(Fetched { url, status, body })
}

/// `send` + status check + JSON decode.
pub(crate) async fn get_json<T: DeserializeOwned>(
    req: RequestBuilder,
    endpoint: &str,
    symbol: &str,
) -> Result<T, Unavailable> {
    send(req, endpoint, symbol)
        .await?
        .ensure_success()?
        .decode(endpoint)
}
