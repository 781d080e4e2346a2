//! HTTP client construction shared by every provider adapter.
//! Endpoint defaults and the UA live in `constants`.

mod constants;

pub(crate) use constants::*;

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::core::QcError;

/// Parse a provider root, falling back to `default`. A trailing `/` is added
/// so relative endpoint paths join below the root instead of replacing its
/// last segment.
pub(crate) fn api_root(configured: Option<&str>, default: &str) -> Result<Url, QcError> {
    let raw = configured.map_or(default, str::trim);
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Builder for the `reqwest::Client` an adapter owns.
///
/// Every adapter gets its own client so each can carry its own timeout;
/// connection pooling stays inside `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct HttpClientBuilder {
    timeout: Option<Duration>,
    cookie_store: bool,
    headers: Vec<(String, String)>,
}

impl HttpClientBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overall request timeout. Default: none.
    #[must_use]
    pub const fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Keep cookies between requests (needed for Yahoo's crumb handshake).
    #[must_use]
    pub const fn cookie_store(mut self, enabled: bool) -> Self {
        self.cookie_store = enabled;
        self
    }

    /// Send a header with every request (e.g. an API token).
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// # Errors
    /// Fails on an invalid header or if the TLS backend cannot be initialized.
    pub fn build(self) -> Result<Client, QcError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| QcError::Config(format!("invalid header name {name}: {e}")))?;
            let mut value = HeaderValue::from_str(value)
                .map_err(|e| QcError::Config(format!("invalid header value: {e}")))?;
            value.set_sensitive(true);
            headers.insert(name, value);
        }

        let mut httpb = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .cookie_store(self.cookie_store);

        if let Some(t) = self.timeout {
            httpb = httpb.timeout(t);
        }

        Ok(httpb.build()?)
    }
}
