use thiserror::Error;
use url::Url;

/// Errors raised while building a resolver from its configuration.
///
/// Resolution itself never fails with this type: callers get a typed
/// [`Resolution`](crate::core::Resolution) instead.
#[derive(Debug, Error)]
pub enum QcError {
    /// The HTTP client for an adapter could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A provider base URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A priority list names a provider that is neither built in nor registered.
    #[error("unknown provider id: {0}")]
    UnknownProvider(String),

    /// The configuration is internally inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A JSON configuration document could not be parsed.
    #[error("configuration parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration file could not be read.
    #[error("configuration I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a provider adapter produced no quote.
///
/// This is the adapter-local "no result" signal. It is recovered by the
/// resolver (by trying the next provider) and never surfaces to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unavailable {
    /// The provider needs an API key and none is configured.
    #[error("no API key configured")]
    MissingCredentials,

    /// The provider does not serve this kind of symbol.
    #[error("symbol not covered by this provider")]
    NotCovered,

    /// The provider answered but had nothing for the symbol.
    #[error("provider returned no data for the symbol")]
    NoData,

    /// The provider reported an API-level error in an otherwise valid body.
    #[error("provider rejected the request: {0}")]
    Rejected(String),

    /// The endpoint returned 404.
    #[error("not found at {url}")]
    NotFound {
        /// Endpoint URL without its query string.
        url: String,
    },

    /// The endpoint returned 429.
    #[error("rate limited at {url}")]
    RateLimited {
        /// Endpoint URL without its query string.
        url: String,
    },

    /// The endpoint returned a 5xx status.
    #[error("server error {status} at {url}")]
    ServerError {
        /// The HTTP status code.
        status: u16,
        /// Endpoint URL without its query string.
        url: String,
    },

    /// Any other unsuccessful HTTP status.
    #[error("unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// Endpoint URL without its query string.
        url: String,
    },

    /// The request did not complete within the adapter's timeout.
    #[error("request timed out")]
    Timeout,

    /// Connection, TLS or body-read failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The body could not be decoded into the provider's response shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The response decoded but carried no usable price field.
    #[error("response carried no price")]
    MissingPrice,

    /// The price was NaN, infinite, zero or negative.
    #[error("invalid price value: {0}")]
    InvalidPrice(String),

    /// The provider has no multi-symbol endpoint.
    #[error("provider does not support batch requests")]
    BatchUnsupported,

    /// The adapter panicked; the resolver caught it.
    #[error("adapter panicked: {0}")]
    Panicked(String),
}

impl Unavailable {
    /// Classify an unsuccessful HTTP status the same way for every adapter.
    pub(crate) fn from_status(status: u16, url: &Url) -> Self {
        let url = redact(url);
        match status {
            404 => Self::NotFound { url },
            429 => Self::RateLimited { url },
            500..=599 => Self::ServerError { status, url },
            _ => Self::Status { status, url },
        }
    }
}

impl From<reqwest::Error> for Unavailable {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Malformed(e.to_string())
        } else {
            Self::Transport(e.without_url().to_string())
        }
    }
}

impl From<serde_json::Error> for Unavailable {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}

/// Drop the query string so API keys never end up in logs or results.
pub(crate) fn redact(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.set_fragment(None);
    clean.to_string()
}
