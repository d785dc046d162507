//! Client error types.

use chrono::{DateTime, Utc};

/// Boxed error produced by a [`Transport`](crate::Transport) implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The underlying cause of a [`RequestError`].
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The request never produced a response (DNS, connect, timeout, body read).
    #[error("{0}")]
    Transport(#[source] BoxError),

    /// The API rejected the API key with HTTP 401.
    #[error("Unauthorized")]
    Unauthorized,

    /// The response body could not be decoded into the requested shape.
    #[error("{0}")]
    Decode(#[from] serde_json::Error),
}

/// Error returned by every request made through [`WefactClient`](crate::WefactClient).
///
/// It mirrors the shape of a response envelope so it can be logged next to
/// real API responses: controller and action are always `"invalid"`, status
/// is always `"error"`, and `errors` holds the cause.
#[derive(Debug, thiserror::Error)]
#[error("{}", self.to_envelope())]
pub struct RequestError {
    date: DateTime<Utc>,
    #[source]
    kind: ErrorKind,
}

impl RequestError {
    /// Controller and action reported by every request error.
    pub const INVALID: &'static str = "invalid";

    /// Status reported by every request error.
    pub const STATUS: &'static str = "error";

    pub(crate) fn new(kind: ErrorKind) -> Self {
        Self {
            date: Utc::now(),
            kind,
        }
    }

    pub(crate) fn transport(source: BoxError) -> Self {
        Self::new(ErrorKind::Transport(source))
    }

    pub(crate) fn unauthorized() -> Self {
        Self::new(ErrorKind::Unauthorized)
    }

    pub(crate) fn decode(source: serde_json::Error) -> Self {
        Self::new(ErrorKind::Decode(source))
    }

    /// The cause of this error.
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Consume the error and return its cause.
    #[must_use]
    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    /// When the error was created.
    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// True when the endpoint could not be reached or refused the API key.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, ErrorKind::Transport(_) | ErrorKind::Unauthorized)
    }

    /// True when the API key was rejected.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.kind, ErrorKind::Unauthorized)
    }

    /// True when a response arrived but its body did not decode.
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self.kind, ErrorKind::Decode(_))
    }

    /// Render the error as a response-shaped JSON object.
    #[must_use]
    pub fn to_envelope(&self) -> serde_json::Value {
        serde_json::json!({
            "controller": Self::INVALID,
            "action": Self::INVALID,
            "status": Self::STATUS,
            "date": self.date.to_rfc3339(),
            "errors": self.kind.to_string(),
        })
    }
}

/// Errors raised while building a client.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The proxy address could not be turned into a SOCKS5 proxy.
    #[error("invalid proxy {address}: {source}")]
    Proxy {
        /// The configured proxy address.
        address: String,
        /// Why it was rejected.
        source: reqwest::Error,
    },

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[source] reqwest::Error),
}
