//! HTTP transport behind the client.
//!
//! [`WefactClient`](crate::WefactClient) never talks to the network itself.
//! It hands an encoded form body to a [`Transport`], which returns the status
//! code and raw body. [`HttpTransport`] is the production implementation;
//! tests can plug in anything that implements the trait.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::error::{BoxError, ConfigError};

/// Status the API uses to reject an API key. Its body is never read.
pub const UNAUTHORIZED: u16 = 401;

/// Content type of every request body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A response as seen by the client: status code and unread body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

/// Sends one form-encoded POST and returns the raw response.
///
/// Implementations must be safe to share between tasks; the client holds a
/// single transport and calls it concurrently if its callers do.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` to `url` with a form content type.
    ///
    /// # Errors
    ///
    /// Returns an error only when no response could be obtained. Non-2xx
    /// statuses are responses, not errors. A [`UNAUTHORIZED`] response should
    /// be returned without reading its body.
    async fn post_form(&self, url: &str, body: String) -> Result<RawResponse, BoxError>;
}

/// Settings for [`HttpTransport`].
#[derive(Debug, Clone, Default)]
pub struct TransportOptions {
    /// SOCKS5 proxy as `host:port` (a `socks5://` or `socks5h://` URL is also accepted).
    pub proxy: Option<String>,
    /// Overall request timeout. Unset means no deadline.
    pub timeout: Option<Duration>,
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport.
    ///
    /// When a proxy is configured every connection is dialled through it and
    /// idle connections are not kept for reuse.
    ///
    /// # Errors
    ///
    /// Returns an error if the proxy address is invalid or the HTTP client
    /// cannot be built.
    pub fn new(options: &TransportOptions) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(address) = &options.proxy {
            let url = socks5_url(address);
            let proxy = reqwest::Proxy::all(url.as_str()).map_err(|source| ConfigError::Proxy {
                address: address.clone(),
                source,
            })?;
            builder = builder.proxy(proxy).pool_max_idle_per_host(0);
            tracing::debug!(proxy = %url, "Routing requests through SOCKS5 proxy");
        }

        let client = builder.build().map_err(ConfigError::Http)?;
        Ok(Self { client })
    }

    /// Wrap an existing `reqwest` client.
    #[must_use]
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_form(&self, url: &str, body: String) -> Result<RawResponse, BoxError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status == UNAUTHORIZED {
            return Ok(RawResponse {
                status,
                body: Vec::new(),
            });
        }

        let body = response.bytes().await?.to_vec();

        Ok(RawResponse { status, body })
    }
}

fn socks5_url(address: &str) -> String {
    if address.contains("://") {
        address.to_string()
    } else {
        format!("socks5://{address}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_proxy_address_gets_socks5_scheme() {
        assert_eq!(socks5_url("127.0.0.1:1080"), "socks5://127.0.0.1:1080");
        assert_eq!(socks5_url("socks5h://proxy:1080"), "socks5h://proxy:1080");
    }

    #[test]
    fn builds_with_and_without_proxy() {
        assert!(HttpTransport::new(&TransportOptions::default()).is_ok());

        let options = TransportOptions {
            proxy: Some("127.0.0.1:1080".into()),
            timeout: Some(Duration::from_secs(5)),
        };
        assert!(HttpTransport::new(&options).is_ok());
    }

    #[test]
    fn rejects_unusable_proxy() {
        let options = TransportOptions {
            proxy: Some("not a proxy ::".into()),
            timeout: None,
        };
        assert!(matches!(
            HttpTransport::new(&options),
            Err(ConfigError::Proxy { .. })
        ));
    }
}
