//! WeFact HTTP client implementation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::error::{ConfigError, RequestError};
use crate::params::Params;
use crate::response::{decode, Response};
use crate::transport::{HttpTransport, Transport, TransportOptions, UNAUTHORIZED};

/// Production API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.mijnwefact.nl/v2/";

/// Form fields the client always sets itself.
pub const RESERVED_KEYS: [&str; 3] = ["api_key", "controller", "action"];

/// WeFact API client.
///
/// Every call is a single form-encoded POST to one endpoint, routed by the
/// `controller` and `action` fields. The client holds no per-request state
/// and is cheap to clone.
#[derive(Clone)]
pub struct WefactClient {
    transport: Arc<dyn Transport>,
    endpoint: String,
    api_key: String,
}

impl WefactClient {
    /// Create a client for the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        Self::with_options(api_key, ClientOptions::default())
    }

    /// Create a client with custom options.
    ///
    /// # Errors
    ///
    /// Returns an error if the proxy is invalid or the HTTP client cannot be built.
    pub fn with_options(
        api_key: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(&TransportOptions {
            proxy: options.proxy,
            timeout: options.timeout,
        })?;

        Ok(Self::with_transport(api_key, options.endpoint, transport))
    }

    /// Create a client on top of any [`Transport`].
    #[must_use]
    pub fn with_transport(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        transport: impl Transport + 'static,
    ) -> Self {
        Self {
            transport: Arc::new(transport),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// The endpoint every request is posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Call `controller`/`action` and decode the response envelope.
    ///
    /// A `status` of `"error"` in the envelope is returned as `Ok`; callers
    /// decide what a business-level failure means for them.
    ///
    /// # Errors
    ///
    /// See [`WefactClient::request_into`].
    pub async fn request(
        &self,
        controller: &str,
        action: &str,
        params: Params,
    ) -> Result<Response, RequestError> {
        self.request_into(controller, action, params).await
    }

    /// Call `controller`/`action` and decode the body straight into `T`.
    ///
    /// Caller values for `api_key`, `controller` or `action` are discarded in
    /// favour of the client's own.
    ///
    /// # Errors
    ///
    /// Returns a transport error if no response was received or the API key
    /// was rejected (HTTP 401), and a decode error if the body is not JSON of
    /// the expected shape.
    #[instrument(skip(self, params), fields(params = params.len()))]
    pub async fn request_into<T: DeserializeOwned>(
        &self,
        controller: &str,
        action: &str,
        params: Params,
    ) -> Result<T, RequestError> {
        let mut form = params;
        for (key, value) in RESERVED_KEYS
            .into_iter()
            .zip([self.api_key.as_str(), controller, action])
        {
            form.set(key, value);
        }

        let response = self
            .transport
            .post_form(&self.endpoint, form.encode())
            .await
            .map_err(|e| {
                warn!(error = %e, "Request failed");
                RequestError::transport(e)
            })?;

        debug!(
            status = response.status,
            bytes = response.body.len(),
            "Received response"
        );

        if response.status == UNAUTHORIZED {
            warn!("API key rejected");
            return Err(RequestError::unauthorized());
        }

        decode(&response.body).map_err(|e| {
            warn!(error = %e, "Failed to decode response body");
            RequestError::decode(e)
        })
    }

    /// Fetch a debtor by code (`debtor/show`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response does not decode.
    pub async fn get_debtor(&self, code: &str) -> Result<Response, RequestError> {
        self.request("debtor", "show", Params::new().with("DebtorCode", code))
            .await
    }

    /// Update a debtor (`debtor/edit`). `params` carries the changed fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response does not decode.
    pub async fn edit_debtor(&self, code: &str, params: Params) -> Result<Response, RequestError> {
        let mut params = params;
        params.set("DebtorCode", code);
        self.request("debtor", "edit", params).await
    }

    /// Fetch an invoice by code (`invoice/show`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response does not decode.
    pub async fn get_invoice(&self, code: &str) -> Result<Response, RequestError> {
        self.request("invoice", "show", Params::new().with("InvoiceCode", code))
            .await
    }

    /// List invoices (`invoice/list`). `params` may carry filters and paging.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response does not decode.
    pub async fn list_invoices(&self, params: Params) -> Result<Response, RequestError> {
        self.request("invoice", "list", params).await
    }

    /// Create an invoice for a debtor (`invoice/add`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response does not decode.
    pub async fn create_invoice(
        &self,
        debtor_code: &str,
        params: Params,
    ) -> Result<Response, RequestError> {
        let mut params = params;
        params.set("DebtorCode", debtor_code);
        self.request("invoice", "add", params).await
    }
}

impl fmt::Debug for WefactClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WefactClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Endpoint to post to (default: [`DEFAULT_ENDPOINT`]).
    pub endpoint: String,
    /// SOCKS5 proxy as `host:port` (default: none).
    pub proxy: Option<String>,
    /// Request timeout (default: none).
    pub timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            proxy: None,
            timeout: None,
        }
    }
}

impl ClientOptions {
    /// Options pointing at a different endpoint.
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Route requests through a SOCKS5 proxy.
    #[must_use]
    pub fn proxy(mut self, address: impl Into<String>) -> Self {
        self.proxy = Some(address.into());
        self
    }

    /// Bound every request by `timeout`.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::transport::RawResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns a canned response and records every body it was given.
    struct CannedTransport {
        status: u16,
        body: &'static str,
        sent: Arc<Mutex<Vec<(String, String)>>>,
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn post_form(&self, url: &str, body: String) -> Result<RawResponse, BoxError> {
            self.sent.lock().unwrap().push((url.to_string(), body));
            Ok(RawResponse {
                status: self.status,
                body: self.body.as_bytes().to_vec(),
            })
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl Transport for FailingTransport {
        async fn post_form(&self, _url: &str, _body: String) -> Result<RawResponse, BoxError> {
            Err("connection refused".into())
        }
    }

    fn canned(status: u16, body: &'static str) -> (WefactClient, Arc<Mutex<Vec<(String, String)>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let transport = CannedTransport {
            status,
            body,
            sent: Arc::clone(&sent),
        };
        (
            WefactClient::with_transport("secret", "http://wefact.test/v2/", transport),
            sent,
        )
    }

    #[test]
    fn default_options() {
        let options = ClientOptions::default();
        assert_eq!(options.endpoint, DEFAULT_ENDPOINT);
        assert!(options.proxy.is_none());
        assert!(options.timeout.is_none());
    }

    #[test]
    fn options_builder() {
        let options = ClientOptions::with_endpoint("http://localhost:8080/")
            .proxy("127.0.0.1:1080")
            .timeout(Duration::from_secs(10));

        assert_eq!(options.endpoint, "http://localhost:8080/");
        assert_eq!(options.proxy.as_deref(), Some("127.0.0.1:1080"));
        assert_eq!(options.timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn debug_hides_api_key() {
        let (client, _) = canned(200, "{}");
        let rendered = format!("{client:?}");
        assert!(rendered.contains("wefact.test"));
        assert!(!rendered.contains("secret"));
    }

    #[tokio::test]
    async fn reserved_fields_are_appended() {
        let (client, sent) = canned(200, r#"{"status":"success"}"#);

        let response = client
            .request("debtor", "show", Params::new().with("DebtorCode", "DB1"))
            .await
            .unwrap();

        assert!(response.is_success());
        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "http://wefact.test/v2/");
        assert_eq!(
            sent[0].1,
            "DebtorCode=DB1&api_key=secret&controller=debtor&action=show"
        );
    }

    #[tokio::test]
    async fn unauthorized_skips_decoding() {
        let (client, _) = canned(401, "not json at all");

        let err = client.request("invoice", "list", Params::new()).await.unwrap_err();

        assert!(err.is_unauthorized());
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn other_statuses_are_decoded() {
        let (client, _) = canned(
            500,
            r#"{"controller":"invoice","action":"add","status":"error","errors":["boom"]}"#,
        );

        let response = client
            .create_invoice("DB1", Params::new())
            .await
            .unwrap();

        assert!(response.is_error());
        assert_eq!(response.errors(), vec!["boom"]);
    }

    #[tokio::test]
    async fn transport_failure_is_reported() {
        let client = WefactClient::with_transport("secret", "http://wefact.test/", FailingTransport);

        let err = client.get_invoice("F1").await.unwrap_err();

        assert!(err.is_transport());
        assert!(!err.is_unauthorized());
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn helpers_set_their_codes() {
        let (client, sent) = canned(200, "{}");

        client
            .edit_debtor("DB7", Params::new().with("CustomFields[voipit]", "2021-01-31"))
            .await
            .unwrap();
        client.get_debtor("DB8").await.unwrap();

        let sent = sent.lock().unwrap();
        assert!(sent[0].1.starts_with("CustomFields%5Bvoipit%5D=2021-01-31&DebtorCode=DB7&"));
        assert!(sent[0].1.ends_with("controller=debtor&action=edit"));
        assert!(sent[1].1.starts_with("DebtorCode=DB8&"));
        assert!(sent[1].1.ends_with("action=show"));
    }
}
