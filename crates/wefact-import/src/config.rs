//! Import job configuration.

use std::time::Duration;

use wefact_client::{ClientOptions, DEFAULT_ENDPOINT};

use crate::error::{ImportError, Result};

/// Defaults applied to every imported invoice line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDefaults {
    /// WeFact product code of usage lines (default: "P0066").
    pub product_code: String,
    /// WeFact tax code (default: "V21").
    pub tax_code: String,
    /// Tax percentage (default: "21").
    pub tax_percentage: String,
}

impl Default for InvoiceDefaults {
    fn default() -> Self {
        Self {
            product_code: "P0066".into(),
            tax_code: "V21".into(),
            tax_percentage: "21".into(),
        }
    }
}

/// Configuration loaded from environment variables.
#[derive(Clone)]
pub struct ImportConfig {
    /// WeFact API key.
    pub api_key: String,

    /// API endpoint (default: the production endpoint).
    pub endpoint: String,

    /// SOCKS5 proxy as `host:port` (optional).
    pub proxy_host: Option<String>,

    /// Request timeout (optional).
    pub timeout: Option<Duration>,

    /// Debtor custom field holding the watermark (default: "voipit").
    pub watermark_field: String,

    /// Invoice line defaults.
    pub invoice: InvoiceDefaults,
}

impl ImportConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `WEFACT_API_KEY` is missing or a value is malformed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if `WEFACT_API_KEY` is missing or a value is malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = InvoiceDefaults::default();

        let api_key = var("WEFACT_API_KEY")
            .ok_or_else(|| ImportError::Configuration("WEFACT_API_KEY is not set".into()))?;

        let timeout = var("WEFACT_TIMEOUT_SECONDS")
            .map(|raw| {
                raw.trim().parse::<u64>().map(Duration::from_secs).map_err(|_| {
                    ImportError::Configuration(format!(
                        "WEFACT_TIMEOUT_SECONDS must be a whole number of seconds, got {raw:?}"
                    ))
                })
            })
            .transpose()?;

        Ok(Self {
            api_key,
            endpoint: var("WEFACT_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.into()),
            proxy_host: var("WEFACT_PROXY_HOST"),
            timeout,
            watermark_field: var("WEFACT_WATERMARK_FIELD").unwrap_or_else(|| "voipit".into()),
            invoice: InvoiceDefaults {
                product_code: var("WEFACT_PRODUCT_CODE").unwrap_or(defaults.product_code),
                tax_code: var("WEFACT_TAX_CODE").unwrap_or(defaults.tax_code),
                tax_percentage: var("WEFACT_TAX_PERCENTAGE").unwrap_or(defaults.tax_percentage),
            },
        })
    }

    /// Client options derived from this configuration.
    #[must_use]
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            endpoint: self.endpoint.clone(),
            proxy: self.proxy_host.clone(),
            timeout: self.timeout,
        }
    }
}

impl std::fmt::Debug for ImportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("proxy_host", &self.proxy_host)
            .field("timeout", &self.timeout)
            .field("watermark_field", &self.watermark_field)
            .field("invoice", &self.invoice)
            .finish()
    }
}
