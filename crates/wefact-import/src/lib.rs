//! Billing portal to WeFact invoice import.
//!
//! Reads an XML invoice export and, for every invoice, compares its date
//! with the debtor's import watermark (a custom field in WeFact). Newer
//! invoices are created with `invoice/add` and the watermark is moved to the
//! end of the invoiced period with `debtor/edit`, so repeated runs over the
//! same export import each invoice once.
//!
//! # Configuration
//!
//! | Variable | Default |
//! |----------|---------|
//! | `WEFACT_API_KEY` | required |
//! | `WEFACT_ENDPOINT` | `https://api.mijnwefact.nl/v2/` |
//! | `WEFACT_PROXY_HOST` | none (SOCKS5 `host:port`) |
//! | `WEFACT_TIMEOUT_SECONDS` | none |
//! | `WEFACT_WATERMARK_FIELD` | `voipit` |
//! | `WEFACT_PRODUCT_CODE` | `P0066` |
//! | `WEFACT_TAX_CODE` | `V21` |
//! | `WEFACT_TAX_PERCENTAGE` | `21` |

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod invoice;
pub mod period;
pub mod watermark;

pub use config::{ImportConfig, InvoiceDefaults};
pub use error::{ImportError, Result};
pub use export::{Invoice, Invoices, Specification, Specifications};
pub use import::{run, ImportSummary, Importer, RunOptions};
pub use period::InvoicePeriod;
