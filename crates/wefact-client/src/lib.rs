//! WeFact API client.
//!
//! Every WeFact call is an HTTP POST of a form-encoded body to a single
//! endpoint. The body carries the API key and the `controller`/`action` pair
//! that routes the call; the response is a JSON envelope.
//!
//! # Example
//!
//! ```no_run
//! use wefact_client::{Params, WefactClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = WefactClient::new("your-api-key")?;
//!
//! let response = client
//!     .request("debtor", "show", Params::new().with("DebtorCode", "DB10000"))
//!     .await?;
//!
//! if response.is_success() {
//!     println!("{:?}", response.object("debtor"));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! Requests fail in two ways only: the transport could not deliver the call
//! (including a rejected API key), or the body did not decode. An envelope
//! with `status: "error"` is a successful call as far as the client is
//! concerned.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod params;
mod response;
mod transport;

pub use client::{ClientOptions, WefactClient, DEFAULT_ENDPOINT, RESERVED_KEYS};
pub use error::{BoxError, ConfigError, ErrorKind, RequestError};
pub use params::Params;
pub use response::{decode, Response, Status};
pub use transport::{
    HttpTransport, RawResponse, Transport, TransportOptions, FORM_CONTENT_TYPE, UNAUTHORIZED,
};
