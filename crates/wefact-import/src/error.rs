//! Error types for the import job.

use std::path::PathBuf;

use wefact_client::{ConfigError, RequestError};

use crate::period::PeriodError;

/// Result type for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;

/// Errors that can occur while importing invoices.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Required configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The WeFact client could not be built.
    #[error("client error: {0}")]
    Client(#[from] ConfigError),

    /// The export file could not be read or removed.
    #[error("{path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// The export is not valid invoice XML.
    #[error("invalid invoice export: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// An invoice date could not be parsed.
    #[error("invalid invoice date {value:?}: {source}")]
    InvalidDate {
        /// The raw date.
        value: String,
        /// Why parsing failed.
        source: chrono::ParseError,
    },

    /// An invoice period could not be parsed.
    #[error(transparent)]
    Period(#[from] PeriodError),

    /// A specification amount is not a number.
    #[error("invalid amount {value:?}")]
    InvalidAmount {
        /// The raw amount.
        value: String,
    },

    /// The API call itself failed.
    #[error("request failed: {0}")]
    Request(#[from] RequestError),

    /// The API answered with `status: "error"`.
    #[error("{controller}/{action} rejected: {}", .errors.join("; "))]
    Rejected {
        /// Controller that was called.
        controller: String,
        /// Action that was called.
        action: String,
        /// Messages returned by the API.
        errors: Vec<String>,
    },
}
