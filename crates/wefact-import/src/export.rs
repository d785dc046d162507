//! Billing portal invoice export.
//!
//! ```xml
//! <Invoices>
//!   <Invoice>
//!     <DebtorNumber>DB10000</DebtorNumber>
//!     <CustomerName>Acme BV</CustomerName>
//!     <Date>2-2-2021 08:15:00</Date>
//!     <Period>1 januari 2021 t/m 31 januari 2021</Period>
//!     <Specifications>
//!       <Specification>
//!         <Category>Vast</Category>
//!         <Amount>12,50</Amount>
//!       </Specification>
//!     </Specifications>
//!   </Invoice>
//! </Invoices>
//! ```
//!
//! Elements not listed here are ignored.

use std::path::Path;

use serde::Deserialize;

use crate::error::{ImportError, Result};

/// Root of an export file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Invoices {
    /// Exported invoices, in file order.
    #[serde(rename = "Invoice", default)]
    pub invoices: Vec<Invoice>,
}

/// One exported invoice.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Invoice {
    /// WeFact debtor code of the customer.
    pub debtor_number: String,
    /// Customer name, for logging only.
    #[serde(default)]
    pub customer_name: String,
    /// Invoice date, see [`crate::period::INVOICE_DATE_FORMAT`].
    pub date: String,
    /// Billing period in Dutch, e.g. `1 januari 2021 t/m 31 januari 2021`.
    pub period: String,
    /// Usage lines.
    #[serde(default)]
    pub specifications: Specifications,
}

/// Container element for specification lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Specifications {
    /// The lines.
    #[serde(rename = "Specification", default)]
    pub items: Vec<Specification>,
}

/// One usage line of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Specification {
    /// Usage category, e.g. `Bellen`.
    #[serde(default)]
    pub category: String,
    /// Amount excluding tax with a decimal comma, e.g. `12,50`.
    pub amount: String,
}

impl Specification {
    /// The amount with a decimal point, as WeFact expects it.
    #[must_use]
    pub fn price(&self) -> String {
        self.amount.trim().replace(',', ".")
    }

    /// The amount as a number.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not numeric.
    pub fn amount_value(&self) -> Result<f64> {
        self.price().parse().map_err(|_| ImportError::InvalidAmount {
            value: self.amount.clone(),
        })
    }
}

impl Invoices {
    /// Parse an export from XML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the XML does not match the export layout.
    pub fn from_xml(xml: &str) -> Result<Self> {
        Ok(quick_xml::de::from_str(xml)?)
    }

    /// Read and parse an export file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn read(path: &Path) -> Result<Self> {
        let xml = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_xml(&xml)
    }
}
