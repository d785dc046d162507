//! Per-debtor import watermark.
//!
//! The date up to which a debtor's invoices have been imported lives in a
//! custom field on the debtor in WeFact. A debtor without the field (or with
//! an unreadable value) falls back to [`default_watermark`].

use chrono::NaiveDate;
use serde_json::{Map, Value};
use wefact_client::Params;

/// Storage format of the watermark field.
pub const WATERMARK_FORMAT: &str = "%Y-%m-%d";

/// Watermark for debtors that were never imported.
#[must_use]
pub fn default_watermark() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 9, 1).unwrap_or_default()
}

/// Read the watermark from a `debtor/show` debtor object.
#[must_use]
pub fn read_watermark(debtor: &Map<String, Value>, field: &str) -> NaiveDate {
    debtor
        .get("CustomFields")
        .and_then(Value::as_object)
        .and_then(|fields| fields.get(field))
        .and_then(Value::as_str)
        .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), WATERMARK_FORMAT).ok())
        .unwrap_or_else(default_watermark)
}

/// `debtor/edit` parameters that move the watermark to `date`.
#[must_use]
pub fn watermark_params(field: &str, date: NaiveDate) -> Params {
    Params::new().with(
        Params::nested_key("CustomFields", &[&field]),
        date.format(WATERMARK_FORMAT).to_string(),
    )
}
