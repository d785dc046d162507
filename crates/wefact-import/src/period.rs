//! Date handling for billing portal exports.
//!
//! Invoice dates look like `2-1-2021 15:04:05` (day first, no padding).
//! Billing periods are Dutch ranges such as `1 januari 2021 t/m 31 januari 2021`.

use chrono::{NaiveDate, NaiveDateTime};

/// Format of the `Date` element of an exported invoice.
pub const INVOICE_DATE_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Separator between the start and end of a period ("tot en met").
const PERIOD_SEPARATOR: &str = "t/m";

const MONTHS: [&str; 12] = [
    "januari",
    "februari",
    "maart",
    "april",
    "mei",
    "juni",
    "juli",
    "augustus",
    "september",
    "oktober",
    "november",
    "december",
];

/// Errors parsing a billing period.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    /// The period has no `t/m` separator.
    #[error("period {0:?} is not of the form \"<start> t/m <end>\"")]
    MissingSeparator(String),

    /// A date is not `<day> <month> <year>`.
    #[error("date {0:?} is not of the form \"<day> <month> <year>\"")]
    Malformed(String),

    /// The month name is not Dutch.
    #[error("unknown month {0:?}")]
    UnknownMonth(String),

    /// Day, month and year do not form a calendar date.
    #[error("date {0:?} does not exist")]
    InvalidDate(String),
}

/// An inclusive billing period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoicePeriod {
    /// First day of the period.
    pub start: NaiveDate,
    /// Last day of the period.
    pub end: NaiveDate,
}

impl InvoicePeriod {
    /// Parse a Dutch period such as `1 januari 2021 t/m 31 januari 2021`.
    ///
    /// # Errors
    ///
    /// Returns an error if either side is not a valid Dutch date.
    pub fn parse(period: &str) -> Result<Self, PeriodError> {
        let (start, end) = period
            .split_once(PERIOD_SEPARATOR)
            .ok_or_else(|| PeriodError::MissingSeparator(period.to_string()))?;

        Ok(Self {
            start: parse_dutch_date(start)?,
            end: parse_dutch_date(end)?,
        })
    }
}

/// Parse `<day> <month> <year>` with a Dutch month name.
///
/// # Errors
///
/// Returns an error if the text is not a valid Dutch date.
pub fn parse_dutch_date(text: &str) -> Result<NaiveDate, PeriodError> {
    let text = text.trim();
    let parts: Vec<&str> = text.split_whitespace().collect();
    let [day, month, year] = parts[..] else {
        return Err(PeriodError::Malformed(text.to_string()));
    };

    let day: u32 = day
        .parse()
        .map_err(|_| PeriodError::Malformed(text.to_string()))?;
    let year: i32 = year
        .parse()
        .map_err(|_| PeriodError::Malformed(text.to_string()))?;
    let month = dutch_month(month).ok_or_else(|| PeriodError::UnknownMonth(month.to_string()))?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| PeriodError::InvalidDate(text.to_string()))
}

/// Month number (1-12) for a Dutch month name, ignoring case.
#[must_use]
pub fn dutch_month(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == name)
        .and_then(|i| u32::try_from(i + 1).ok())
}

/// Parse the `Date` element of an exported invoice.
///
/// # Errors
///
/// Returns an error if the text does not match [`INVOICE_DATE_FORMAT`].
pub fn parse_invoice_date(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(text.trim(), INVOICE_DATE_FORMAT)
}
