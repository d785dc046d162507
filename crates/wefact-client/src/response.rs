//! The response envelope returned by every WeFact endpoint.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status reported in a response envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The call succeeded.
    Success,
    /// The API rejected the call; details are in the result payload.
    Error,
    /// The status field was missing or not recognised.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Decoded response envelope.
///
/// The fixed attributes are matched by their wire names; every other
/// top-level field lands in [`Response::result`] unchanged. Whether the call
/// succeeded at the business level is up to the caller to decide from
/// [`Response::status`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Controller that handled the call.
    #[serde(default, deserialize_with = "null_as_default")]
    pub controller: String,
    /// Action that handled the call.
    #[serde(default, deserialize_with = "null_as_default")]
    pub action: String,
    /// Outcome of the call.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: Status,
    /// Server date stamp, passed through as sent.
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    /// Total results across all pages.
    #[serde(rename = "totalresults", default, deserialize_with = "count")]
    pub total_results: u64,
    /// Results on this page.
    #[serde(rename = "currentresults", default, deserialize_with = "count")]
    pub current_results: u64,
    /// Offset of this page.
    #[serde(default, deserialize_with = "count")]
    pub offset: u64,
    /// Every field not captured above, e.g. `debtor`, `invoices` or `errors`.
    #[serde(flatten)]
    pub result: Map<String, Value>,
}

impl Response {
    /// Decode an envelope from a raw response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not a JSON object.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        decode(body)
    }

    /// Whether the API reported success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Whether the API reported an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }

    /// A field from the result payload.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.result.get(key)
    }

    /// A field from the result payload, if it is a JSON object.
    #[must_use]
    pub fn object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.result.get(key).and_then(Value::as_object)
    }

    /// Messages from the `errors` field the API attaches to failed calls.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        match self.result.get("errors") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
            Some(Value::String(s)) => vec![s.clone()],
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![other.to_string()],
        }
    }

    /// Decode a field of the result payload into a typed value.
    ///
    /// Returns `None` when the field is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the field does not match `T`.
    pub fn result_as<T: DeserializeOwned>(&self, key: &str) -> Option<Result<T, serde_json::Error>> {
        self.result.get(key).map(T::deserialize)
    }
}

/// Decode a raw response body directly into any deserializable type.
///
/// # Errors
///
/// Returns an error if the body is not valid JSON or does not match `T`.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice(body)
}

/// An explicit `null` decodes the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Pagination counters arrive as whole numbers (possibly written as floats),
/// numeric strings or null.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]
fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                    .map(|f| f as u64)
            })
            .ok_or_else(|| de::Error::custom(format!("invalid counter: {n}"))),
        Value::String(s) if s.trim().is_empty() => Ok(0),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid counter: {s:?}"))),
        other => Err(de::Error::custom(format!("invalid counter: {other}"))),
    }
}
