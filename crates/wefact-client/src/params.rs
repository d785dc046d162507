//! Form parameters sent with every request.

use std::fmt;

/// An ordered multi-map of form fields.
///
/// Keys may repeat; every value is encoded in insertion order. Nested
/// structures use bracket keys such as `InvoiceLines[0][Date]`, see
/// [`Params::nested_key`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    /// Create an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, keeping any existing values for the same key.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Builder form of [`Params::add`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(key, value);
        self
    }

    /// Replace every value for `key` with a single value appended at the end.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        self.remove(&key);
        self.pairs.push((key, value.into()));
        self
    }

    /// Remove every value for `key`, returning how many were removed.
    pub fn remove(&mut self, key: &str) -> usize {
        let before = self.pairs.len();
        self.pairs.retain(|(k, _)| k != key);
        before - self.pairs.len()
    }

    /// The first value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `key`, in insertion order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether any value exists for `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Number of key/value pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over key/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode as an `application/x-www-form-urlencoded` body.
    #[must_use]
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    /// Build a bracketed key, e.g. `nested_key("CustomFields", &["voipit"])`
    /// yields `CustomFields[voipit]`.
    #[must_use]
    pub fn nested_key(root: &str, path: &[&dyn fmt::Display]) -> String {
        let mut key = root.to_string();
        for segment in path {
            key.push_str(&format!("[{segment}]"));
        }
        key
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Params {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.pairs
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_keys_keep_order() {
        let params = Params::new().with("tag", "a").with("tag", "b");

        assert_eq!(params.get_all("tag").collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(params.get("tag"), Some("a"));
        assert_eq!(params.encode(), "tag=a&tag=b");
    }

    #[test]
    fn get_outlives_the_lookup_key() {
        let params = Params::new().with("DebtorCode", "DB1");

        let value = {
            let key = String::from("DebtorCode");
            params.get(&key)
        };

        assert_eq!(value, Some("DB1"));
        assert_eq!(params.get("InvoiceCode"), None);
    }

    #[test]
    fn set_replaces_all_values() {
        let mut params = Params::new().with("action", "x").with("k", "v").with("action", "y");
        params.set("action", "list");

        assert_eq!(params.get_all("action").collect::<Vec<_>>(), vec!["list"]);
        assert_eq!(params.encode(), "k=v&action=list");
    }

    #[test]
    fn encode_escapes_reserved_characters() {
        let params = Params::new()
            .with("Description", "Verbruikskosten: 1 januari t/m 31 januari")
            .with("CustomFields[voipit]", "2021-01-31");

        assert_eq!(
            params.encode(),
            "Description=Verbruikskosten%3A+1+januari+t%2Fm+31+januari\
             &CustomFields%5Bvoipit%5D=2021-01-31"
        );
    }

    #[test]
    fn nested_key_builds_brackets() {
        assert_eq!(
            Params::nested_key("InvoiceLines", &[&0, &"Date"]),
            "InvoiceLines[0][Date]"
        );
        assert_eq!(Params::nested_key("Plain", &[]), "Plain");
    }

    #[test]
    fn collect_and_remove() {
        let mut params: Params = [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();

        assert_eq!(params.len(), 3);
        assert_eq!(params.remove("a"), 2);
        assert!(!params.contains_key("a"));
        assert_eq!(params.iter().collect::<Vec<_>>(), vec![("b", "2")]);
    }
}
