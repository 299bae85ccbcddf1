//! Request parameter sets.
//!
//! Parameters are kept ordered by key (byte-wise), so iteration order is the
//! canonical order used both for signing and for the final query string.

use std::collections::BTreeMap;
use std::fmt::Display;

/// Name of the parameter that carries the request signature.
pub const SIGNATURE_KEY: &str = "signature";

/// A set of request parameters, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: BTreeMap<String, String>,
}

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a parameter. Returns the previous value, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Display) -> Option<String> {
        self.entries.insert(key.into(), value.to_string())
    }

    /// Remove a parameter.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Look up a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether a parameter is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in canonical (sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Display,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_is_sorted() {
        let params = Params::new()
            .with("timestamp", 1)
            .with("apikey", "AK")
            .with("once", 2)
            .with("installid", "IID");

        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["apikey", "installid", "once", "timestamp"]);
    }

    #[test]
    fn test_ordering_is_bytewise() {
        // Upper case sorts before lower case in byte order.
        let params = Params::new().with("b", 1).with("B", 2).with("a", 3);
        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["B", "a", "b"]);
    }

    #[test]
    fn test_scalar_values() {
        let params = Params::new()
            .with("left", -17)
            .with("relative", true)
            .with("period", 500u32);

        assert_eq!(params.get("left"), Some("-17"));
        assert_eq!(params.get("relative"), Some("true"));
        assert_eq!(params.get("period"), Some("500"));
    }

    #[test]
    fn test_insert_replaces() {
        let mut params = Params::new().with("color", "FF0000");
        let previous = params.insert("color", "00FF00");
        assert_eq!(previous.as_deref(), Some("FF0000"));
        assert_eq!(params.len(), 1);
    }
}
