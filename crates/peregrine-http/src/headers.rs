//! Case-insensitive raw header lookup.
//!
//! [`HeaderMap`] is the minimal map request code uses to fetch the raw
//! header values it feeds to the parsers in this crate, e.g. the
//! `Cookie` value for [`parse_cookie_header`](crate::parse_cookie_header)
//! or the `If-Match` value for [`parse_etags`](crate::parse_etags).
//!
//! Lookup treats a present-but-empty header the same as a missing one:
//! both return `None`, so callers get a single "no value" case to handle.

use std::collections::HashMap;

/// A case-insensitive map of raw header values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    inner: HashMap<String, String>,
}

impl HeaderMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a header value by name (case-insensitive).
    ///
    /// Returns `None` when the header is missing or its value is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use peregrine_http::HeaderMap;
    ///
    /// let mut headers = HeaderMap::new();
    /// headers.insert("If-Match", "\"abc\"");
    /// headers.insert("X-Empty", "");
    ///
    /// assert_eq!(headers.get("if-match"), Some("\"abc\""));
    /// assert_eq!(headers.get("X-Empty"), None);
    /// assert_eq!(headers.get("Missing"), None);
    /// ```
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Insert a header, replacing any previous value for the name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner
            .insert(name.into().to_ascii_lowercase(), value.into());
    }

    /// Iterate over all headers as `(name, value)` pairs.
    ///
    /// Names are lowercased; order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
