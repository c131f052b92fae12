//! `Cookie` request-header parsing.
//!
//! This module parses the raw value of a `Cookie` header into a
//! [`CookieMap`]: a mapping from cookie name to every value sent for that
//! name, in header order.
//!
//! Parsing follows RFC 6265 §5.4 with deliberate leniencies to handle old
//! user agents (see also §4.1.1 for the cookie-name grammar):
//!
//! - Whitespace around names and values is trimmed rather than rejected
//! - Malformed pairs (empty name, reserved characters in the name) are
//!   silently dropped; the rest of the header still parses
//! - Double-quoted values are unescaped per the obsolete RFC 2109
//!   backslash convention, mirroring legacy cookie encodings
//!
//! # Example
//!
//! ```
//! use peregrine_http::parse_cookie_header;
//!
//! let cookies = parse_cookie_header("a=1; a=2; b=3");
//!
//! assert_eq!(cookies.get("a"), Some("1"));
//! assert_eq!(cookies.get_all("a"), Some(&["1".to_string(), "2".to_string()][..]));
//! assert_eq!(cookies.get("b"), Some("3"));
//! ```

use std::collections::HashMap;

/// Cookie values parsed from a `Cookie` header.
///
/// Each name maps to the ordered list of values sent for it; a name sent
/// more than once accumulates all of its values in header order. Every
/// value list is non-empty by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CookieMap {
    inner: HashMap<String, Vec<String>>,
}

impl CookieMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the first value sent for a cookie name.
    ///
    /// Returns `None` if the name was not sent (or was dropped as
    /// malformed during parsing).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Get all values sent for a cookie name, in header order.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Option<&[String]> {
        self.inner.get(name).map(Vec::as_slice)
    }

    /// Check whether any value was sent for a cookie name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Iterate over all `(name, values)` entries.
    ///
    /// Entry order is unspecified; the values within each entry preserve
    /// header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.inner
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Returns the number of distinct cookie names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if no cookies were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn append(&mut self, name: &str, value: String) {
        if let Some(values) = self.inner.get_mut(name) {
            values.push(value);
        } else {
            self.inner.insert(name.to_string(), vec![value]);
        }
    }
}

/// Parse a `Cookie` header value into a [`CookieMap`].
///
/// The input is the raw, single-line header value as received from the
/// client; no percent-decoding or charset transcoding is performed.
/// Malformed cookie-pairs are dropped individually and never fail the
/// parse.
///
/// # Example
///
/// ```
/// use peregrine_http::parse_cookie_header;
///
/// // Names with reserved characters are dropped, the rest survive.
/// let cookies = parse_cookie_header("bad name=x; ok=y");
/// assert!(!cookies.contains("bad name"));
/// assert_eq!(cookies.get("ok"), Some("y"));
/// ```
#[must_use]
pub fn parse_cookie_header(header_value: &str) -> CookieMap {
    let mut cookies = CookieMap::new();

    for token in header_value.split(';') {
        // Split once on the first '='; a pair without '=' has an empty value.
        let (name, value) = match token.split_once('=') {
            Some((name, value)) => (name, value),
            None => (token, ""),
        };

        // RFC 6265 is stricter about whitespace, but we trim here to better
        // handle old user agents.
        let name = name.trim();
        let value = value.trim();

        // Skip malformed cookie-pair
        if name.is_empty() {
            continue;
        }

        // Skip cookies with invalid names
        if name.chars().any(is_reserved_name_char) {
            continue;
        }

        // Legacy escaped encodings wrap the value in double quotes per the
        // obsolete RFC 2109. Base64 is the de-facto standard today, so the
        // quoted form is rare; everything else is taken verbatim, internal
        // '=' included.
        let value = if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
            unquote(value)
        } else {
            value.to_string()
        };

        cookies.append(name, value);
    }

    cookies
}

/// Cookie-name grammar check (RFC 6265 §4.1.1).
///
/// Reserved: control characters (C0, DEL, and the legacy 0x7F-0xFF byte
/// range, so any non-ASCII character), separators, space, and tab.
fn is_reserved_name_char(c: char) -> bool {
    !c.is_ascii()
        || c.is_ascii_control()
        || matches!(
            c,
            '(' | ')'
                | '<'
                | '>'
                | '@'
                | ','
                | ';'
                | ':'
                | '\\'
                | '"'
                | '/'
                | '['
                | ']'
                | '?'
                | '='
                | '{'
                | '}'
                | ' '
        )
}

/// Strip surrounding quotes and RFC 2109 backslash escapes.
///
/// The caller has already checked that `quoted` starts and ends with `"`.
/// Every `\x` pair inside becomes `x`; a trailing lone backslash is kept
/// verbatim.
fn unquote(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];

    // Fast path: nothing escaped
    if !inner.contains('\\') {
        return inner.to_string();
    }

    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped) => result.push(escaped),
                None => result.push('\\'),
            }
        } else {
            result.push(c);
        }
    }

    result
}
