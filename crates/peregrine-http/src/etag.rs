//! Entity-tag parsing for `If-Match` / `If-None-Match`.
//!
//! This module parses the comma-separated entity-tag lists defined by
//! RFC 7232 into [`EntityTag`] values carrying the `W/` weakness flag.
//! The parser is total: malformed entries are skipped and an unparseable
//! tail stops the scan early with the tags collected so far.
//!
//! The tokenizer is a small hand-written scanner rather than a regex:
//! each token is an optional case-insensitive `W/` prefix, then either a
//! double-quoted run (matched lazily up to the first closing quote) or a
//! bare run up to the next comma, then an optional comma separator.
//!
//! # Example
//!
//! ```
//! use peregrine_http::{EntityTag, parse_etags};
//!
//! let etags = parse_etags(Some("\"a\", W/\"b\"")).unwrap();
//! assert_eq!(etags, vec![EntityTag::new("a"), EntityTag::weak("b")]);
//!
//! // Absent header is distinct from an empty one.
//! assert_eq!(parse_etags(None), None);
//! assert_eq!(parse_etags(Some("")), Some(vec![]));
//! ```

use std::fmt;

/// An entity tag (RFC 7232 §2.3): an opaque validator string plus a
/// weakness indicator.
///
/// Equality derives over both the text and the weak flag; use
/// [`strong_eq`](Self::strong_eq) / [`weak_eq`](Self::weak_eq) for the
/// RFC comparison functions, and `==` against a `&str` to compare the
/// text alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityTag {
    tag: String,
    is_weak: bool,
}

impl EntityTag {
    /// Create a strong entity tag from its unquoted text.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            is_weak: false,
        }
    }

    /// Create a weak entity tag from its unquoted text.
    #[must_use]
    pub fn weak(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            is_weak: true,
        }
    }

    /// The unquoted tag text.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns true if the tag carried a `W/` prefix.
    #[must_use]
    pub fn is_weak(&self) -> bool {
        self.is_weak
    }

    /// Returns true for the `*` wildcard marker.
    ///
    /// Callers must check this before treating a parsed tag as a normal
    /// validator; whether the wildcard matches is HTTP semantics decided
    /// by the caller.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.tag == "*"
    }

    /// Strong comparison: equal text and neither tag weak.
    #[must_use]
    pub fn strong_eq(&self, other: &Self) -> bool {
        !self.is_weak && !other.is_weak && self.tag == other.tag
    }

    /// Weak comparison: equal text, weakness ignored.
    #[must_use]
    pub fn weak_eq(&self, other: &Self) -> bool {
        self.tag == other.tag
    }
}

impl PartialEq<str> for EntityTag {
    fn eq(&self, other: &str) -> bool {
        self.tag == other
    }
}

impl PartialEq<&str> for EntityTag {
    fn eq(&self, other: &&str) -> bool {
        self.tag == *other
    }
}

impl fmt::Display for EntityTag {
    /// Renders `"tag"`, `W/"tag"`, or the bare `*` wildcard.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wildcard() {
            return f.write_str("*");
        }
        if self.is_weak {
            write!(f, "W/\"{}\"", self.tag)
        } else {
            write!(f, "\"{}\"", self.tag)
        }
    }
}

/// Parse an `If-Match` / `If-None-Match` header value into entity tags.
///
/// - `None` (header absent) returns `None`
/// - A blank value returns an empty list
/// - `*` returns a single strong tag whose text is `*`; see
///   [`EntityTag::is_wildcard`]
/// - Otherwise returns the parsed tags in header order, duplicates
///   preserved; semantic comparison and de-duplication are the caller's
///   concern
///
/// # Example
///
/// ```
/// use peregrine_http::parse_etags;
///
/// let etags = parse_etags(Some("W/\"abc\"")).unwrap();
/// assert_eq!(etags.len(), 1);
/// assert_eq!(etags[0].tag(), "abc");
/// assert!(etags[0].is_weak());
/// ```
#[must_use]
pub fn parse_etags(header_value: Option<&str>) -> Option<Vec<EntityTag>> {
    let etag_str = header_value?.trim();

    if etag_str.is_empty() {
        return Some(Vec::new());
    }

    if etag_str == "*" {
        return Some(vec![EntityTag::new("*")]);
    }

    // Fast path: a single tag needs no list scan.
    if !etag_str.contains(',') {
        return Some(vec![parse_single(etag_str)]);
    }

    Some(parse_list(etag_str))
}

/// Parse one tag: optional `W/` prefix, one optional wrapping quote pair.
fn parse_single(value: &str) -> EntityTag {
    let (is_weak, rest) = strip_weak_prefix(value);

    let tag = if rest.len() >= 2 && rest.starts_with('"') && rest.ends_with('"') {
        &rest[1..rest.len() - 1]
    } else {
        rest
    };

    if is_weak {
        EntityTag::weak(tag)
    } else {
        EntityTag::new(tag)
    }
}

fn strip_weak_prefix(value: &str) -> (bool, &str) {
    if value.starts_with("W/") || value.starts_with("w/") {
        (true, &value[2..])
    } else {
        (false, value)
    }
}

/// Scan a comma-separated tag list.
///
/// Empty captures (stray commas) are skipped; if a quoted tag is followed
/// by anything other than a comma separator or end-of-string, the scan
/// stops and the tags collected so far are returned. Every iteration
/// either consumes input or terminates, so the scan is O(len).
fn parse_list(value: &str) -> Vec<EntityTag> {
    let bytes = value.as_bytes();
    let len = bytes.len();
    let mut etags = Vec::new();
    let mut pos = 0;

    while pos < len {
        let start = pos;

        let mut is_weak = false;
        if pos + 1 < len && (bytes[pos] == b'W' || bytes[pos] == b'w') && bytes[pos + 1] == b'/' {
            is_weak = true;
            pos += 2;
        }

        let tag = if pos < len && bytes[pos] == b'"' {
            match bytes[pos + 1..].iter().position(|&b| b == b'"') {
                Some(rel) => {
                    let tag = &value[pos + 1..pos + 1 + rel];
                    pos += rel + 2;
                    tag
                }
                // No closing quote: the quoted alternative cannot match,
                // so the run falls through to the bare form, opening
                // quote included.
                None => take_unquoted(value, &mut pos),
            }
        } else {
            take_unquoted(value, &mut pos)
        };

        match eat_separator(bytes, pos) {
            Some(next) => pos = next,
            // Unmatchable position (junk after a quoted tag): stop the
            // scan, keep what parsed so far.
            None => break,
        }

        if !tag.is_empty() {
            if is_weak {
                etags.push(EntityTag::weak(tag));
            } else {
                etags.push(EntityTag::new(tag));
            }
        }

        // Forward-progress guard; an empty capture at end-of-string
        // cannot loop because `pos` has reached `len`.
        if pos == start {
            break;
        }
    }

    etags
}

/// Capture a bare run up to the next comma (or end of string), with
/// whitespace preceding the comma left for the separator to consume.
fn take_unquoted<'a>(value: &'a str, pos: &mut usize) -> &'a str {
    let bytes = value.as_bytes();
    let end = bytes[*pos..]
        .iter()
        .position(|&b| b == b',')
        .map_or(bytes.len(), |rel| *pos + rel);

    let mut capture_end = end;
    while capture_end > *pos && bytes[capture_end - 1].is_ascii_whitespace() {
        capture_end -= 1;
    }

    let tag = &value[*pos..capture_end];
    *pos = capture_end;
    tag
}

/// Consume `\s* , \s*`, or match end-of-string; `None` if neither fits.
fn eat_separator(bytes: &[u8], mut pos: usize) -> Option<usize> {
    let len = bytes.len();
    if pos >= len {
        return Some(pos);
    }

    while pos < len && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    if pos < len && bytes[pos] == b',' {
        pos += 1;
        while pos < len && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        return Some(pos);
    }

    None
}
