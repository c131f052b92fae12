//! Request-header parsing and bounded body streams.
//!
//! This crate provides the low-level primitives the peregrine request layer
//! builds on. It parses untrusted header text byte by byte and guards body
//! reads against over-reading, so the rest of the framework never has to:
//!
//! - `Cookie` header parsing into a multi-value map (RFC 6265, lenient)
//! - `If-Match` / `If-None-Match` entity-tag list parsing (RFC 7232)
//! - A read-only stream wrapper that clamps every read to a declared
//!   Content-Length, so servers that block on oversized reads cannot hang
//!   a request handler
//! - A small case-insensitive header map for raw header lookup
//!
//! The two parsers are pure and total: any input string produces a result,
//! malformed entries are dropped individually rather than failing the whole
//! header. See each module for the exact grammar and leniencies.
//!
//! # Example
//!
//! ```
//! use peregrine_http::{parse_cookie_header, parse_etags};
//!
//! let cookies = parse_cookie_header("session=abc123; theme=dark");
//! assert_eq!(cookies.get("session"), Some("abc123"));
//!
//! let etags = parse_etags(Some("\"xyzzy\", W/\"r2d2\"")).unwrap();
//! assert_eq!(etags[0].tag(), "xyzzy");
//! assert!(etags[1].is_weak());
//! ```

#![deny(unsafe_code)]

pub mod cookie;
pub mod etag;
pub mod headers;
pub mod stream;

pub use cookie::{CookieMap, parse_cookie_header};
pub use etag::{EntityTag, parse_etags};
pub use headers::HeaderMap;
pub use stream::{Body, BoundedStream, DEFAULT_EXHAUST_CHUNK_SIZE};
