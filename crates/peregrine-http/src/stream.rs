//! Bounded, read-only request body streams.
//!
//! Server-provided input streams are sometimes backed by raw sockets or
//! buffered readers that block indefinitely when asked for more bytes
//! than the request actually carries. [`BoundedStream`] normalizes that
//! behavior: every read is clamped to the declared Content-Length, so the
//! underlying source is never asked to read past the byte budget and a
//! handler can never hang on an unbounded read.
//!
//! The wrapper is read-only, non-seekable, and owned by a single request;
//! it performs no locking and no retries. Errors from the underlying
//! source pass through unchanged.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use peregrine_http::BoundedStream;
//!
//! let mut body = BoundedStream::new(Cursor::new(b"hello world".to_vec()), 5);
//!
//! // Oversized and unspecified reads are clamped to the declared length.
//! let bytes = body.read(None).unwrap();
//! assert_eq!(bytes, b"hello");
//! assert!(body.is_exhausted());
//! ```

use std::io::{self, BufRead, Read};

/// Default chunk size for [`BoundedStream::exhaust`] (64 KB).
pub const DEFAULT_EXHAUST_CHUNK_SIZE: usize = 64 * 1024;

/// A read-only wrapper enforcing a declared content length over an
/// underlying byte source.
///
/// The remaining-byte counter is decremented by the clamped request size
/// *before* each delegated read. A source that returns fewer bytes than
/// requested (a short read not at true end-of-stream) therefore leaves
/// the counter under-counting the bytes still buffered at the source;
/// see [`remaining`](Self::remaining).
#[derive(Debug)]
pub struct BoundedStream<R> {
    stream: R,
    stream_len: usize,
    bytes_remaining: usize,
}

/// Backwards-compatible alias for [`BoundedStream`].
pub type Body<R> = BoundedStream<R>;

impl<R> BoundedStream<R> {
    /// Wrap `stream`, limiting reads to `stream_len` total bytes.
    ///
    /// `stream_len` is the request's declared content length; pass 0 when
    /// the length is unknown.
    pub fn new(stream: R, stream_len: usize) -> Self {
        Self {
            stream,
            stream_len,
            bytes_remaining: stream_len,
        }
    }

    /// The declared content length this stream was constructed with.
    #[must_use]
    pub fn length(&self) -> usize {
        self.stream_len
    }

    /// Bytes still available under the declared budget.
    ///
    /// Reservation is optimistic: a short read from the source consumes
    /// budget for the full clamped request, so this can under-count what
    /// the source could still deliver.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bytes_remaining
    }

    /// True once the byte budget has been consumed.
    ///
    /// Subsequent reads return empty results without requesting more
    /// than zero bytes from the source.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.bytes_remaining == 0
    }

    /// Always returns `true`.
    #[must_use]
    pub fn readable(&self) -> bool {
        true
    }

    /// Always returns `false`; request bodies are not seekable.
    #[must_use]
    pub fn seekable(&self) -> bool {
        false
    }

    /// Always returns `false`.
    #[must_use]
    pub fn writable(&self) -> bool {
        false
    }

    /// Always fails: the wrapper is read-only.
    ///
    /// # Errors
    ///
    /// Returns `io::ErrorKind::Unsupported` regardless of stream state.
    pub fn write(&mut self, _data: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "stream is not writable",
        ))
    }

    /// Get a reference to the underlying source.
    pub fn get_ref(&self) -> &R {
        &self.stream
    }

    /// Get a mutable reference to the underlying source.
    ///
    /// Reads performed directly on the source bypass the byte budget.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.stream
    }

    /// Unwrap the stream, returning the underlying source.
    pub fn into_inner(self) -> R {
        self.stream
    }

    /// Clamp a requested size to the remaining budget and reserve it.
    ///
    /// `None` covers callers that want "everything left". The
    /// reservation happens before the delegated read is issued.
    fn reserve(&mut self, size: Option<usize>) -> usize {
        let size = match size {
            Some(size) if size <= self.bytes_remaining => size,
            _ => self.bytes_remaining,
        };
        self.bytes_remaining -= size;
        size
    }
}

impl<R: Read> BoundedStream<R> {
    /// Read up to `size` bytes from the stream.
    ///
    /// `None` or an oversized `size` is clamped to the remaining budget.
    /// The result may be shorter than the clamped request when the source
    /// hits true end-of-stream.
    ///
    /// # Errors
    ///
    /// Any error raised by the underlying source is propagated unchanged.
    pub fn read(&mut self, size: Option<usize>) -> io::Result<Vec<u8>> {
        let size = self.reserve(size);
        let mut data = Vec::with_capacity(size.min(DEFAULT_EXHAUST_CHUNK_SIZE));
        (&mut self.stream).take(size as u64).read_to_end(&mut data)?;
        Ok(data)
    }

    /// Drain the remaining declared body and discard it.
    ///
    /// Used so keep-alive connections are not desynchronized by an
    /// unread request body.
    ///
    /// # Errors
    ///
    /// Any error raised by the underlying source is propagated unchanged.
    pub fn exhaust(&mut self) -> io::Result<()> {
        self.exhaust_with(DEFAULT_EXHAUST_CHUNK_SIZE)
    }

    /// [`exhaust`](Self::exhaust) with an explicit chunk size.
    ///
    /// # Errors
    ///
    /// Any error raised by the underlying source is propagated unchanged.
    pub fn exhaust_with(&mut self, chunk_size: usize) -> io::Result<()> {
        loop {
            let chunk = self.read(Some(chunk_size))?;
            if chunk.is_empty() {
                return Ok(());
            }
        }
    }
}

impl<R: BufRead> BoundedStream<R> {
    /// Read one line (up to and including `\n`), clamped to `limit` and
    /// to the remaining budget.
    ///
    /// # Errors
    ///
    /// Any error raised by the underlying source is propagated unchanged.
    pub fn read_line(&mut self, limit: Option<usize>) -> io::Result<Vec<u8>> {
        let size = self.reserve(limit);
        let mut line = Vec::new();
        (&mut self.stream)
            .take(size as u64)
            .read_until(b'\n', &mut line)?;
        Ok(line)
    }

    /// Read lines until `hint` bytes (clamped to the remaining budget)
    /// have been consumed.
    ///
    /// Line terminators are kept, matching the source stream's framing.
    ///
    /// # Errors
    ///
    /// Any error raised by the underlying source is propagated unchanged.
    pub fn read_lines(&mut self, hint: Option<usize>) -> io::Result<Vec<Vec<u8>>> {
        let size = self.reserve(hint);
        let mut limited = (&mut self.stream).take(size as u64);
        let mut lines = Vec::new();
        loop {
            let mut line = Vec::new();
            if limited.read_until(b'\n', &mut line)? == 0 {
                return Ok(lines);
            }
            lines.push(line);
        }
    }
}

/// Line iteration, delegating directly to the underlying source.
///
/// This path does not consume the byte budget: it mirrors the behavior
/// lower-level adapters already depend on, where iteration reads the
/// source as-is. Callers that need bounded reads must use
/// [`BoundedStream::read`] or [`BoundedStream::read_line`] instead.
impl<R: BufRead> Iterator for BoundedStream<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = Vec::new();
        match self.stream.read_until(b'\n', &mut line) {
            Ok(0) => None,
            Ok(_) => Some(Ok(line)),
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn stream(data: &[u8], len: usize) -> BoundedStream<Cursor<Vec<u8>>> {
        BoundedStream::new(Cursor::new(data.to_vec()), len)
    }

    /// Returns at most `cap` bytes per read call; never signals EOF early.
    struct DribbleReader {
        data: Cursor<Vec<u8>>,
        cap: usize,
    }

    impl Read for DribbleReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let max = buf.len().min(self.cap);
            self.data.read(&mut buf[..max])
        }
    }

    // ========================================================================
    // Clamping and accounting
    // ========================================================================

    #[test]
    fn read_unspecified_size_reads_declared_length() {
        let mut body = stream(b"hello world", 5);
        assert_eq!(body.read(None).unwrap(), b"hello");
        assert_eq!(body.remaining(), 0);
    }

    #[test]
    fn read_oversized_request_clamped() {
        let mut body = stream(b"hello world", 5);
        assert_eq!(body.read(Some(1000)).unwrap(), b"hello");
        assert!(body.is_exhausted());
    }

    #[test]
    fn read_in_chunks() {
        let mut body = stream(b"hello world", 11);
        assert_eq!(body.read(Some(5)).unwrap(), b"hello");
        assert_eq!(body.remaining(), 6);
        assert_eq!(body.read(Some(5)).unwrap(), b" worl");
        assert_eq!(body.remaining(), 1);
        assert_eq!(body.read(Some(5)).unwrap(), b"d");
        assert!(body.is_exhausted());
    }

    #[test]
    fn read_zero_bytes() {
        let mut body = stream(b"hello", 5);
        assert_eq!(body.read(Some(0)).unwrap(), b"");
        assert_eq!(body.remaining(), 5);
    }

    #[test]
    fn reads_after_exhaustion_return_empty() {
        let mut body = stream(b"hello world", 5);
        body.read(None).unwrap();
        assert!(body.is_exhausted());
        assert_eq!(body.read(None).unwrap(), b"");
        assert_eq!(body.read(Some(100)).unwrap(), b"");
        assert!(body.is_exhausted());
    }

    #[test]
    fn zero_length_stream_starts_exhausted() {
        let mut body = stream(b"data the handler must never see", 0);
        assert!(body.is_exhausted());
        assert_eq!(body.read(None).unwrap(), b"");
    }

    #[test]
    fn declared_length_beyond_source_gives_short_read() {
        let mut body = stream(b"abc", 10);
        // The source runs dry before the budget does.
        assert_eq!(body.read(None).unwrap(), b"abc");
        // The full clamped request was still reserved.
        assert_eq!(body.remaining(), 0);
    }

    #[test]
    fn short_read_reserves_full_request() {
        // Optimistic reservation: a short read consumes budget for the
        // whole clamped request, even though the source has more bytes.
        let source = DribbleReader {
            data: Cursor::new(b"abcdefgh".to_vec()),
            cap: 2,
        };
        let mut body = BoundedStream::new(source, 8);
        let chunk = body.read(Some(4)).unwrap();
        // Read::take retries until its limit, so the dribble still fills up.
        assert_eq!(chunk, b"abcd");
        assert_eq!(body.remaining(), 4);
    }

    #[test]
    fn length_accessor() {
        let body = stream(b"hello", 5);
        assert_eq!(body.length(), 5);
        assert_eq!(body.remaining(), 5);
    }

    // ========================================================================
    // Line reads
    // ========================================================================

    #[test]
    fn read_line_basic() {
        let mut body = stream(b"first\nsecond\n", 13);
        assert_eq!(body.read_line(Some(6)).unwrap(), b"first\n");
        assert_eq!(body.remaining(), 7);
        assert_eq!(body.read_line(Some(7)).unwrap(), b"second\n");
        assert!(body.is_exhausted());
    }

    #[test]
    fn read_line_clamped_to_limit() {
        let mut body = stream(b"a very long line\n", 17);
        assert_eq!(body.read_line(Some(4)).unwrap(), b"a ve");
        assert_eq!(body.remaining(), 13);
    }

    #[test]
    fn read_line_unspecified_limit_clamped_to_remaining() {
        let mut body = stream(b"no newline here", 10);
        assert_eq!(body.read_line(None).unwrap(), b"no newline");
        assert!(body.is_exhausted());
    }

    #[test]
    fn read_lines_collects_all() {
        let data = b"one\ntwo\nthree";
        let mut body = stream(data, data.len());
        let lines = body.read_lines(None).unwrap();
        assert_eq!(lines, vec![b"one\n".to_vec(), b"two\n".to_vec(), b"three".to_vec()]);
        assert!(body.is_exhausted());
    }

    #[test]
    fn read_lines_respects_hint() {
        let data = b"one\ntwo\nthree";
        let mut body = stream(data, data.len());
        let lines = body.read_lines(Some(4)).unwrap();
        assert_eq!(lines, vec![b"one\n".to_vec()]);
        assert_eq!(body.remaining(), 9);
    }

    // ========================================================================
    // Exhaust, write, predicates
    // ========================================================================

    #[test]
    fn exhaust_drains_declared_length() {
        let data = vec![b'x'; 100_000];
        let mut body = BoundedStream::new(Cursor::new(data), 100_000);
        body.exhaust().unwrap();
        assert!(body.is_exhausted());
        assert_eq!(body.remaining(), 0);
        // Everything drained from the source too.
        assert_eq!(body.get_ref().position(), 100_000);
    }

    #[test]
    fn exhaust_with_small_chunks() {
        let mut body = stream(b"0123456789", 10);
        body.exhaust_with(3).unwrap();
        assert!(body.is_exhausted());
    }

    #[test]
    fn exhaust_leaves_trailing_bytes_unread() {
        // Only the declared budget is drained, not the whole source.
        let mut body = stream(b"0123456789", 4);
        body.exhaust().unwrap();
        assert!(body.is_exhausted());
        assert_eq!(body.get_ref().position(), 4);
    }

    #[test]
    fn write_always_fails() {
        let mut body = stream(b"hello", 5);
        let err = body.write(b"nope").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);

        body.read(None).unwrap();
        let err = body.write(b"still nope").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }

    #[test]
    fn capability_predicates() {
        let body = stream(b"", 0);
        assert!(body.readable());
        assert!(!body.seekable());
        assert!(!body.writable());
    }

    // ========================================================================
    // Iteration pass-through
    // ========================================================================

    #[test]
    fn iteration_yields_source_lines() {
        let body = stream(b"a\nb\nc", 5);
        let lines: Vec<_> = body.map(Result::unwrap).collect();
        assert_eq!(lines, vec![b"a\n".to_vec(), b"b\n".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn iteration_does_not_consume_budget() {
        // Known compatibility asymmetry: iteration reads the source
        // directly and leaves the byte accounting untouched.
        let mut body = stream(b"a\nb\n", 4);
        let first = body.next().unwrap().unwrap();
        assert_eq!(first, b"a\n");
        assert_eq!(body.remaining(), 4);
    }

    // ========================================================================
    // Error pass-through
    // ========================================================================

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "boom"))
        }
    }

    #[test]
    fn source_errors_propagate_unchanged() {
        let mut body = BoundedStream::new(FailingReader, 10);
        let err = body.read(Some(4)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
        // The reservation was made before the failed read.
        assert_eq!(body.remaining(), 6);
    }
}
