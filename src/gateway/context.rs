//! Request context: metadata entries, body input stream, optional capabilities.

use crate::gateway::response::Body;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Capability supplied by the hosting environment for efficient file transfer.
/// When absent, applications fall back to chunked reads.
pub trait FileWrapper: Send + Sync {
    fn wrap(&self, file: tokio::fs::File) -> Body;
}

/// Mapping of request metadata (CGI-style keys) plus the body input stream.
/// Entries iterate in key order.
pub struct RequestContext {
    pub entries: BTreeMap<String, String>,
    pub input: InputStream,
    pub file_wrapper: Option<Arc<dyn FileWrapper>>,
}

impl RequestContext {
    pub fn new(entries: BTreeMap<String, String>, body: Bytes) -> Self {
        RequestContext {
            entries,
            input: InputStream::new(body),
            file_wrapper: None,
        }
    }

    pub fn entry(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

/// Finite, non-restartable view over the collected request body.
pub struct InputStream {
    buf: Bytes,
    pos: usize,
}

impl InputStream {
    pub fn new(buf: Bytes) -> Self {
        InputStream { buf, pos: 0 }
    }

    /// Remaining bytes in one read.
    pub fn read_all(&mut self) -> Bytes {
        let rest = self.buf.slice(self.pos..);
        self.pos = self.buf.len();
        rest
    }

    /// Up to `n` bytes; empty once exhausted.
    pub fn read(&mut self, n: usize) -> Bytes {
        let end = (self.pos + n).min(self.buf.len());
        let chunk = self.buf.slice(self.pos..end);
        self.pos = end;
        chunk
    }

    /// One line including its terminating newline (the final line may lack one).
    /// With `limit`, at most that many bytes are returned even mid-line.
    pub fn read_line(&mut self, limit: Option<usize>) -> Bytes {
        if self.pos >= self.buf.len() {
            return Bytes::new();
        }
        let rest = &self.buf[self.pos..];
        let mut end = rest
            .iter()
            .position(|&b| b == b'\n')
            .map(|i| i + 1)
            .unwrap_or(rest.len());
        if let Some(limit) = limit {
            end = end.min(limit);
        }
        let chunk = self.buf.slice(self.pos..self.pos + end);
        self.pos += end;
        chunk
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_is_exhausting() {
        let mut input = InputStream::new(Bytes::from_static(b"abcdef"));
        assert_eq!(&input.read(4)[..], b"abcd");
        assert_eq!(&input.read(4)[..], b"ef");
        assert!(input.read(4).is_empty());
    }

    #[test]
    fn read_line_keeps_newline_and_counts() {
        let mut input = InputStream::new(Bytes::from_static(b"one\ntwo\nthree"));
        assert_eq!(&input.read_line(None)[..], b"one\n");
        assert_eq!(&input.read_line(None)[..], b"two\n");
        assert_eq!(&input.read_line(None)[..], b"three");
        assert!(input.read_line(None).is_empty());
    }

    #[test]
    fn bounded_read_line_splits_long_lines() {
        let mut input = InputStream::new(Bytes::from_static(b"abcdefgh\nij"));
        assert_eq!(&input.read_line(Some(4))[..], b"abcd");
        assert_eq!(&input.read_line(Some(4))[..], b"efgh");
        assert_eq!(&input.read_line(Some(4))[..], b"\n");
        assert_eq!(&input.read_line(Some(4))[..], b"ij");
        assert!(input.read_line(Some(4)).is_empty());
    }
}
