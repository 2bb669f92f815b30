//! Reusable log line builder

use super::args::{encode_args, Arg};
use super::clock::{TimestampCache, TIMESTAMP_WIDTH};
use std::fmt;
use std::io::Write;

/// One fully formatted log line, built incrementally.
///
/// Configuration calls chain through `&mut Self`. [`Record::prepare`]
/// finalizes the line: it prepends the prefix, then the cached timestamp
/// (when dates are shown), and appends a newline (when enabled). A prepared
/// record can be logged many times; the `*_prepared` logging calls re-stamp
/// its timestamp in place before each write.
///
/// # Example
///
/// ```
/// use rust_fast_logger::Record;
///
/// let mut record = Record::new();
/// record
///     .set_prefix("[api] ")
///     .disable_date()
///     .append_args(&["status=".into(), 200u16.into()])
///     .prepare();
/// assert_eq!(record.as_bytes(), b"[api] status=200\n");
/// ```
#[derive(Debug, Clone)]
pub struct Record {
    prefix: Vec<u8>,
    buf: Vec<u8>,
    show_date: bool,
    newline: bool,
    prepared: bool,
    stamp_len: usize,
}

impl Record {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            prefix: Vec::new(),
            buf: Vec::with_capacity(capacity),
            show_date: true,
            newline: true,
            prepared: false,
            stamp_len: 0,
        }
    }

    /// Set the bytes placed before the payload on every build
    pub fn set_prefix(&mut self, prefix: impl AsRef<[u8]>) -> &mut Self {
        self.prefix.clear();
        self.prefix.extend_from_slice(prefix.as_ref());
        self
    }

    pub fn clear_prefix(&mut self) -> &mut Self {
        self.prefix.clear();
        self
    }

    pub fn enable_date(&mut self) -> &mut Self {
        self.show_date = true;
        self
    }

    pub fn disable_date(&mut self) -> &mut Self {
        self.show_date = false;
        self
    }

    pub fn set_newline(&mut self, newline: bool) -> &mut Self {
        self.newline = newline;
        self
    }

    pub fn append_args(&mut self, args: &[Arg<'_>]) -> &mut Self {
        encode_args(&mut self.buf, args);
        self
    }

    pub fn append_bytes(&mut self, bytes: impl AsRef<[u8]>) -> &mut Self {
        self.buf.extend_from_slice(bytes.as_ref());
        self
    }

    /// Append `format_args!` output without an intermediate `String`
    pub fn append_formatted(&mut self, args: fmt::Arguments<'_>) -> &mut Self {
        // Writes into a Vec<u8> only fail if a Display impl errors.
        let _ = self.buf.write_fmt(args);
        self
    }

    /// Finalize against the process-wide timestamp cache
    pub fn prepare(&mut self) -> &mut Self {
        let cache = TimestampCache::global();
        self.prepare_with(&cache)
    }

    /// Same as [`Record::prepare`]
    pub fn build(&mut self) -> &mut Self {
        self.prepare()
    }

    /// Finalize against `cache`. A second call without [`Record::reset`] is a no-op.
    pub fn prepare_with(&mut self, cache: &TimestampCache) -> &mut Self {
        if self.prepared {
            return self;
        }

        if !self.prefix.is_empty() {
            self.buf.splice(0..0, self.prefix.iter().copied());
        }
        if self.show_date {
            cache.with_current(|stamp| {
                self.buf.splice(0..0, stamp.iter().copied());
                self.stamp_len = stamp.len();
            });
        }
        if self.newline {
            self.buf.push(b'\n');
        }

        self.prepared = true;
        self
    }

    /// Overwrite the timestamp of a prepared record.
    ///
    /// When `stamp` is as wide as the timestamp injected at prepare time
    /// only the leading date/time bytes (at most [`TIMESTAMP_WIDTH`]) are
    /// overwritten and the length never changes. A different width can
    /// only come from a variable-width style; the old timestamp is then
    /// replaced as a whole. Records without a timestamp are left alone.
    pub fn refresh_timestamp(&mut self, stamp: &[u8]) -> &mut Self {
        if !self.prepared || self.stamp_len == 0 {
            return self;
        }

        if stamp.len() == self.stamp_len {
            let n = stamp.len().min(TIMESTAMP_WIDTH);
            self.buf[..n].copy_from_slice(&stamp[..n]);
        } else {
            self.buf.splice(0..self.stamp_len, stamp.iter().copied());
            self.stamp_len = stamp.len();
        }
        self
    }

    /// Prepare if needed, then re-stamp from `cache`
    pub(crate) fn restamp_from(&mut self, cache: &TimestampCache) -> &[u8] {
        self.prepare_with(cache);
        if self.stamp_len > 0 {
            cache.with_current(|stamp| {
                self.refresh_timestamp(stamp);
            });
        }
        &self.buf
    }

    /// Clear the payload and restore the default flags.
    ///
    /// The prefix is kept; call [`Record::clear_prefix`] to drop it.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.show_date = true;
        self.newline = true;
        self.prepared = false;
        self.stamp_len = 0;
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn shows_date(&self) -> bool {
        self.show_date
    }

    pub fn has_newline(&self) -> bool {
        self.newline
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buf.capacity()
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<[u8]> for Record {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
