//! Flush metrics for observability
//!
//! Counts drain passes, delivered bytes and, more importantly, the bytes
//! lost to sink failures or deliberate discards. Without a failure callback
//! these counters are the only trace of lost log data.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for a [`BufferedLogger`](crate::BufferedLogger)
///
/// # Example
///
/// ```
/// use rust_fast_logger::FlushMetrics;
///
/// let metrics = FlushMetrics::new();
/// metrics.record_pass();
/// metrics.record_flushed(128);
///
/// assert_eq!(metrics.flush_passes(), 1);
/// assert_eq!(metrics.bytes_flushed(), 128);
/// ```
#[derive(Debug)]
pub struct FlushMetrics {
    /// Completed drain passes (scheduled or explicit)
    flush_passes: AtomicU64,

    /// Bytes handed to sinks successfully
    bytes_flushed: AtomicU64,

    /// Drain passes aborted by a sink failure
    flush_failures: AtomicU64,

    /// Bytes thrown away after a failure or by `stop_without_flush`
    bytes_discarded: AtomicU64,
}

impl FlushMetrics {
    pub const fn new() -> Self {
        Self {
            flush_passes: AtomicU64::new(0),
            bytes_flushed: AtomicU64::new(0),
            flush_failures: AtomicU64::new(0),
            bytes_discarded: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn flush_passes(&self) -> u64 {
        self.flush_passes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn bytes_flushed(&self) -> u64 {
        self.bytes_flushed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flush_failures(&self) -> u64 {
        self.flush_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn bytes_discarded(&self) -> u64 {
        self.bytes_discarded.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_pass(&self) -> u64 {
        self.flush_passes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_flushed(&self, bytes: usize) -> u64 {
        self.bytes_flushed.fetch_add(bytes as u64, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failure(&self) -> u64 {
        self.flush_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_discarded(&self, bytes: usize) -> u64 {
        self.bytes_discarded.fetch_add(bytes as u64, Ordering::Relaxed)
    }

    /// Share of buffered bytes lost, as a percentage (0.0 - 100.0)
    pub fn loss_rate(&self) -> f64 {
        let lost = self.bytes_discarded() as f64;
        let total = self.bytes_flushed() as f64 + lost;
        if total == 0.0 {
            0.0
        } else {
            (lost / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.flush_passes.store(0, Ordering::Relaxed);
        self.bytes_flushed.store(0, Ordering::Relaxed);
        self.flush_failures.store(0, Ordering::Relaxed);
        self.bytes_discarded.store(0, Ordering::Relaxed);
    }
}

impl Default for FlushMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for FlushMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            flush_passes: AtomicU64::new(self.flush_passes()),
            bytes_flushed: AtomicU64::new(self.bytes_flushed()),
            flush_failures: AtomicU64::new(self.flush_failures()),
            bytes_discarded: AtomicU64::new(self.bytes_discarded()),
        }
    }
}
