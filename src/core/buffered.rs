//! Buffered multi-channel logger
//!
//! Log calls never perform I/O. Each buffered [`Channel`] owns a byte buffer
//! behind its own lock; a call locks one channel, appends one complete line
//! and returns. A background scheduler wakes every flush interval and drains
//! the channels, one lock at a time, in [`Channel::BUFFERED`] order.
//!
//! Anything still buffered when the process dies without a flush is lost,
//! so the flush interval is also the durability window. Call
//! [`BufferedLogger::flush`] (or log through [`BufferedLogger::fatal`]) before
//! exiting.

use super::{
    args::{encode_args, Arg},
    channel::Channel,
    direct::DirectLogger,
    error::{LoggerError, Result},
    metrics::FlushMetrics,
    record::Record,
    sink::panic_message,
};
use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use std::borrow::BorrowMut;
use std::fmt;
use std::io::Write;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Default cadence of drain passes
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(1);

/// Called with the error that aborted a drain pass.
///
/// When no callback is configured, the discarded data is only visible in
/// [`FlushMetrics::bytes_discarded`].
pub type FailureCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

#[derive(Debug, Default)]
struct ChannelBuffer {
    buf: Mutex<Vec<u8>>,
}

struct Shared {
    direct: DirectLogger,
    buffers: [ChannelBuffer; 6],
    running: AtomicBool,
    metrics: FlushMetrics,
    on_failure: Option<FailureCallback>,
}

impl Shared {
    #[inline]
    fn buffer(&self, channel: Channel) -> &ChannelBuffer {
        debug_assert!(channel.is_buffered(), "{} has no buffer", channel);
        &self.buffers[channel.index()]
    }

    /// One drain pass over every buffered channel.
    ///
    /// A sink failure aborts the pass and discards every buffer; nothing is
    /// retried.
    fn flush(&self) -> Result<()> {
        for channel in Channel::BUFFERED {
            let mut buf = self.buffer(channel).buf.lock();
            if buf.is_empty() {
                continue;
            }

            match self.direct.sinks().write(channel, &buf) {
                Ok(()) => {
                    self.metrics.record_flushed(buf.len());
                    buf.clear();
                }
                Err(e) => {
                    let mut lost = buf.len();
                    buf.clear();
                    drop(buf);
                    lost += self.discard_all();
                    self.metrics.record_failure();
                    self.metrics.record_discarded(lost);
                    self.report(&e);
                    return Err(e);
                }
            }
        }

        self.metrics.record_pass();
        Ok(())
    }

    /// Truncate every buffer, one lock at a time
    fn discard_all(&self) -> usize {
        self.buffers
            .iter()
            .map(|buffer| {
                let mut buf = buffer.buf.lock();
                let len = buf.len();
                buf.clear();
                len
            })
            .sum()
    }

    fn report(&self, error: &LoggerError) {
        if let Some(ref callback) = self.on_failure {
            callback(error);
        }
    }
}

/// Multi-channel logger with in-memory buffers and periodic flushing.
///
/// # Example
///
/// ```
/// use rust_fast_logger::prelude::*;
/// use std::time::Duration;
///
/// let info = MemorySink::new();
/// let logger = LoggerBuilder::new()
///     .show_date(false)
///     .sink(Channel::Info, info.clone())
///     .flush_interval(Duration::from_millis(50))
///     .build_buffered()
///     .unwrap();
///
/// logger.info(&["user=".into(), 42u32.into()]);
/// assert!(info.is_empty()); // still buffered
///
/// logger.flush().unwrap();
/// assert_eq!(info.contents_string(), "user=42\n");
/// ```
pub struct BufferedLogger {
    shared: Arc<Shared>,
    scheduler: Option<thread::JoinHandle<()>>,
    /// Dropping the sender wakes the scheduler and makes it exit
    wake: Option<Sender<()>>,
    flush_interval: Duration,
}

impl BufferedLogger {
    pub(crate) fn start(
        direct: DirectLogger,
        flush_interval: Duration,
        on_failure: Option<FailureCallback>,
    ) -> Result<Self> {
        if flush_interval.is_zero() {
            return Err(LoggerError::config(
                "BufferedLogger",
                "flush interval must be greater than zero",
            ));
        }

        let shared = Arc::new(Shared {
            direct,
            buffers: Default::default(),
            running: AtomicBool::new(true),
            metrics: FlushMetrics::new(),
            on_failure,
        });

        let (wake, woken) = crossbeam_channel::bounded(0);
        let scheduler = Self::spawn_scheduler(Arc::clone(&shared), flush_interval, woken)?;

        Ok(Self {
            shared,
            scheduler: Some(scheduler),
            wake: Some(wake),
            flush_interval,
        })
    }

    /// Drain every interval until the running flag is cleared.
    ///
    /// The flag is checked after each pass, so a stop takes effect within
    /// one interval and may be followed by one more pass. A disconnect on
    /// `woken` ends the loop at once without a pass.
    fn spawn_scheduler(
        shared: Arc<Shared>,
        interval: Duration,
        woken: Receiver<()>,
    ) -> Result<thread::JoinHandle<()>> {
        thread::Builder::new()
            .name("log-flusher".to_string())
            .spawn(move || {
                let ticker = crossbeam_channel::tick(interval);
                loop {
                    let woke = crossbeam_channel::select! {
                        recv(ticker) -> _ => false,
                        recv(woken) -> _ => true,
                    };
                    if woke {
                        break;
                    }

                    // Errors were already reported through the failure callback.
                    let pass = catch_unwind(AssertUnwindSafe(|| shared.flush()));
                    if let Err(panic_info) = pass {
                        eprintln!(
                            "[LOGGER CRITICAL] Flush failure handler panicked: {}. \
                             Scheduled flushing stopped.",
                            panic_message(panic_info.as_ref())
                        );
                        shared.running.store(false, Ordering::Release);
                        break;
                    }

                    if !shared.running.load(Ordering::Acquire) {
                        break;
                    }
                }
            })
            .map_err(|e| LoggerError::io_operation("starting flush scheduler", "thread spawn failed", e))
    }

    /// Create a builder for a logger
    #[must_use]
    pub fn builder() -> super::builder::LoggerBuilder {
        super::builder::LoggerBuilder::new()
    }

    /// Append one formatted line to `channel`'s buffer.
    ///
    /// [`Channel::Fatal`] is not buffered: the line is written synchronously
    /// (without terminating) and failures go to the failure callback.
    pub fn log(&self, channel: Channel, args: &[Arg<'_>]) {
        if !channel.is_buffered() {
            if let Err(e) = self.shared.direct.log(channel, args) {
                self.shared.report(&e);
            }
            return;
        }

        let mut buf = self.shared.buffer(channel).buf.lock();
        self.shared.direct.stamp_into(&mut buf);
        encode_args(&mut buf, args);
        buf.push(b'\n');
    }

    /// Append one `format_args!` line to `channel`'s buffer
    pub fn log_fmt(&self, channel: Channel, args: fmt::Arguments<'_>) {
        if !channel.is_buffered() {
            if let Err(e) = self.shared.direct.log_fmt(channel, args) {
                self.shared.report(&e);
            }
            return;
        }

        // Format outside the lock so a slow Display impl never holds it.
        let mut line = Vec::with_capacity(64);
        let _ = line.write_fmt(args);

        let mut buf = self.shared.buffer(channel).buf.lock();
        self.shared.direct.stamp_into(&mut buf);
        buf.extend_from_slice(&line);
        buf.push(b'\n');
    }

    /// Re-stamp a prepared record and append it. The record is kept for
    /// replay; unprepared records are prepared first.
    pub fn log_prepared(&self, channel: Channel, record: &mut Record) {
        if !channel.is_buffered() {
            if let Err(e) = self.shared.direct.log_prepared(channel, record) {
                self.shared.report(&e);
            }
            return;
        }

        let mut buf = self.shared.buffer(channel).buf.lock();
        buf.extend_from_slice(record.restamp_from(self.shared.direct.timestamps()));
    }

    #[inline]
    pub fn info(&self, args: &[Arg<'_>]) {
        self.log(Channel::Info, args);
    }

    #[inline]
    pub fn format_info(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Channel::Info, args);
    }

    #[inline]
    pub fn info_prepared(&self, record: &mut Record) {
        self.log_prepared(Channel::Info, record);
    }

    #[inline]
    pub fn error(&self, args: &[Arg<'_>]) {
        self.log(Channel::Error, args);
    }

    #[inline]
    pub fn format_error(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Channel::Error, args);
    }

    #[inline]
    pub fn error_prepared(&self, record: &mut Record) {
        self.log_prepared(Channel::Error, record);
    }

    #[inline]
    pub fn warning(&self, args: &[Arg<'_>]) {
        self.log(Channel::Warning, args);
    }

    #[inline]
    pub fn format_warning(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Channel::Warning, args);
    }

    #[inline]
    pub fn warning_prepared(&self, record: &mut Record) {
        self.log_prepared(Channel::Warning, record);
    }

    #[inline]
    pub fn success(&self, args: &[Arg<'_>]) {
        self.log(Channel::Success, args);
    }

    #[inline]
    pub fn format_success(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Channel::Success, args);
    }

    #[inline]
    pub fn success_prepared(&self, record: &mut Record) {
        self.log_prepared(Channel::Success, record);
    }

    /// Append a record to the record channel, consuming it.
    ///
    /// Unprepared records are prepared first and every record is reset
    /// once its bytes are appended, so a record passed by `&mut` can be
    /// filled again. A pooled record returns to its pool once this call
    /// drops it.
    pub fn record<R: BorrowMut<Record>>(&self, mut record: R) {
        let record = record.borrow_mut();
        record.prepare_with(self.shared.direct.timestamps());
        {
            let mut buf = self.shared.buffer(Channel::Record).buf.lock();
            buf.extend_from_slice(record.as_bytes());
        }
        record.reset();
    }

    /// Append bytes to the raw channel exactly as given
    pub fn raw(&self, bytes: &[u8]) {
        let mut buf = self.shared.buffer(Channel::Raw).buf.lock();
        buf.extend_from_slice(bytes);
    }

    /// Flush every buffer, write a fatal line and terminate the process
    pub fn fatal(&self, args: &[Arg<'_>]) -> ! {
        let _ = self.flush();
        self.shared.direct.fatal(args)
    }

    pub fn format_fatal(&self, args: fmt::Arguments<'_>) -> ! {
        let _ = self.flush();
        self.shared.direct.format_fatal(args)
    }

    pub fn fatal_prepared(&self, record: &mut Record) -> ! {
        let _ = self.flush();
        self.shared.direct.fatal_prepared(record)
    }

    /// Drain every buffer now.
    ///
    /// Serialized with the scheduler per channel. On a sink failure every
    /// buffer is discarded, the failure callback runs, and the error is
    /// returned.
    pub fn flush(&self) -> Result<()> {
        self.shared.flush()
    }

    /// Ask the scheduler to exit after its current or next pass.
    ///
    /// Does not flush: call [`BufferedLogger::flush`] to guarantee delivery.
    pub fn stop(&self) {
        self.shared.running.store(false, Ordering::Release);
    }

    /// Drop all pending content without writing it, then stop
    pub fn stop_without_flush(&self) {
        let mut guards: Vec<_> = self
            .shared
            .buffers
            .iter()
            .map(|buffer| buffer.buf.lock())
            .collect();

        let mut discarded = 0;
        for buf in guards.iter_mut() {
            discarded += buf.len();
            buf.clear();
        }
        drop(guards);

        if discarded > 0 {
            self.shared.metrics.record_discarded(discarded);
        }
        self.shared.running.store(false, Ordering::Release);
    }

    /// Stop, wake the scheduler and wait for it to exit, then flush what
    /// is left
    pub fn shutdown(&mut self) -> Result<()> {
        self.stop();
        self.join_scheduler();
        self.flush()
    }

    fn join_scheduler(&mut self) {
        drop(self.wake.take());
        if let Some(handle) = self.scheduler.take() {
            if handle.join().is_err() {
                eprintln!("[LOGGER ERROR] Flush scheduler panicked during shutdown");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Bytes waiting in `channel`'s buffer (always 0 for fatal)
    pub fn pending_bytes(&self, channel: Channel) -> usize {
        if !channel.is_buffered() {
            return 0;
        }
        self.shared.buffer(channel).buf.lock().len()
    }

    pub fn metrics(&self) -> &FlushMetrics {
        &self.shared.metrics
    }

    pub fn flush_interval(&self) -> Duration {
        self.flush_interval
    }

    pub fn timestamps(&self) -> &Arc<super::clock::TimestampCache> {
        self.shared.direct.timestamps()
    }
}

impl fmt::Debug for BufferedLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferedLogger")
            .field("direct", &self.shared.direct)
            .field("flush_interval", &self.flush_interval)
            .field("running", &self.is_running())
            .finish()
    }
}

impl Drop for BufferedLogger {
    fn drop(&mut self) {
        self.stop();
        self.join_scheduler();
        // Failures were already reported through the failure callback.
        let _ = self.flush();
    }
}
