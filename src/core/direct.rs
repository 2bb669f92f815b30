//! Synchronous logger: every call formats and writes immediately

use super::{
    args::{encode_args, Arg},
    channel::Channel,
    clock::TimestampCache,
    error::Result,
    record::Record,
    sink::{write_to, Sink, SinkSet},
};
use std::borrow::BorrowMut;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Process exit status used by fatal calls
pub const FATAL_EXIT_CODE: i32 = 1;

/// Terminates the process after a fatal line has been written
pub type ExitFn = fn(i32) -> !;

pub(crate) fn process_exit(code: i32) -> ! {
    std::process::exit(code)
}

/// Initial capacity of a freshly formatted line
const LINE_CAPACITY: usize = 70;

/// Unbuffered logger writing straight through a [`SinkSet`].
///
/// Each call does its own I/O; use [`BufferedLogger`](crate::BufferedLogger)
/// to keep I/O off the calling thread.
pub struct DirectLogger {
    sinks: SinkSet,
    timestamps: Arc<TimestampCache>,
    show_date: bool,
    exit: ExitFn,
}

impl DirectLogger {
    pub(crate) fn new(
        sinks: SinkSet,
        timestamps: Arc<TimestampCache>,
        show_date: bool,
        exit: ExitFn,
    ) -> Self {
        Self {
            sinks,
            timestamps,
            show_date,
            exit,
        }
    }

    /// Create a builder for a logger
    #[must_use]
    pub fn builder() -> super::builder::LoggerBuilder {
        super::builder::LoggerBuilder::new()
    }

    pub fn timestamps(&self) -> &Arc<TimestampCache> {
        &self.timestamps
    }

    pub fn show_date(&self) -> bool {
        self.show_date
    }

    pub(crate) fn sinks(&self) -> &SinkSet {
        &self.sinks
    }

    /// Append the timestamp (when enabled) to a line buffer
    pub(crate) fn stamp_into(&self, buf: &mut Vec<u8>) {
        if self.show_date {
            self.timestamps.with_current(|ts| buf.extend_from_slice(ts));
        }
    }

    pub(crate) fn line_into(&self, buf: &mut Vec<u8>, args: &[Arg<'_>]) {
        self.stamp_into(buf);
        encode_args(buf, args);
        buf.push(b'\n');
    }

    pub(crate) fn formatted_line_into(&self, buf: &mut Vec<u8>, args: fmt::Arguments<'_>) {
        self.stamp_into(buf);
        // Writes into a Vec<u8> only fail if a Display impl errors.
        let _ = buf.write_fmt(args);
        buf.push(b'\n');
    }

    pub fn log(&self, channel: Channel, args: &[Arg<'_>]) -> Result<()> {
        let mut buf = Vec::with_capacity(LINE_CAPACITY);
        self.line_into(&mut buf, args);
        self.sinks.write(channel, &buf)
    }

    pub fn log_fmt(&self, channel: Channel, args: fmt::Arguments<'_>) -> Result<()> {
        let mut buf = Vec::with_capacity(LINE_CAPACITY);
        self.formatted_line_into(&mut buf, args);
        self.sinks.write(channel, &buf)
    }

    /// Write a prepared record after re-stamping it. The record is kept
    /// for replay; unprepared records are prepared first.
    pub fn log_prepared(&self, channel: Channel, record: &mut Record) -> Result<()> {
        let bytes = record.restamp_from(&self.timestamps);
        self.sinks.write(channel, bytes)
    }

    #[inline]
    pub fn info(&self, args: &[Arg<'_>]) -> Result<()> {
        self.log(Channel::Info, args)
    }

    #[inline]
    pub fn format_info(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.log_fmt(Channel::Info, args)
    }

    #[inline]
    pub fn info_prepared(&self, record: &mut Record) -> Result<()> {
        self.log_prepared(Channel::Info, record)
    }

    #[inline]
    pub fn error(&self, args: &[Arg<'_>]) -> Result<()> {
        self.log(Channel::Error, args)
    }

    #[inline]
    pub fn format_error(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.log_fmt(Channel::Error, args)
    }

    #[inline]
    pub fn error_prepared(&self, record: &mut Record) -> Result<()> {
        self.log_prepared(Channel::Error, record)
    }

    #[inline]
    pub fn warning(&self, args: &[Arg<'_>]) -> Result<()> {
        self.log(Channel::Warning, args)
    }

    #[inline]
    pub fn format_warning(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.log_fmt(Channel::Warning, args)
    }

    #[inline]
    pub fn warning_prepared(&self, record: &mut Record) -> Result<()> {
        self.log_prepared(Channel::Warning, record)
    }

    #[inline]
    pub fn success(&self, args: &[Arg<'_>]) -> Result<()> {
        self.log(Channel::Success, args)
    }

    #[inline]
    pub fn format_success(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.log_fmt(Channel::Success, args)
    }

    #[inline]
    pub fn success_prepared(&self, record: &mut Record) -> Result<()> {
        self.log_prepared(Channel::Success, record)
    }

    /// Write bytes to the raw channel exactly as given
    pub fn raw(&self, bytes: &[u8]) -> Result<()> {
        self.sinks.write(Channel::Raw, bytes)
    }

    /// Write bytes to the console (if enabled) and to `sink`
    pub fn raw_to(&self, bytes: &[u8], sink: &mut dyn Sink) -> Result<()> {
        let console = self.sinks.write_console(Channel::Raw, bytes);
        let target = write_to(sink, Channel::Raw, bytes);
        console.and(target)
    }

    /// Write a record to the record channel, consuming it.
    ///
    /// Unprepared records are prepared first; the record is reset after
    /// the write whether or not it succeeded. A pooled record goes back to
    /// its pool when it is dropped at the end of this call.
    pub fn record<R: BorrowMut<Record>>(&self, mut record: R) -> Result<()> {
        let record = record.borrow_mut();
        record.prepare_with(&self.timestamps);
        let written = self.sinks.write(Channel::Record, record.as_bytes());
        record.reset();
        written
    }

    /// Write a record to the console (if enabled) and to `sink`, consuming it
    pub fn record_to<R: BorrowMut<Record>>(&self, mut record: R, sink: &mut dyn Sink) -> Result<()> {
        let record = record.borrow_mut();
        record.prepare_with(&self.timestamps);
        let console = self.sinks.write_console(Channel::Record, record.as_bytes());
        let target = write_to(sink, Channel::Record, record.as_bytes());
        record.reset();
        console.and(target)
    }

    /// Write a fatal line and terminate the process
    pub fn fatal(&self, args: &[Arg<'_>]) -> ! {
        let mut buf = Vec::with_capacity(LINE_CAPACITY);
        self.line_into(&mut buf, args);
        self.terminate(&buf)
    }

    pub fn format_fatal(&self, args: fmt::Arguments<'_>) -> ! {
        let mut buf = Vec::with_capacity(LINE_CAPACITY);
        self.formatted_line_into(&mut buf, args);
        self.terminate(&buf)
    }

    pub fn fatal_prepared(&self, record: &mut Record) -> ! {
        let bytes = record.restamp_from(&self.timestamps);
        self.terminate(bytes)
    }

    fn terminate(&self, line: &[u8]) -> ! {
        if let Err(e) = self.sinks.write(Channel::Fatal, line) {
            eprintln!("[LOGGER ERROR] Failed to write fatal log: {}", e);
        }
        (self.exit)(FATAL_EXIT_CODE)
    }
}

impl fmt::Debug for DirectLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectLogger")
            .field("sinks", &self.sinks)
            .field("show_date", &self.show_date)
            .finish()
    }
}
