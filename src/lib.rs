//! # Rust Fast Logger
//!
//! A buffered, multi-channel logging facility for long-running processes.
//!
//! ## Features
//!
//! - **No I/O on the calling thread**: lines are appended to per-channel
//!   buffers and drained by a background scheduler
//! - **Six independent channels**: info, error, warning, success, record and
//!   raw, each with its own lock and sink, plus a synchronous fatal channel
//! - **Cached timestamps**: one pre-formatted timestamp shared by every line
//!   within a refresh window
//! - **Reusable records**: pooled line builders and prepared records that can
//!   be replayed with a fresh timestamp
//!
//! Buffered lines are lost if the process dies before the next flush; the
//! flush interval is the durability window. Flush before exiting, or use the
//! `fatal` calls, which flush first.

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        record, Arg, BufferedLogger, Channel, DirectLogger, FlushMetrics, LoggerBuilder,
        LoggerConfig, LoggerError, PooledRecord, Record, RecordPool, Result, Sink,
        TimestampCache, TimestampStyle,
    };
    pub use crate::sinks::{ConsoleSink, FileSink, MemorySink, WriterSink};
}

pub use core::{
    record, Arg, BufferedLogger, Channel, Clock, DirectLogger, ExitFn, FailureCallback,
    FixedClock, FlushMetrics, LoggerBuilder, LoggerConfig, LoggerError, PooledRecord, Record,
    RecordPool, Result, Sink, SinkSet, SystemClock, TimestampCache, TimestampStyle,
    DEFAULT_FLUSH_INTERVAL, FATAL_EXIT_CODE, TIMESTAMP_WIDTH,
};
pub use sinks::{ConsoleSink, FileSink, MemorySink, WriterSink};

#[cfg(feature = "log-compat")]
pub use core::log_bridge::install;
