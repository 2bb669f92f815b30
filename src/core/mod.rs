//! Core logger types and traits

pub mod args;
pub mod buffered;
pub mod builder;
pub mod channel;
pub mod clock;
pub mod config;
pub mod direct;
pub mod error;
#[cfg(feature = "log-compat")]
pub mod log_bridge;
pub mod metrics;
pub mod pool;
pub mod record;
pub mod sink;

pub use args::Arg;
pub use buffered::{BufferedLogger, FailureCallback, DEFAULT_FLUSH_INTERVAL};
pub use builder::LoggerBuilder;
pub use channel::Channel;
pub use clock::{
    format_timestamp, Clock, FixedClock, SystemClock, TimestampCache, TimestampStyle,
    DEFAULT_REFRESH_INTERVAL, TIMESTAMP_WIDTH,
};
pub use config::LoggerConfig;
pub use direct::{DirectLogger, ExitFn, FATAL_EXIT_CODE};
pub use error::{LoggerError, Result};
pub use metrics::FlushMetrics;
pub use pool::{record, PooledRecord, RecordPool};
pub use record::Record;
pub use sink::{Sink, SinkSet};
