//! Fluent construction of direct and buffered loggers

use super::{
    buffered::{BufferedLogger, FailureCallback},
    channel::Channel,
    clock::{TimestampCache, TimestampStyle, DEFAULT_REFRESH_INTERVAL},
    config::LoggerConfig,
    direct::{process_exit, DirectLogger, ExitFn},
    error::Result,
    sink::{Sink, SinkSet},
};
use crate::sinks::ConsoleSink;
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`DirectLogger`] and [`BufferedLogger`]
///
/// # Example
/// ```
/// use rust_fast_logger::prelude::*;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let errors = MemorySink::new();
/// let logger = LoggerBuilder::new()
///     .console(false)
///     .sink(Channel::Error, errors.clone())
///     .flush_interval(Duration::from_millis(200))
///     .on_flush_failure(Arc::new(|e: &LoggerError| eprintln!("log flush failed: {}", e)))
///     .build_buffered()
///     .unwrap();
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    sinks: SinkSet,
    console_sink: Option<Box<dyn Sink>>,
    /// Exact interval set through [`LoggerBuilder::flush_interval`]; takes
    /// precedence over the millisecond value in `config`
    flush_interval: Option<Duration>,
    timestamps: Option<Arc<TimestampCache>>,
    on_flush_failure: Option<FailureCallback>,
    exit: ExitFn,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            sinks: SinkSet::new(),
            console_sink: None,
            flush_interval: None,
            timestamps: None,
            on_flush_failure: None,
            exit: process_exit,
        }
    }

    /// Replace all plain settings at once
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self.flush_interval = None;
        self
    }

    /// Mirror every line to stderr
    #[must_use = "builder methods return a new value"]
    pub fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    /// Use `sink` as the console; implies `console(true)`
    #[must_use = "builder methods return a new value"]
    pub fn console_sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.config.console = true;
        self.console_sink = Some(Box::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn show_date(mut self, show: bool) -> Self {
        self.config.show_date = show;
        self
    }

    /// Route `channel` to `sink`, replacing any previous sink
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, channel: Channel, sink: S) -> Self {
        self.sinks.set_sink(channel, Box::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = Some(interval);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_style(mut self, style: TimestampStyle) -> Self {
        self.config.timestamp_style = style;
        self
    }

    /// Use a specific timestamp cache instead of the process-wide one
    #[must_use = "builder methods return a new value"]
    pub fn timestamps(mut self, cache: Arc<TimestampCache>) -> Self {
        self.timestamps = Some(cache);
        self
    }

    /// Called when a drain pass fails; the pending content is discarded
    #[must_use = "builder methods return a new value"]
    pub fn on_flush_failure(mut self, callback: FailureCallback) -> Self {
        self.on_flush_failure = Some(callback);
        self
    }

    /// Replace `std::process::exit` for fatal calls
    #[must_use = "builder methods return a new value"]
    pub fn exit_with(mut self, exit: ExitFn) -> Self {
        self.exit = exit;
        self
    }

    /// Build a synchronous logger
    pub fn build(self) -> Result<DirectLogger> {
        self.config.validate()?;
        Ok(self.into_direct())
    }

    /// Build a buffered logger and start its flush scheduler
    pub fn build_buffered(self) -> Result<BufferedLogger> {
        self.config.validate()?;
        let interval = self
            .flush_interval
            .unwrap_or_else(|| self.config.flush_interval());
        let on_failure = self.on_flush_failure.clone();
        BufferedLogger::start(self.into_direct(), interval, on_failure)
    }

    fn into_direct(mut self) -> DirectLogger {
        let timestamps = match self.timestamps.take() {
            Some(cache) => cache,
            None => self.default_timestamps(),
        };

        if self.config.console {
            let console = self
                .console_sink
                .take()
                .unwrap_or_else(|| Box::new(ConsoleSink::new()) as Box<dyn Sink>);
            self.sinks.set_console(Some(console));
        }

        DirectLogger::new(self.sinks, timestamps, self.config.show_date, self.exit)
    }

    /// The shared cache when the settings match it, otherwise a private one
    fn default_timestamps(&self) -> Arc<TimestampCache> {
        let refresh = self.config.timestamp_refresh();
        if self.config.timestamp_style == TimestampStyle::Padded && refresh == DEFAULT_REFRESH_INTERVAL {
            return TimestampCache::global();
        }

        let cache = Arc::new(TimestampCache::system(self.config.timestamp_style));
        cache.start_refresher(refresh);
        cache
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LoggerError;
    use crate::sinks::MemorySink;

    #[test]
    fn test_builder_default() {
        let logger = LoggerBuilder::default().build().unwrap();
        assert!(logger.show_date());
        assert!(!logger.sinks().has_console());
        assert!(Arc::ptr_eq(logger.timestamps(), &TimestampCache::global()));
    }

    #[test]
    fn test_console_sink_implies_console() {
        let console = MemorySink::new();
        let logger = LoggerBuilder::new()
            .show_date(false)
            .console_sink(console.clone())
            .build()
            .unwrap();
        logger.warning(&["to console".into()]).unwrap();
        assert_eq!(console.contents_string(), "to console\n");
    }

    #[test]
    fn test_compact_style_gets_private_cache() {
        let logger = LoggerBuilder::new()
            .timestamp_style(TimestampStyle::Compact)
            .build()
            .unwrap();
        assert_eq!(logger.timestamps().style(), TimestampStyle::Compact);
        assert!(!Arc::ptr_eq(logger.timestamps(), &TimestampCache::global()));
        assert!(logger.timestamps().is_refreshing());
    }

    #[test]
    fn test_flush_interval_keeps_sub_millisecond_precision() {
        let logger = LoggerBuilder::new()
            .flush_interval(Duration::from_micros(500))
            .build_buffered()
            .unwrap();
        assert_eq!(logger.flush_interval(), Duration::from_micros(500));

        let logger = LoggerBuilder::new()
            .flush_interval(Duration::from_micros(1900))
            .build_buffered()
            .unwrap();
        assert_eq!(logger.flush_interval(), Duration::from_micros(1900));
    }

    #[test]
    fn test_config_replaces_earlier_flush_interval() {
        let config = LoggerConfig {
            flush_interval_ms: 40,
            ..LoggerConfig::default()
        };
        let logger = LoggerBuilder::new()
            .flush_interval(Duration::from_secs(9))
            .config(config)
            .build_buffered()
            .unwrap();
        assert_eq!(logger.flush_interval(), Duration::from_millis(40));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = LoggerConfig {
            timestamp_refresh_ms: 0,
            ..LoggerConfig::default()
        };
        let err = LoggerBuilder::new().config(config).build().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }
}
