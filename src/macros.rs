//! Logging macros for ergonomic log message formatting.
//!
//! These macros forward `format!`-style arguments to a logger's
//! `format_*` methods through `format_args!`, so no intermediate `String`
//! is allocated. They work with both [`BufferedLogger`](crate::BufferedLogger)
//! and [`DirectLogger`](crate::DirectLogger); with the latter the expression
//! evaluates to the write's `Result`.
//!
//! # Examples
//!
//! ```
//! use rust_fast_logger::prelude::*;
//! use rust_fast_logger::info;
//!
//! let logger = LoggerBuilder::new().build_buffered().unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a formatted line to an explicit channel.
///
/// # Examples
///
/// ```
/// # use rust_fast_logger::prelude::*;
/// # let logger = LoggerBuilder::new().build_buffered().unwrap();
/// use rust_fast_logger::log;
/// log!(logger, Channel::Info, "Simple message");
/// log!(logger, Channel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $channel:expr, $($arg:tt)+) => {
        $logger.log_fmt($channel, ::std::format_args!($($arg)+))
    };
}

/// Log to the info channel.
///
/// ```
/// # use rust_fast_logger::prelude::*;
/// # let logger = LoggerBuilder::new().build_buffered().unwrap();
/// use rust_fast_logger::info;
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.format_info(::std::format_args!($($arg)+))
    };
}

/// Log to the error channel.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.format_error(::std::format_args!($($arg)+))
    };
}

/// Log to the warning channel.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $logger.format_warning(::std::format_args!($($arg)+))
    };
}

/// Log to the success channel.
#[macro_export]
macro_rules! success {
    ($logger:expr, $($arg:tt)+) => {
        $logger.format_success(::std::format_args!($($arg)+))
    };
}

/// Flush pending lines, log to the fatal channel and terminate the process.
///
/// ```no_run
/// # use rust_fast_logger::prelude::*;
/// # let logger = LoggerBuilder::new().build_buffered().unwrap();
/// use rust_fast_logger::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.format_fatal(::std::format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{BufferedLogger, Channel, LoggerBuilder};
    use crate::sinks::MemorySink;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::time::Duration;

    fn exit_by_panic(code: i32) -> ! {
        panic!("exit({})", code)
    }

    fn logger(sink: &MemorySink) -> BufferedLogger {
        let mut builder = LoggerBuilder::new()
            .show_date(false)
            .flush_interval(Duration::from_secs(3600))
            .exit_with(exit_by_panic);
        for channel in Channel::ALL {
            builder = builder.sink(channel, sink.clone());
        }
        builder.build_buffered().unwrap()
    }

    #[test]
    fn test_log_macro() {
        let sink = MemorySink::new();
        let logger = logger(&sink);
        log!(logger, Channel::Success, "Formatted: {}", 42);
        logger.flush().unwrap();
        assert_eq!(sink.contents_string(), "Formatted: 42\n");
    }

    #[test]
    fn test_channel_macros() {
        let sink = MemorySink::new();
        let logger = logger(&sink);
        info!(logger, "Items: {}", 100);
        error!(logger, "Code: {}", 500);
        warning!(logger, "Retry {} of {}", 1, 3);
        success!(logger, "done");
        logger.flush().unwrap();
        assert_eq!(
            sink.lines(),
            vec!["Items: 100", "Code: 500", "Retry 1 of 3", "done"]
        );
    }

    #[test]
    fn test_macros_on_direct_logger() {
        let sink = MemorySink::new();
        let logger = LoggerBuilder::new()
            .show_date(false)
            .sink(Channel::Error, sink.clone())
            .build()
            .unwrap();
        error!(logger, "now {}", "written").unwrap();
        assert_eq!(sink.contents_string(), "now written\n");
    }

    #[test]
    fn test_fatal_macro_flushes_first() {
        let sink = MemorySink::new();
        let logger = logger(&sink);
        info!(logger, "before");
        let result = catch_unwind(AssertUnwindSafe(|| {
            fatal!(logger, "Critical failure: {}", "system")
        }));
        assert!(result.is_err());
        assert_eq!(sink.lines(), vec!["before", "Critical failure: system"]);
    }
}
