//! Serializable logger settings

use super::clock::TimestampStyle;
use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Plain settings for a logger; sinks are attached through
/// [`LoggerBuilder`](crate::LoggerBuilder).
///
/// Missing fields take their defaults when deserializing.
///
/// # Example
///
/// ```
/// use rust_fast_logger::LoggerConfig;
///
/// let config = LoggerConfig::from_json(r#"{ "console": true, "flush_interval_ms": 50 }"#).unwrap();
/// assert!(config.console);
/// assert!(config.show_date);
/// assert_eq!(config.flush_interval().as_millis(), 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Mirror every line to stderr
    pub console: bool,
    /// Prepend the cached timestamp to plain log calls
    pub show_date: bool,
    /// Cadence of the buffered logger's drain passes
    pub flush_interval_ms: u64,
    pub timestamp_style: TimestampStyle,
    /// Cadence of the timestamp refresher
    pub timestamp_refresh_ms: u64,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: false,
            show_date: true,
            flush_interval_ms: 1000,
            timestamp_style: TimestampStyle::Padded,
            timestamp_refresh_ms: 300,
        }
    }
}

impl LoggerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LoggerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }

    pub fn timestamp_refresh(&self) -> Duration {
        Duration::from_millis(self.timestamp_refresh_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.flush_interval_ms == 0 {
            return Err(LoggerError::config(
                "BufferedLogger",
                "flush interval must be greater than zero",
            ));
        }
        if self.timestamp_refresh_ms == 0 {
            return Err(LoggerError::config(
                "TimestampCache",
                "refresh interval must be greater than zero",
            ));
        }
        Ok(())
    }
}
