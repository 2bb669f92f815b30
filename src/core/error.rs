//! Error types for the logger system

use super::channel::Channel;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON configuration error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A sink refused a write for a channel
    #[error("Sink '{sink}' failed to write {channel} logs: {source}")]
    SinkWrite {
        channel: Channel,
        sink: String,
        #[source]
        source: std::io::Error,
    },

    /// A sink panicked while writing or flushing
    #[error("Sink '{sink}' panicked while writing {channel} logs: {message}")]
    SinkPanicked {
        channel: Channel,
        sink: String,
        message: String,
    },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File sink error with path
    #[error("File sink error for '{path}': {message}")]
    FileSinkError { path: String, message: String },

    /// Registering with the `log` facade failed
    #[error("Failed to install logger: {0}")]
    InstallError(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a sink write error
    pub fn sink_write(channel: Channel, sink: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::SinkWrite {
            channel,
            sink: sink.into(),
            source,
        }
    }

    /// Create a sink panic error
    pub fn sink_panicked(channel: Channel, sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkPanicked {
            channel,
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file sink error
    pub fn file_sink(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileSinkError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The channel whose drain produced this error, if any
    pub fn channel(&self) -> Option<Channel> {
        match self {
            LoggerError::SinkWrite { channel, .. } | LoggerError::SinkPanicked { channel, .. } => {
                Some(*channel)
            }
            _ => None,
        }
    }
}
