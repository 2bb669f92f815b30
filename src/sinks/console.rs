//! Console sink implementation

use crate::core::{Channel, Sink};
use colored::Colorize;
use std::io::{self, Write};

/// Which standard stream a [`ConsoleSink`] writes to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleTarget {
    #[default]
    Stderr,
    Stdout,
}

pub struct ConsoleSink {
    target: ConsoleTarget,
    use_colors: bool,
}

impl ConsoleSink {
    /// Plain output to stderr
    pub fn new() -> Self {
        Self {
            target: ConsoleTarget::Stderr,
            use_colors: false,
        }
    }

    pub fn stdout() -> Self {
        Self {
            target: ConsoleTarget::Stdout,
            use_colors: false,
        }
    }

    /// Color error, warning, success and fatal output
    ///
    /// # Example
    ///
    /// ```
    /// use rust_fast_logger::sinks::ConsoleSink;
    ///
    /// let sink = ConsoleSink::new().with_colors(true);
    /// ```
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn emit(&self, out: &mut dyn Write, channel: Channel, buf: &[u8]) -> io::Result<()> {
        match channel.color_code() {
            Some(color) if self.use_colors => {
                let text = String::from_utf8_lossy(buf);
                write!(out, "{}", text.as_ref().color(color))
            }
            _ => out.write_all(buf),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, channel: Channel, buf: &[u8]) -> io::Result<()> {
        match self.target {
            ConsoleTarget::Stderr => self.emit(&mut io::stderr().lock(), channel, buf),
            ConsoleTarget::Stdout => self.emit(&mut io::stdout().lock(), channel, buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.target {
            ConsoleTarget::Stderr => io::stderr().flush(),
            ConsoleTarget::Stdout => io::stdout().flush(),
        }
    }

    fn name(&self) -> &str {
        "console"
    }
}
