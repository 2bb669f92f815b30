//! Adapter turning any `io::Write` into a sink

use crate::core::{Channel, Sink};
use std::io::{self, Write};

/// Wraps a writer (socket, pipe, custom buffer) as a [`Sink`]
///
/// # Example
///
/// ```
/// use rust_fast_logger::sinks::WriterSink;
///
/// let sink = WriterSink::new("buffer", Vec::<u8>::new());
/// assert_eq!(sink.get_ref().len(), 0);
/// ```
pub struct WriterSink<W: Write + Send> {
    name: String,
    writer: W,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            writer,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn write(&mut self, _channel: Channel, buf: &[u8]) -> io::Result<()> {
        self.writer.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_through() {
        let mut sink = WriterSink::new("vec", Vec::new());
        sink.write(Channel::Raw, b"abc").unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.name(), "vec");
        assert_eq!(sink.into_inner(), b"abc");
    }
}
