//! Sink trait and the per-channel fan-out

use super::channel::Channel;
use super::error::{LoggerError, Result};
use parking_lot::Mutex;
use std::any::Any;
use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// A destination that accepts formatted log bytes.
///
/// Sinks are expected to accept writes quickly; nothing upstream applies
/// backpressure.
pub trait Sink: Send {
    fn write(&mut self, channel: Channel, buf: &[u8]) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
    fn name(&self) -> &str;
}

impl Sink for Box<dyn Sink> {
    fn write(&mut self, channel: Channel, buf: &[u8]) -> io::Result<()> {
        (**self).write(channel, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

type SharedSink = Mutex<Box<dyn Sink>>;

/// Console plus one optional sink per channel.
///
/// Every write goes to the console (when set) and then to the channel's
/// own sink. Each sink call is panic-isolated: a panicking sink surfaces as
/// [`LoggerError::SinkPanicked`] instead of unwinding into the caller.
#[derive(Default)]
pub struct SinkSet {
    console: Option<SharedSink>,
    sinks: [Option<SharedSink>; 7],
}

impl SinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_console(&mut self, sink: Option<Box<dyn Sink>>) {
        self.console = sink.map(Mutex::new);
    }

    pub fn set_sink(&mut self, channel: Channel, sink: Box<dyn Sink>) {
        self.sinks[channel.index()] = Some(Mutex::new(sink));
    }

    pub fn has_console(&self) -> bool {
        self.console.is_some()
    }

    pub fn has_sink(&self, channel: Channel) -> bool {
        self.sinks[channel.index()].is_some()
    }

    /// Write `buf` to the console and to `channel`'s sink.
    ///
    /// Both are attempted; the first failure is returned.
    pub fn write(&self, channel: Channel, buf: &[u8]) -> Result<()> {
        let console = match &self.console {
            Some(console) => write_shared(console, channel, buf),
            None => Ok(()),
        };
        let sink = match &self.sinks[channel.index()] {
            Some(sink) => write_shared(sink, channel, buf),
            None => Ok(()),
        };
        console.and(sink)
    }

    /// Write `buf` to the console only; a no-op when the console is off
    pub fn write_console(&self, channel: Channel, buf: &[u8]) -> Result<()> {
        match &self.console {
            Some(console) => write_shared(console, channel, buf),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for SinkSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let configured: Vec<Channel> = Channel::ALL
            .iter()
            .copied()
            .filter(|c| self.has_sink(*c))
            .collect();
        f.debug_struct("SinkSet")
            .field("console", &self.has_console())
            .field("sinks", &configured)
            .finish()
    }
}

fn write_shared(sink: &SharedSink, channel: Channel, buf: &[u8]) -> Result<()> {
    let mut sink = sink.lock();
    write_to(&mut **sink, channel, buf)
}

/// Write and flush `buf` on a single sink with panic isolation
pub fn write_to(sink: &mut dyn Sink, channel: Channel, buf: &[u8]) -> Result<()> {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        sink.write(channel, buf)?;
        sink.flush()
    }));

    match outcome {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(LoggerError::sink_write(channel, sink.name(), e)),
        Err(panic_info) => Err(LoggerError::sink_panicked(
            channel,
            sink.name(),
            panic_message(panic_info.as_ref()),
        )),
    }
}

pub(crate) fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;

    struct PanickingSink;

    impl Sink for PanickingSink {
        fn write(&mut self, _channel: Channel, _buf: &[u8]) -> io::Result<()> {
            panic!("sink exploded");
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    struct BrokenSink;

    impl Sink for BrokenSink {
        fn write(&mut self, _channel: Channel, _buf: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    #[test]
    fn test_fanout_to_console_and_channel() {
        let console = MemorySink::new();
        let info = MemorySink::new();
        let mut set = SinkSet::new();
        set.set_console(Some(Box::new(console.clone())));
        set.set_sink(Channel::Info, Box::new(info.clone()));

        set.write(Channel::Info, b"a\n").unwrap();
        set.write(Channel::Error, b"b\n").unwrap();

        assert_eq!(info.contents(), b"a\n");
        assert_eq!(console.contents(), b"a\nb\n");
    }

    #[test]
    fn test_write_error_is_typed() {
        let mut set = SinkSet::new();
        set.set_sink(Channel::Warning, Box::new(BrokenSink));
        let err = set.write(Channel::Warning, b"x").unwrap_err();
        assert!(matches!(err, LoggerError::SinkWrite { channel: Channel::Warning, .. }));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_panic_is_isolated() {
        let console = MemorySink::new();
        let mut set = SinkSet::new();
        set.set_console(Some(Box::new(PanickingSink)));
        set.set_sink(Channel::Raw, Box::new(console.clone()));

        let err = set.write(Channel::Raw, b"still delivered").unwrap_err();
        assert!(matches!(err, LoggerError::SinkPanicked { .. }));
        assert!(err.to_string().contains("sink exploded"));
        assert_eq!(console.contents(), b"still delivered");
    }
}
