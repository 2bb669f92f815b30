//! In-memory sink
//!
//! Cloning a [`MemorySink`] yields another handle to the same buffer, so a
//! caller can hand one handle to a logger and inspect the other.

use crate::core::{Channel, Sink};
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far
    pub fn contents(&self) -> Vec<u8> {
        self.buf.lock().clone()
    }

    pub fn contents_string(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    /// Written content split into lines, without terminators
    pub fn lines(&self) -> Vec<String> {
        self.contents_string().lines().map(str::to_owned).collect()
    }

    /// Remove and return everything written so far
    pub fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.buf.lock())
    }

    pub fn len(&self) -> usize {
        self.buf.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.lock().is_empty()
    }
}

impl Sink for MemorySink {
    fn write(&mut self, _channel: Channel, buf: &[u8]) -> io::Result<()> {
        self.buf.lock().extend_from_slice(buf);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
