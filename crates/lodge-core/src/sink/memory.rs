//! In-memory sink.

use std::io::{self, Write};

use super::Sink;

/// Named in-memory buffer. Useful for tests and for deferring persistence:
/// save into memory, decide later where the bytes go.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    name: String,
    buf: Vec<u8>,
    closed: bool,
}

impl MemorySink {
    pub fn new(name: impl Into<String>) -> Self {
        MemorySink {
            name: name.into(),
            buf: Vec::new(),
            closed: false,
        }
    }

    pub fn contents(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.closed {
            return Err(io::Error::new(io::ErrorKind::Other, "sink already closed"));
        }
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Sink for MemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }
}
