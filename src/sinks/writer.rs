//! Adapter turning any `io::Write` into a sink

use crate::core::Sink;
use std::io::{self, Write};

/// Wraps an arbitrary byte-stream writer (a socket, a pipe, a `Vec<u8>`).
pub struct WriterSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn emit(&mut self, rendered: &[u8]) -> io::Result<()> {
        self.writer.write_all(rendered)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    fn name(&self) -> &str {
        "writer"
    }
}
