//! Standard output sink

use crate::core::Sink;
use std::io::{self, Write};

/// Writes rendered lines to the process's standard output.
///
/// The worker owns one of these when stdout output is enabled and writes
/// to it before any registered sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for StdoutSink {
    fn emit(&mut self, rendered: &[u8]) -> io::Result<()> {
        io::stdout().lock().write_all(rendered)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }

    fn name(&self) -> &str {
        "stdout"
    }
}
