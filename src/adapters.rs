//! Fixed-level adapters for code that expects a plain writer or a line logger.
//!
//! Neither adapter records a source location: the caller of `write` is
//! usually library code with nothing useful to report.

use crate::core::pipeline::Shared;
use crate::core::LogLevel;
use std::fmt;
use std::io;
use std::sync::Arc;

/// `io::Write` handle that logs each complete line at one level.
///
/// Bytes are buffered until a newline arrives; each line becomes one message
/// with the newline (and a preceding `\r`) stripped. A partial line is logged
/// on [`flush`](io::Write::flush) or when the writer is dropped. Invalid UTF-8
/// is replaced with `U+FFFD`.
///
/// ```
/// use rust_async_logger::{Logger, MemorySink};
/// use std::io::Write;
///
/// let capture = MemorySink::new();
/// let logger = Logger::builder("svc").stdout(false).sink(capture.clone()).build().unwrap();
///
/// let mut out = logger.error_writer();
/// writeln!(out, "disk {} is {}% full", "sda1", 97).unwrap();
/// logger.stop_sync();
///
/// let values = capture.json_lines().unwrap();
/// assert_eq!(values[0]["level"], "ERROR");
/// assert_eq!(values[0]["message"], "disk sda1 is 97% full");
/// ```
pub struct LevelWriter {
    shared: Arc<Shared>,
    level: LogLevel,
    pending: Vec<u8>,
}

impl LevelWriter {
    pub(crate) fn new(shared: Arc<Shared>, level: LogLevel) -> Self {
        Self {
            shared,
            level,
            pending: Vec::new(),
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    fn emit(&self, line: &[u8]) {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        self.shared
            .submit(self.level, String::from_utf8_lossy(line), None);
    }
}

impl io::Write for LevelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut rest = buf;
        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            if self.pending.is_empty() {
                self.emit(&rest[..pos]);
            } else {
                self.pending.extend_from_slice(&rest[..pos]);
                self.emit(&self.pending);
                self.pending.clear();
            }
            rest = &rest[pos + 1..];
        }
        self.pending.extend_from_slice(rest);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            self.emit(&self.pending);
            self.pending.clear();
        }
        Ok(())
    }
}

impl Clone for LevelWriter {
    /// The clone starts with an empty line buffer.
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.shared), self.level)
    }
}

impl Drop for LevelWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

impl fmt::Debug for LevelWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelWriter")
            .field("service", &self.shared.module)
            .field("level", &self.level)
            .field("pending", &self.pending.len())
            .finish()
    }
}

/// Line logger bound to one level, prepending a fixed prefix to every message.
#[derive(Clone)]
pub struct LineLogger {
    shared: Arc<Shared>,
    level: LogLevel,
    prefix: String,
}

impl LineLogger {
    pub(crate) fn new(shared: Arc<Shared>, level: LogLevel, prefix: impl Into<String>) -> Self {
        Self {
            shared,
            level,
            prefix: prefix.into(),
        }
    }

    /// Log `message` after the prefix.
    pub fn print(&self, message: impl fmt::Display) {
        self.shared
            .submit(self.level, format_args!("{}{}", self.prefix, message), None);
    }

    /// Same as [`print`](Self::print) with one trailing newline removed.
    pub fn println(&self, message: impl fmt::Display) {
        let text = message.to_string();
        let text = text.strip_suffix('\n').unwrap_or(&text);
        self.print(text);
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    /// A writer at the same level; the prefix does not apply to it.
    pub fn writer(&self) -> LevelWriter {
        LevelWriter::new(Arc::clone(&self.shared), self.level)
    }
}

impl fmt::Debug for LineLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineLogger")
            .field("service", &self.shared.module)
            .field("level", &self.level)
            .field("prefix", &self.prefix)
            .finish()
    }
}
