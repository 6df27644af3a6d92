//! In-memory sink for capturing output

use crate::core::{Result, Sink};
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;

/// Collects rendered lines in a shared buffer.
///
/// Clones share the same buffer, so a clone can be handed to a logger and
/// the original kept for inspection.
///
/// # Example
///
/// ```
/// use rust_async_logger::{Logger, MemorySink};
///
/// let capture = MemorySink::new();
/// let logger = Logger::builder("svc-a")
///     .stdout(false)
///     .sink(capture.clone())
///     .build()
///     .unwrap();
///
/// logger.info("ready");
/// logger.stop_sync();
///
/// assert_eq!(capture.lines().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// Parse every captured line as a JSON object.
    pub fn json_lines(&self) -> Result<Vec<serde_json::Value>> {
        self.lines()
            .iter()
            .map(|line| serde_json::from_str(line).map_err(Into::into))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Sink for MemorySink {
    fn emit(&mut self, rendered: &[u8]) -> io::Result<()> {
        self.buffer.lock().extend_from_slice(rendered);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_buffer() {
        let capture = MemorySink::new();
        let mut handle = capture.clone();
        handle.emit(b"{\"message\":\"a\"}\n{\"message\":\"b\"}\n").unwrap();

        assert_eq!(capture.lines().len(), 2);
        let values = capture.json_lines().unwrap();
        assert_eq!(values[1]["message"], "b");

        capture.clear();
        assert!(handle.is_empty());
    }

    #[test]
    fn test_json_lines_reports_invalid_line() {
        let capture = MemorySink::new();
        capture.clone().emit(b"not json\n").unwrap();
        assert!(capture.json_lines().is_err());
    }
}
