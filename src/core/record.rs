//! Message record carried through the pipeline

use super::log_level::LogLevel;
use super::pool::Recycle;
use std::fmt::{self, Write};
use std::panic::Location;

/// Marker appended when a `Display` impl reports an error mid-format.
pub const FORMAT_ERROR_MARKER: &str = "%!(FORMAT_ERROR)";

/// One in-flight log event.
///
/// Ownership moves producer → channel → worker → pool. The text buffer
/// keeps its capacity across recycles so a warm pool formats without
/// allocating.
#[derive(Debug, Default)]
pub struct Record {
    pub level: LogLevel,
    pub text: String,
    pub location: Option<&'static Location<'static>>,
}

impl Record {
    /// Stamp level and caller location and render `message` into the text buffer.
    pub fn fill(
        &mut self,
        level: LogLevel,
        message: impl fmt::Display,
        location: Option<&'static Location<'static>>,
    ) {
        self.level = level;
        self.location = location;
        self.text.clear();
        if write!(self.text, "{}", message).is_err() {
            self.text.push_str(FORMAT_ERROR_MARKER);
        }
    }

    /// Basename of the captured source file, if any.
    pub fn src_file(&self) -> Option<&'static str> {
        self.location.map(|loc| basename(loc.file()))
    }

    pub fn src_line(&self) -> Option<u32> {
        self.location.map(Location::line)
    }
}

impl Recycle for Record {
    fn recycle(&mut self) {
        self.text.clear();
        self.location = None;
        self.level = LogLevel::default();
    }
}

/// Strip directories from a `file!()`-style path, handling both separators.
fn basename(path: &str) -> &str {
    path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(path)
}
