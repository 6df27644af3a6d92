//! JSON line encoder
//!
//! Renders one [`Record`] into one or more newline-terminated JSON objects:
//!
//! ```text
//! {"timestamp":"..","level":"INFO","message":"..","service":".."[,"service_id":".."][,"src_file":"..","src_line":N]}
//! ```
//!
//! Field order is fixed. Messages longer than the split length are carved into
//! several objects that share the timestamp, level, service and source fields.

use super::record::Record;
use super::timestamp::TimestampFormat;
use chrono::{DateTime, Utc};
use std::io::Write;

/// Default maximum message length (in bytes) per emitted object.
pub const DEFAULT_SPLIT_LENGTH: usize = 8000;

/// Per-logger fields stamped on every line.
#[derive(Debug, Clone, Copy)]
pub struct ServiceFields<'a> {
    pub service: &'a str,
    pub service_id: Option<&'a str>,
}

/// Worker-owned encoder; keeps the rendered timestamp as reusable scratch.
#[derive(Debug, Default)]
pub struct Encoder {
    timestamp_format: TimestampFormat,
    timestamp: Vec<u8>,
}

impl Encoder {
    pub fn new(timestamp_format: TimestampFormat) -> Self {
        Self {
            timestamp_format,
            timestamp: Vec::with_capacity(40),
        }
    }

    /// Append the JSON line(s) for `record` to `out` and return how many were written.
    pub fn encode(
        &mut self,
        record: &Record,
        fields: &ServiceFields<'_>,
        split_length: usize,
        now: &DateTime<Utc>,
        out: &mut Vec<u8>,
    ) -> usize {
        self.timestamp.clear();
        self.timestamp_format.write_to(now, &mut self.timestamp);

        let mut lines = 0;
        for chunk in split_message(&record.text, split_length) {
            self.write_line(record, fields, chunk, out);
            lines += 1;
        }
        lines
    }

    fn write_line(
        &self,
        record: &Record,
        fields: &ServiceFields<'_>,
        message: &str,
        out: &mut Vec<u8>,
    ) {
        out.extend_from_slice(b"{\"timestamp\":\"");
        out.extend_from_slice(&self.timestamp);
        out.extend_from_slice(b"\",\"level\":\"");
        out.extend_from_slice(record.level.to_str().as_bytes());
        out.extend_from_slice(b"\",\"message\":\"");
        escape_into(message, out);
        out.extend_from_slice(b"\",\"service\":\"");
        escape_into(fields.service, out);
        out.push(b'"');

        if let Some(id) = fields.service_id.filter(|id| !id.is_empty()) {
            out.extend_from_slice(b",\"service_id\":\"");
            escape_into(id, out);
            out.push(b'"');
        }

        if let (Some(file), Some(line)) = (record.src_file(), record.src_line()) {
            out.extend_from_slice(b",\"src_file\":\"");
            escape_into(file, out);
            out.extend_from_slice(b"\",\"src_line\":");
            // Writing into a Vec cannot fail.
            let _ = write!(out, "{}", line);
        }

        out.extend_from_slice(b"}\n");
    }
}

/// Escape `text` for a JSON string body.
///
/// Backslash and double quote are backslash-escaped; newline, carriage
/// return and tab become `\n`, `\r`, `\t`. Every other byte is copied as is.
pub fn escape_into(text: &str, out: &mut Vec<u8>) {
    let bytes = text.as_bytes();
    let mut start = 0;

    for (i, &byte) in bytes.iter().enumerate() {
        let escaped: &[u8] = match byte {
            b'"' => b"\\\"",
            b'\\' => b"\\\\",
            b'\n' => b"\\n",
            b'\r' => b"\\r",
            b'\t' => b"\\t",
            _ => continue,
        };
        out.extend_from_slice(&bytes[start..i]);
        out.extend_from_slice(escaped);
        start = i + 1;
    }

    out.extend_from_slice(&bytes[start..]);
}

/// Split `text` into chunks of at most `limit` bytes.
///
/// While the remainder is longer than `limit`, the chunk ends at the last
/// newline found at byte offset `<= limit` (the newline itself is consumed).
/// Without such a newline the cut is made at `limit`, moved back to the
/// previous UTF-8 character boundary so no chunk ends mid-character.
pub fn split_message(text: &str, limit: usize) -> SplitMessage<'_> {
    SplitMessage {
        rest: Some(text),
        limit: limit.max(1),
    }
}

/// Iterator returned by [`split_message`].
#[derive(Debug, Clone)]
pub struct SplitMessage<'a> {
    rest: Option<&'a str>,
    limit: usize,
}

impl<'a> Iterator for SplitMessage<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = self.rest?;
        if rest.len() <= self.limit {
            self.rest = None;
            return Some(rest);
        }

        let window = &rest.as_bytes()[..=self.limit];
        if let Some(newline) = window.iter().rposition(|&b| b == b'\n') {
            self.rest = Some(&rest[newline + 1..]);
            return Some(&rest[..newline]);
        }

        let cut = cut_point(rest, self.limit);
        self.rest = Some(&rest[cut..]);
        Some(&rest[..cut])
    }
}

/// Largest char boundary `<= limit`, or the first one past it when the
/// leading character alone is wider than `limit`.
fn cut_point(text: &str, limit: usize) -> usize {
    let mut cut = limit;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    if cut == 0 {
        cut = limit + 1;
        while !text.is_char_boundary(cut) {
            cut += 1;
        }
    }
    cut
}
