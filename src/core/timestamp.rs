//! Timestamp formatting utilities
//!
//! Every emitted line carries a UTC RFC 3339 timestamp taken when the worker
//! writes the record. The precision of the fractional seconds is configurable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Timestamp precision for the `timestamp` field.
///
/// # Examples
///
/// ```
/// use rust_async_logger::core::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let datetime = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(
///     TimestampFormat::Rfc3339Millis.format(&datetime),
///     "2025-01-08T10:30:45.000Z"
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Nanosecond precision: `2025-01-08T10:30:45.123456789Z`
    #[default]
    Rfc3339Nanos,

    /// Microsecond precision: `2025-01-08T10:30:45.123456Z`
    Rfc3339Micros,

    /// Millisecond precision: `2025-01-08T10:30:45.123Z`
    Rfc3339Millis,
}

impl TimestampFormat {
    fn pattern(&self) -> &'static str {
        match self {
            TimestampFormat::Rfc3339Nanos => "%Y-%m-%dT%H:%M:%S%.9fZ",
            TimestampFormat::Rfc3339Micros => "%Y-%m-%dT%H:%M:%S%.6fZ",
            TimestampFormat::Rfc3339Millis => "%Y-%m-%dT%H:%M:%S%.3fZ",
        }
    }

    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        datetime.format(self.pattern()).to_string()
    }

    /// Render straight into an output buffer without an intermediate `String`.
    pub fn write_to(&self, datetime: &DateTime<Utc>, out: &mut Vec<u8>) {
        // Writing into a Vec cannot fail.
        let _ = write!(out, "{}", datetime.format(self.pattern()));
    }
}
