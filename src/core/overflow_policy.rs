//! Queue overflow handling
//!
//! Submission never blocks. When the queue is full the message is dropped,
//! its record goes back to the pool, and a notice is written straight to
//! stderr. The notice path does not touch the pipeline and does not allocate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

/// Line written to stderr for each dropped message.
pub const DROP_NOTICE: &[u8] = b"[LOGGER WARNING] channel is full. Log message dropped.\n";

/// Where the per-drop notice goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropNotice {
    /// Write [`DROP_NOTICE`] to stderr for every dropped message
    #[default]
    Stderr,

    /// Count drops in the metrics only
    Silent,
}

impl DropNotice {
    #[inline]
    pub(crate) fn emit(&self) {
        if let DropNotice::Stderr = self {
            let _ = io::stderr().write_all(DROP_NOTICE);
        }
    }
}

impl fmt::Display for DropNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropNotice::Stderr => write!(f, "Stderr"),
            DropNotice::Silent => write!(f, "Silent"),
        }
    }
}

/// Callback type for overflow notifications
///
/// Called after each dropped message with the total number dropped so far.
/// It runs on the producer thread that hit the full queue and must not log
/// through the same logger.
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;
