//! Logger metrics for observability
//!
//! Counters for every fate a submitted message can meet: written, dropped
//! at a full queue, filtered by the worker's level re-check, or rejected
//! because the logger had already been stopped.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use rust_async_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_dropped();
/// metrics.record_written(2);
///
/// assert_eq!(metrics.dropped_count(), 1);
/// assert_eq!(metrics.written_count(), 1);
/// assert_eq!(metrics.lines_written(), 2);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records accepted by the queue
    enqueued: AtomicU64,

    /// Records the worker encoded and fanned out
    written: AtomicU64,

    /// Physical JSON lines produced (a split record yields several)
    lines_written: AtomicU64,

    /// Records dropped because the queue was full
    dropped: AtomicU64,

    /// Records discarded by the worker because the threshold was raised after enqueue
    filtered: AtomicU64,

    /// Records submitted after the logger was stopped
    rejected_after_stop: AtomicU64,

    /// Individual sink write failures (errors or panics)
    sink_errors: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            written: AtomicU64::new(0),
            lines_written: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            rejected_after_stop: AtomicU64::new(0),
            sink_errors: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued_count(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn written_count(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn lines_written(&self) -> u64 {
        self.lines_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered_count(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected_after_stop(&self) -> u64 {
        self.rejected_after_stop.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_errors(&self) -> u64 {
        self.sink_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::Relaxed)
    }

    /// Record one written record that produced `lines` output lines
    #[inline]
    pub fn record_written(&self, lines: usize) -> u64 {
        self.lines_written.fetch_add(lines as u64, Ordering::Relaxed);
        self.written.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a dropped message, returning the previous drop total
    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected_after_stop(&self) -> u64 {
        self.rejected_after_stop.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_error(&self) -> u64 {
        self.sink_errors.fetch_add(1, Ordering::Relaxed)
    }

    /// Get drop rate as a percentage (0.0 - 100.0) of all submissions
    ///
    /// Returns 0.0 if nothing has been submitted.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = self.enqueued_count() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.enqueued.store(0, Ordering::Relaxed);
        self.written.store(0, Ordering::Relaxed);
        self.lines_written.store(0, Ordering::Relaxed);
        self.dropped.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.rejected_after_stop.store(0, Ordering::Relaxed);
        self.sink_errors.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            enqueued: AtomicU64::new(self.enqueued_count()),
            written: AtomicU64::new(self.written_count()),
            lines_written: AtomicU64::new(self.lines_written()),
            dropped: AtomicU64::new(self.dropped_count()),
            filtered: AtomicU64::new(self.filtered_count()),
            rejected_after_stop: AtomicU64::new(self.rejected_after_stop()),
            sink_errors: AtomicU64::new(self.sink_errors()),
        }
    }
}
