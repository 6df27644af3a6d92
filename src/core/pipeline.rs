//! Producer side of the logging pipeline
//!
//! Many producers, one consumer. Producers check the threshold, fill a pooled
//! record and `try_send` it into a bounded channel. A full channel sheds the
//! message instead of blocking the caller.

use super::config::LoggerConfig;
use super::log_level::LogLevel;
use super::metrics::LoggerMetrics;
use super::overflow_policy::{DropNotice, OverflowCallback};
use super::pool::{BufferPool, MessagePool};
use super::record::Record;
use super::sink::SinkSet;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::RwLock;
use std::fmt;
use std::panic::Location;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// State shared by the facade, its adapters and the worker thread.
pub(crate) struct Shared {
    pub(crate) module: String,
    pub(crate) module_id: RwLock<Option<Arc<str>>>,
    min_level: AtomicU8,
    pub(crate) split_length: usize,
    pub(crate) capture_source: bool,
    sender: RwLock<Option<Sender<Record>>>,
    capacity: usize,
    pub(crate) records: MessagePool,
    pub(crate) buffers: BufferPool,
    pub(crate) sinks: SinkSet,
    pub(crate) metrics: LoggerMetrics,
    drop_notice: DropNotice,
    on_overflow: Option<OverflowCallback>,
}

impl Shared {
    /// Build the shared state and the receiving end of its queue.
    pub(crate) fn new(
        config: &LoggerConfig,
        on_overflow: Option<OverflowCallback>,
    ) -> (Arc<Self>, Receiver<Record>) {
        let (sender, receiver) = bounded(config.queue_capacity);
        let shared = Arc::new(Self {
            module: config.module.clone(),
            module_id: RwLock::new(
                config
                    .module_id
                    .as_deref()
                    .filter(|id| !id.is_empty())
                    .map(Arc::from),
            ),
            min_level: AtomicU8::new(config.min_level.as_u8()),
            split_length: config.split_length,
            capture_source: config.capture_source,
            sender: RwLock::new(Some(sender)),
            capacity: config.queue_capacity,
            records: MessagePool::with_pooling(config.pooling),
            buffers: BufferPool::with_pooling(config.pooling),
            sinks: SinkSet::new(),
            metrics: LoggerMetrics::new(),
            drop_notice: config.drop_notice,
            on_overflow,
        });
        (shared, receiver)
    }

    #[inline]
    pub(crate) fn min_level(&self) -> LogLevel {
        LogLevel::from_u8(self.min_level.load(Ordering::Relaxed))
    }

    #[inline]
    pub(crate) fn set_min_level(&self, level: LogLevel) {
        self.min_level.store(level.as_u8(), Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level()
    }

    pub(crate) fn set_module_id(&self, id: Option<&str>) {
        *self.module_id.write() = id.filter(|id| !id.is_empty()).map(Arc::from);
    }

    /// Render and enqueue one message. Never blocks and never fails.
    ///
    /// Messages below the threshold return before a record is acquired.
    pub(crate) fn submit(
        &self,
        level: LogLevel,
        message: impl fmt::Display,
        location: Option<&'static Location<'static>>,
    ) {
        if !self.enabled(level) {
            return;
        }

        let location = location.filter(|_| self.capture_source);
        let mut record = self.records.acquire();
        record.fill(level, message, location);

        let sender = self.sender.read();
        let Some(sender) = sender.as_ref() else {
            self.records.release(record);
            self.metrics.record_rejected_after_stop();
            return;
        };

        match sender.try_send(record) {
            Ok(()) => {
                self.metrics.record_enqueued();
            }
            Err(TrySendError::Full(record)) => {
                self.records.release(record);
                self.handle_overflow();
            }
            Err(TrySendError::Disconnected(record)) => {
                self.records.release(record);
                self.metrics.record_rejected_after_stop();
            }
        }
    }

    /// Shed-load path: count, notify on the side channel, call back.
    fn handle_overflow(&self) {
        let dropped = self.metrics.record_dropped() + 1;
        self.drop_notice.emit();
        if let Some(ref callback) = self.on_overflow {
            callback(dropped);
        }
    }

    /// Close the queue. The worker drains what is left and exits.
    ///
    /// Returns `false` if it was already closed.
    pub(crate) fn close(&self) -> bool {
        self.sender.write().take().is_some()
    }

    pub(crate) fn is_open(&self) -> bool {
        self.sender.read().is_some()
    }

    pub(crate) fn queue_len(&self) -> usize {
        self.sender.read().as_ref().map_or(0, Sender::len)
    }

    pub(crate) fn queue_capacity(&self) -> usize {
        self.capacity
    }
}
