//! Main logger implementation

use super::{
    config::LoggerConfig,
    error::Result,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    overflow_policy::{DropNotice, OverflowCallback},
    pipeline::Shared,
    pool::PoolStats,
    sink::Sink,
    timestamp::TimestampFormat,
    worker::{flush_sinks, Worker},
};
use crate::adapters::{LevelWriter, LineLogger};
use crate::sinks::WriterSink;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use parking_lot::Mutex;
use std::fmt;
use std::io::Write;
use std::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;

/// Default shutdown timeout for logger cleanup (5 seconds)
///
/// This timeout is used when the logger is dropped without explicit shutdown.
/// For custom timeout control, use the `shutdown()` method instead.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Asynchronous JSON-line logger.
///
/// Emit calls format the message into a pooled record and hand it to a
/// bounded queue without blocking. A dedicated worker thread encodes each
/// record and writes it to stdout and every registered sink.
///
/// Share a logger between threads with `Arc<Logger>`; every method takes
/// `&self`.
pub struct Logger {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
    worker_id: ThreadId,
    /// Disconnects once the worker thread has returned.
    finished: Receiver<()>,
    detached: AtomicBool,
}

impl Logger {
    /// Create a logger for `module`, configured from `LOGLEVEL` and `LOGSPLITLENGTH`.
    ///
    /// # Panics
    ///
    /// Panics if the worker thread cannot be spawned.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        match Self::with_config(LoggerConfig::from_env(module)) {
            Ok(logger) => logger,
            Err(e) => panic!("failed to start logger: {}", e),
        }
    }

    pub fn with_config(config: LoggerConfig) -> Result<Self> {
        Self::start(config, Vec::new(), None)
    }

    fn start(
        config: LoggerConfig,
        sinks: Vec<Box<dyn Sink>>,
        on_overflow: Option<OverflowCallback>,
    ) -> Result<Self> {
        config.validate()?;

        let (shared, receiver) = Shared::new(&config, on_overflow);
        for sink in sinks {
            shared.sinks.push(sink);
        }

        let handle = Worker::new(
            Arc::clone(&shared),
            receiver,
            config.timestamp_format,
            config.write_stdout,
        )
        .spawn()?;

        Ok(Self {
            shared,
            worker_id: handle.thread.thread().id(),
            worker: Mutex::new(Some(handle.thread)),
            finished: handle.finished,
            detached: AtomicBool::new(false),
        })
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_async_logger::prelude::*;
    ///
    /// let logger = Logger::builder("billing")
    ///     .min_level(LogLevel::Debug)
    ///     .queue_capacity(4096)
    ///     .stdout(false)
    ///     .build()
    ///     .unwrap();
    /// ```
    #[must_use]
    pub fn builder(module: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(module)
    }

    /// Submit a message at `level`.
    ///
    /// Returns immediately. Below-threshold messages cost one atomic load.
    /// When the queue is full the message is dropped and counted.
    #[track_caller]
    #[inline]
    pub fn log(&self, level: LogLevel, message: impl fmt::Display) {
        self.shared.submit(level, message, Some(Location::caller()));
    }

    #[track_caller]
    #[inline]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(LogLevel::Debug, message);
    }

    #[track_caller]
    #[inline]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(LogLevel::Info, message);
    }

    #[track_caller]
    #[inline]
    pub fn warning(&self, message: impl fmt::Display) {
        self.log(LogLevel::Warning, message);
    }

    #[track_caller]
    #[inline]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(LogLevel::Error, message);
    }

    /// Whether a message at `level` would currently be accepted.
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.shared.enabled(level)
    }

    /// Change the threshold. Takes effect for new calls immediately and for
    /// already-queued records when the worker dequeues them.
    pub fn set_min_level(&self, level: LogLevel) {
        self.shared.set_min_level(level);
    }

    pub fn min_level(&self) -> LogLevel {
        self.shared.min_level()
    }

    pub fn module(&self) -> &str {
        &self.shared.module
    }

    /// Set the `service_id` field; an empty id removes it.
    pub fn set_module_id(&self, id: impl AsRef<str>) {
        self.shared.set_module_id(Some(id.as_ref()));
    }

    pub fn module_id(&self) -> Option<String> {
        self.shared.module_id.read().as_deref().map(str::to_string)
    }

    /// Register a byte-stream writer to receive every line after stdout.
    ///
    /// Safe to call from any thread while the logger is running; the worker
    /// picks the writer up from its next record on.
    pub fn add_writer<W: Write + Send + 'static>(&self, writer: W) {
        self.add_sink(WriterSink::new(writer));
    }

    pub fn add_sink<S: Sink + 'static>(&self, sink: S) {
        self.shared.sinks.push(Box::new(sink));
    }

    pub fn sink_count(&self) -> usize {
        self.shared.sinks.len()
    }

    /// An `io::Write` handle that logs each complete line at `level`.
    pub fn level_writer(&self, level: LogLevel) -> LevelWriter {
        LevelWriter::new(Arc::clone(&self.shared), level)
    }

    pub fn debug_writer(&self) -> LevelWriter {
        self.level_writer(LogLevel::Debug)
    }

    pub fn info_writer(&self) -> LevelWriter {
        self.level_writer(LogLevel::Info)
    }

    pub fn warning_writer(&self) -> LevelWriter {
        self.level_writer(LogLevel::Warning)
    }

    pub fn error_writer(&self) -> LevelWriter {
        self.level_writer(LogLevel::Error)
    }

    /// A line logger bound to `level` that prefixes every message.
    pub fn line_logger(&self, level: LogLevel, prefix: impl Into<String>) -> LineLogger {
        LineLogger::new(Arc::clone(&self.shared), level, prefix)
    }

    pub fn debug_logger(&self, prefix: impl Into<String>) -> LineLogger {
        self.line_logger(LogLevel::Debug, prefix)
    }

    pub fn info_logger(&self, prefix: impl Into<String>) -> LineLogger {
        self.line_logger(LogLevel::Info, prefix)
    }

    pub fn warning_logger(&self, prefix: impl Into<String>) -> LineLogger {
        self.line_logger(LogLevel::Warning, prefix)
    }

    pub fn error_logger(&self, prefix: impl Into<String>) -> LineLogger {
        self.line_logger(LogLevel::Error, prefix)
    }

    /// Get the logger metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use rust_async_logger::Logger;
    ///
    /// let logger = Logger::builder("svc").stdout(false).build().unwrap();
    /// logger.info("hello");
    /// logger.stop_sync();
    ///
    /// let metrics = logger.metrics();
    /// assert_eq!(metrics.written_count(), 1);
    /// assert_eq!(metrics.dropped_count(), 0);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    /// Get the number of dropped logs
    pub fn dropped_count(&self) -> u64 {
        self.shared.metrics.dropped_count()
    }

    pub fn record_pool_stats(&self) -> PoolStats {
        self.shared.records.stats()
    }

    pub fn buffer_pool_stats(&self) -> PoolStats {
        self.shared.buffers.stats()
    }

    /// Records waiting in the queue right now.
    pub fn queue_len(&self) -> usize {
        self.shared.queue_len()
    }

    pub fn queue_capacity(&self) -> usize {
        self.shared.queue_capacity()
    }

    /// Flush every registered sink from the calling thread.
    pub fn flush(&self) -> Result<()> {
        flush_sinks(&self.shared.sinks.snapshot())
    }

    /// `true` until one of the stop methods has closed the queue.
    pub fn is_running(&self) -> bool {
        self.shared.is_open()
    }

    /// Close the queue without waiting.
    ///
    /// The worker keeps draining in the background; records still queued when
    /// the process exits may be lost. Calling it again is a no-op.
    pub fn stop(&self) {
        self.shared.close();
    }

    /// Close the queue and block until the worker has written everything
    /// queued before this call and exited.
    ///
    /// This is the way to guarantee a full flush before process exit. Every
    /// caller blocks until the drain completes, including concurrent ones.
    /// Called from inside a sink it only closes the queue.
    pub fn stop_sync(&self) {
        self.shared.close();
        self.wait_finished(None);
    }

    /// Gracefully shutdown the logger with a custom timeout
    ///
    /// Closes the queue and waits at most `timeout` for the worker to drain.
    /// If it does not finish in time the worker keeps running and a later
    /// `stop_sync` can still wait for it.
    ///
    /// # Returns
    ///
    /// `true` if the worker exited within the timeout (or had already exited)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rust_async_logger::Logger;
    /// use std::time::Duration;
    ///
    /// let logger = Logger::new("svc");
    /// logger.info("Important message");
    ///
    /// if !logger.shutdown(Duration::from_secs(10)) {
    ///     eprintln!("Warning: Logger shutdown timed out");
    /// }
    /// ```
    pub fn shutdown(&self, timeout: Duration) -> bool {
        self.shared.close();
        self.wait_finished(Some(timeout))
    }

    /// Close the queue and let the worker finish on its own.
    ///
    /// Dropping the logger afterwards does not wait for the drain.
    pub(crate) fn detach(&self) {
        self.shared.close();
        self.detached.store(true, Ordering::Release);
        // Dropping the handle detaches the thread.
        drop(self.worker.lock().take());
    }

    fn wait_finished(&self, timeout: Option<Duration>) -> bool {
        // A sink calling back into the logger would otherwise wait on itself.
        if thread::current().id() == self.worker_id {
            return false;
        }

        let done = match timeout {
            None => self.finished.recv().is_err(),
            Some(timeout) => matches!(
                self.finished.recv_timeout(timeout),
                Err(RecvTimeoutError::Disconnected)
            ),
        };
        if done {
            self.reap();
        }
        done
    }

    fn reap(&self) {
        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.join() {
                eprintln!("[LOGGER ERROR] Log worker thread panicked during shutdown: {:?}", e);
            }
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("module", &self.shared.module)
            .field("min_level", &self.min_level())
            .field("running", &self.is_running())
            .field("sinks", &self.sink_count())
            .finish()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.detached.load(Ordering::Acquire) {
            self.shared.close();
        } else if !self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT) {
            eprintln!(
                "[LOGGER WARNING] Log worker did not finish within {:?}. Some logs may be lost.",
                DEFAULT_SHUTDOWN_TIMEOUT
            );
        }

        let dropped = self.shared.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger '{}' shutting down with {} dropped logs (drop rate: {:.2}%)",
                self.shared.module,
                dropped,
                self.shared.metrics.drop_rate()
            );
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_async_logger::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder("gateway")
///     .min_level(LogLevel::Warning)
///     .split_length(4096)
///     .module_id("node-1")
///     .stdout(false)
///     .sink(MemorySink::new())
///     .on_overflow(Arc::new(|count: u64| {
///         eprintln!("ALERT: {} logs dropped", count);
///     }))
///     .build()
///     .unwrap();
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    sinks: Vec<Box<dyn Sink>>,
    on_overflow: Option<OverflowCallback>,
}

impl LoggerBuilder {
    /// Create a new builder with default values (the environment is not consulted)
    pub fn new(module: impl Into<String>) -> Self {
        Self::from_config(LoggerConfig::new(module))
    }

    pub fn from_config(config: LoggerConfig) -> Self {
        Self {
            config,
            sinks: Vec::new(),
            on_overflow: None,
        }
    }

    /// Start from `LOGLEVEL` / `LOGSPLITLENGTH`
    pub fn from_env(module: impl Into<String>) -> Self {
        Self::from_config(LoggerConfig::from_env(module))
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.config.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn module_id(mut self, id: impl Into<String>) -> Self {
        self.config.module_id = Some(id.into());
        self
    }

    /// Maximum message bytes per JSON object before splitting
    #[must_use = "builder methods return a new value"]
    pub fn split_length(mut self, length: usize) -> Self {
        self.config.split_length = length;
        self
    }

    /// Number of records the queue holds before new ones are dropped
    #[must_use = "builder methods return a new value"]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.config.timestamp_format = format;
        self
    }

    /// Whether lines are also written to standard output (default `true`)
    #[must_use = "builder methods return a new value"]
    pub fn stdout(mut self, enabled: bool) -> Self {
        self.config.write_stdout = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn capture_source(mut self, enabled: bool) -> Self {
        self.config.capture_source = enabled;
        self
    }

    /// Disable to allocate fresh records and buffers on every message
    #[must_use = "builder methods return a new value"]
    pub fn pooling(mut self, enabled: bool) -> Self {
        self.config.pooling = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn drop_notice(mut self, notice: DropNotice) -> Self {
        self.config.drop_notice = notice;
        self
    }

    /// Add a sink
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn writer<W: Write + Send + 'static>(self, writer: W) -> Self {
        self.sink(WriterSink::new(writer))
    }

    /// Set a callback for overflow notifications
    ///
    /// The callback is invoked on the producer thread after each dropped
    /// message, with the total count of dropped logs.
    #[must_use = "builder methods return a new value"]
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Validate the configuration and start the worker
    pub fn build(self) -> Result<Logger> {
        Logger::start(self.config, self.sinks, self.on_overflow)
    }
}
