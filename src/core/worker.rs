//! Consumer side of the logging pipeline
//!
//! A single thread per logger drains the queue in order, encodes each record
//! and fans the bytes out to stdout and every registered sink. It exits once
//! the queue is closed and empty.

use super::encoder::{Encoder, ServiceFields};
use super::error::{LoggerError, Result};
use super::pipeline::Shared;
use super::record::Record;
use super::sink::{SharedSink, Sink};
use super::timestamp::TimestampFormat;
use crate::sinks::StdoutSink;
use chrono::Utc;
use crossbeam_channel::{bounded, Receiver};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Join handle plus an exit signal any number of threads can wait on.
pub(crate) struct WorkerHandle {
    pub(crate) thread: JoinHandle<()>,
    pub(crate) finished: Receiver<()>,
}

pub(crate) struct Worker {
    shared: Arc<Shared>,
    receiver: Receiver<Record>,
    encoder: Encoder,
    stdout: Option<StdoutSink>,
}

impl Worker {
    pub(crate) fn new(
        shared: Arc<Shared>,
        receiver: Receiver<Record>,
        timestamp_format: TimestampFormat,
        write_stdout: bool,
    ) -> Self {
        Self {
            shared,
            receiver,
            encoder: Encoder::new(timestamp_format),
            stdout: write_stdout.then(StdoutSink::new),
        }
    }

    pub(crate) fn spawn(self) -> Result<WorkerHandle> {
        let name = format!("log-worker-{}", self.shared.module.replace('\0', ""));
        // Nothing is ever sent; the channel disconnects when the worker exits.
        let (exited, finished) = bounded::<()>(0);
        let thread = thread::Builder::new()
            .name(name)
            .spawn(move || {
                let _exited = exited;
                self.run();
            })
            .map_err(|e| LoggerError::worker(e.to_string()))?;
        Ok(WorkerHandle { thread, finished })
    }

    fn run(mut self) {
        while let Ok(record) = self.receiver.recv() {
            self.process(record);

            // Queue momentarily idle: push buffered sink output out.
            if self.receiver.is_empty() {
                self.flush_all();
            }
        }
        self.flush_all();
    }

    fn process(&mut self, record: Record) {
        let shared = &*self.shared;

        // The threshold may have been raised after this record was queued.
        if !shared.enabled(record.level) {
            shared.metrics.record_filtered();
            shared.records.release(record);
            return;
        }

        let module_id = shared.module_id.read().clone();
        let fields = ServiceFields {
            service: &shared.module,
            service_id: module_id.as_deref(),
        };

        let mut buffer = shared.buffers.acquire();
        let lines = self.encoder.encode(
            &record,
            &fields,
            shared.split_length,
            &Utc::now(),
            &mut buffer,
        );

        Self::fan_out(self.stdout.as_mut(), shared, &buffer);
        shared.metrics.record_written(lines);

        shared.buffers.release(buffer);
        shared.records.release(record);
    }

    /// Best-effort delivery: a failing or panicking sink is counted and skipped.
    fn fan_out(stdout: Option<&mut StdoutSink>, shared: &Shared, rendered: &[u8]) {
        if let Some(stdout) = stdout {
            if stdout.emit(rendered).is_err() {
                shared.metrics.record_sink_error();
            }
        }

        let sinks = shared.sinks.snapshot();
        for (idx, sink) in sinks.iter().enumerate() {
            let result = catch_unwind(AssertUnwindSafe(|| sink.lock().emit(rendered)));
            match result {
                Ok(Ok(())) => {}
                Ok(Err(_)) => {
                    shared.metrics.record_sink_error();
                }
                Err(_) => {
                    shared.metrics.record_sink_error();
                    eprintln!(
                        "[LOGGER CRITICAL] Sink #{} panicked. Other sinks continue to function.",
                        idx
                    );
                }
            }
        }
    }

    fn flush_all(&mut self) {
        if let Some(stdout) = self.stdout.as_mut() {
            let _ = stdout.flush();
        }
        // Errors here surface through an explicit `Logger::flush`.
        let _ = flush_sinks(&self.shared.sinks.snapshot());
    }
}

/// Flush every sink, returning the first error after trying them all.
pub(crate) fn flush_sinks(sinks: &[SharedSink]) -> Result<()> {
    let mut first_error = None;
    for sink in sinks {
        let result = catch_unwind(AssertUnwindSafe(|| sink.lock().flush()));
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                first_error.get_or_insert(LoggerError::io_operation(
                    "flushing sink",
                    sink.lock().name().to_string(),
                    e,
                ));
            }
            Err(_) => {
                eprintln!("[LOGGER CRITICAL] Sink panicked during flush.");
            }
        }
    }
    first_error.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DropNotice, LogLevel, LoggerConfig};
    use crate::sinks::MemorySink;
    use crossbeam_channel::RecvTimeoutError;
    use std::io;
    use std::time::Duration;

    struct FailingSink;

    impl Sink for FailingSink {
        fn emit(&mut self, _rendered: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct PanickingSink;

    impl Sink for PanickingSink {
        fn emit(&mut self, _rendered: &[u8]) -> io::Result<()> {
            panic!("sink exploded");
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    fn start(config: LoggerConfig) -> (Arc<Shared>, JoinHandle<()>) {
        let (shared, receiver) = Shared::new(&config, None);
        let handle = Worker::new(Arc::clone(&shared), receiver, config.timestamp_format, false)
            .spawn()
            .unwrap();
        (shared, handle.thread)
    }

    fn config() -> LoggerConfig {
        LoggerConfig {
            write_stdout: false,
            drop_notice: DropNotice::Silent,
            min_level: LogLevel::Debug,
            ..LoggerConfig::new("worker")
        }
    }

    #[test]
    fn test_drains_before_exit() {
        let (shared, handle) = start(config());
        let capture = MemorySink::new();
        shared.sinks.push(Box::new(capture.clone()));

        for i in 0..100 {
            shared.submit(LogLevel::Info, i, None);
        }
        shared.close();
        handle.join().unwrap();

        assert_eq!(capture.lines().len(), 100);
        assert_eq!(shared.metrics.written_count(), 100);
        // Every record and buffer made it back to its pool.
        assert_eq!(shared.records.stats().released, 100);
        assert_eq!(
            shared.buffers.stats().acquired,
            shared.buffers.stats().released
        );
    }

    #[test]
    fn test_failing_sinks_do_not_block_others() {
        let (shared, handle) = start(config());
        let capture = MemorySink::new();
        shared.sinks.push(Box::new(FailingSink));
        shared.sinks.push(Box::new(PanickingSink));
        shared.sinks.push(Box::new(capture.clone()));

        shared.submit(LogLevel::Warning, "first", None);
        shared.submit(LogLevel::Warning, "second", None);
        shared.close();
        handle.join().unwrap();

        let values = capture.json_lines().unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[1]["message"], "second");
        assert_eq!(shared.metrics.sink_errors(), 4);
    }

    #[test]
    fn test_threshold_rechecked_at_dequeue() {
        let (shared, receiver) = Shared::new(&config(), None);
        let capture = MemorySink::new();
        shared.sinks.push(Box::new(capture.clone()));

        // Queue while everything is enabled, then raise the bar before the worker starts.
        shared.submit(LogLevel::Debug, "debug", None);
        shared.submit(LogLevel::Error, "error", None);
        shared.set_min_level(LogLevel::Error);

        let handle = Worker::new(Arc::clone(&shared), receiver, TimestampFormat::default(), false)
            .spawn()
            .unwrap();
        shared.close();
        handle.thread.join().unwrap();

        let values = capture.json_lines().unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0]["message"], "error");
        assert_eq!(shared.metrics.filtered_count(), 1);
    }

    #[test]
    fn test_exit_signal_disconnects_after_drain() {
        let (shared, receiver) = Shared::new(&config(), None);
        let capture = MemorySink::new();
        shared.sinks.push(Box::new(capture.clone()));
        let handle = Worker::new(Arc::clone(&shared), receiver, TimestampFormat::default(), false)
            .spawn()
            .unwrap();

        shared.submit(LogLevel::Info, "last words", None);
        assert_eq!(
            handle.finished.recv_timeout(Duration::from_millis(20)),
            Err(RecvTimeoutError::Timeout)
        );
        shared.close();

        // Only a disconnect ever arrives, and only once the queue is drained.
        assert!(handle.finished.recv().is_err());
        assert_eq!(capture.lines().len(), 1);
        handle.thread.join().unwrap();
    }

    #[test]
    fn test_flush_sinks_reports_first_error() {
        let sinks: Vec<SharedSink> = vec![
            Arc::new(parking_lot::Mutex::new(Box::new(MemorySink::new()) as Box<dyn Sink>)),
            Arc::new(parking_lot::Mutex::new(Box::new(FailingSink) as Box<dyn Sink>)),
        ];
        let err = flush_sinks(&sinks).unwrap_err();
        assert!(err.to_string().contains("failing"));
    }
}
