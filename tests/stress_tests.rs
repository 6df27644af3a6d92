//! Stress tests for the logging pipeline
//!
//! These tests verify:
//! - No loss or duplication with many concurrent producers
//! - Per-producer ordering survives contention
//! - Overload sheds exactly the messages the queue cannot hold
//! - Shutdown is idempotent and safe from several threads

use crossbeam_channel::{unbounded, Receiver, Sender};
use rust_async_logger::prelude::*;
use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Sink that blocks inside `emit` until the test releases it.
struct GatedSink {
    entered: Sender<()>,
    release: Receiver<()>,
    inner: MemorySink,
}

impl Sink for GatedSink {
    fn emit(&mut self, rendered: &[u8]) -> io::Result<()> {
        let _ = self.entered.send(());
        // Blocks until a release token arrives or the sender is dropped.
        let _ = self.release.recv();
        self.inner.emit(rendered)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "gated"
    }
}

fn parse_message(value: &serde_json::Value) -> (usize, usize) {
    let message = value["message"].as_str().expect("message is a string");
    let (thread_id, seq) = message
        .strip_prefix('t')
        .and_then(|rest| rest.split_once('-'))
        .expect("message shaped t<thread>-<seq>");
    (thread_id.parse().unwrap(), seq.parse().unwrap())
}

#[test]
fn test_concurrent_producers_no_loss() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 500;

    let capture = MemorySink::new();
    let logger = Arc::new(
        Logger::builder("stress")
            .stdout(false)
            .queue_capacity(THREADS * PER_THREAD)
            .sink(capture.clone())
            .build()
            .expect("Failed to build logger"),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger.info(format_args!("t{}-{}", t, i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("producer panicked");
    }
    logger.stop_sync();

    let values = capture.json_lines().expect("every line is valid JSON");
    assert_eq!(values.len(), THREADS * PER_THREAD);

    let unique: HashSet<(usize, usize)> = values.iter().map(parse_message).collect();
    assert_eq!(unique.len(), THREADS * PER_THREAD);

    // Each producer's messages arrive in submission order.
    let mut last_seen: HashMap<usize, usize> = HashMap::new();
    for (thread_id, seq) in values.iter().map(parse_message) {
        if let Some(prev) = last_seen.insert(thread_id, seq) {
            assert!(seq > prev, "thread {} went {} -> {}", thread_id, prev, seq);
        }
    }

    let metrics = logger.metrics();
    assert_eq!(metrics.dropped_count(), 0);
    assert_eq!(metrics.enqueued_count(), (THREADS * PER_THREAD) as u64);
    assert_eq!(metrics.written_count(), (THREADS * PER_THREAD) as u64);
}

#[test]
fn test_overload_sheds_exactly_the_excess() {
    const CAPACITY: usize = 16;
    const BURST: usize = CAPACITY + 25;

    let (entered_tx, entered_rx) = unbounded();
    let (release_tx, release_rx) = unbounded::<()>();
    let capture = MemorySink::new();
    let overflow_calls = Arc::new(AtomicU64::new(0));

    let logger = Logger::builder("overload")
        .stdout(false)
        .queue_capacity(CAPACITY)
        .drop_notice(DropNotice::Silent)
        .sink(GatedSink {
            entered: entered_tx,
            release: release_rx,
            inner: capture.clone(),
        })
        .on_overflow({
            let calls = Arc::clone(&overflow_calls);
            Arc::new(move |_total: u64| {
                calls.fetch_add(1, Ordering::Relaxed);
            })
        })
        .build()
        .expect("Failed to build logger");

    // Park the worker inside the sink with an empty queue.
    logger.info("in flight");
    entered_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("worker reached the sink");

    for i in 0..BURST {
        logger.info(format_args!("burst {}", i));
    }
    assert_eq!(logger.queue_len(), CAPACITY);

    drop(release_tx);
    logger.stop_sync();

    let metrics = logger.metrics();
    assert_eq!(metrics.written_count(), 1 + CAPACITY as u64);
    assert_eq!(metrics.dropped_count(), (BURST - CAPACITY) as u64);
    assert_eq!(overflow_calls.load(Ordering::Relaxed), (BURST - CAPACITY) as u64);

    // The survivors are the oldest messages of the burst.
    let values = capture.json_lines().unwrap();
    assert_eq!(values.len(), 1 + CAPACITY);
    assert_eq!(values[0]["message"], "in flight");
    assert_eq!(values[1]["message"], "burst 0");
    assert_eq!(values[CAPACITY]["message"], format!("burst {}", CAPACITY - 1));

    // Dropped records went back to the pool.
    let stats = logger.record_pool_stats();
    assert_eq!(stats.acquired, stats.released);
}

#[test]
fn test_concurrent_stop_is_safe() {
    let capture = MemorySink::new();
    let logger = Arc::new(
        Logger::builder("stopper")
            .stdout(false)
            .sink(capture.clone())
            .build()
            .unwrap(),
    );
    for i in 0..100 {
        logger.info(i);
    }

    let handles: Vec<_> = (0..4)
        .map(|n| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                if n % 2 == 0 {
                    logger.stop_sync();
                } else {
                    logger.stop();
                }
                logger.warning("after stop");
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    logger.stop_sync();
    assert!(logger.shutdown(Duration::from_millis(10)));

    assert_eq!(capture.lines().len(), 100);
    assert_eq!(logger.metrics().rejected_after_stop(), 4);
}

#[test]
fn test_every_stop_sync_caller_waits_for_drain() {
    const QUEUED: usize = 10;

    let (entered_tx, entered_rx) = unbounded();
    let (release_tx, release_rx) = unbounded::<()>();
    let capture = MemorySink::new();
    let logger = Arc::new(
        Logger::builder("waiters")
            .stdout(false)
            .sink(GatedSink {
                entered: entered_tx,
                release: release_rx,
                inner: capture.clone(),
            })
            .build()
            .unwrap(),
    );

    for i in 0..QUEUED {
        logger.info(i);
    }
    entered_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("worker reached the sink");

    let first = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || logger.stop_sync())
    };
    thread::sleep(Duration::from_millis(100));
    let second = {
        let logger = Arc::clone(&logger);
        let capture = capture.clone();
        thread::spawn(move || {
            logger.stop_sync();
            capture.lines().len()
        })
    };

    thread::sleep(Duration::from_millis(100));
    assert!(!second.is_finished());
    assert!(!logger.shutdown(Duration::from_millis(20)));

    drop(release_tx);
    first.join().unwrap();
    assert_eq!(second.join().unwrap(), QUEUED);
    assert!(logger.shutdown(Duration::from_millis(10)));
}

#[test]
fn test_drop_drains_queue() {
    let capture = MemorySink::new();
    {
        let logger = Logger::builder("dropper")
            .stdout(false)
            .sink(capture.clone())
            .build()
            .unwrap();
        for i in 0..250 {
            logger.debug(i);
            logger.error(i);
        }
    }
    assert_eq!(capture.lines().len(), 250);
}

#[test]
fn test_level_changes_under_load() {
    let capture = MemorySink::new();
    let logger = Arc::new(
        Logger::builder("flip")
            .stdout(false)
            .queue_capacity(10_000)
            .sink(capture.clone())
            .build()
            .unwrap(),
    );

    let producer = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || {
            for i in 0..2_000 {
                logger.debug(i);
                logger.error(i);
            }
        })
    };
    for level in LogLevel::ALL.iter().cycle().take(200) {
        logger.set_min_level(*level);
        thread::yield_now();
    }
    producer.join().unwrap();
    logger.stop_sync();

    let values = capture.json_lines().unwrap();
    assert!(values.iter().filter(|v| v["level"] == "ERROR").count() == 2_000);
    let metrics = logger.metrics();
    assert_eq!(
        metrics.written_count() + metrics.filtered_count(),
        metrics.enqueued_count()
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_async_tasks_as_producers() {
    let capture = MemorySink::new();
    let logger = Arc::new(
        Logger::builder("tokio")
            .stdout(false)
            .queue_capacity(4_096)
            .sink(capture.clone())
            .build()
            .unwrap(),
    );

    let tasks: Vec<_> = (0..16)
        .map(|t| {
            let logger = Arc::clone(&logger);
            tokio::spawn(async move {
                for i in 0..100 {
                    logger.info(format_args!("t{}-{}", t, i));
                    if i % 10 == 0 {
                        tokio::task::yield_now().await;
                    }
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.expect("task panicked");
    }

    let logger = Arc::clone(&logger);
    tokio::task::spawn_blocking(move || logger.stop_sync())
        .await
        .unwrap();

    assert_eq!(capture.lines().len(), 1_600);
}
