//! Async logging example
//!
//! Demonstrates multi-threaded producers, a file sink, and load shedding
//! when the queue fills up.
//!
//! Run with: cargo run --example async_logging

use rust_async_logger::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    eprintln!("=== Rust Async Logger - Async Logging Example ===\n");

    let alerts = Arc::new(AtomicU64::new(0));
    let logger = Logger::builder("async-demo")
        .queue_capacity(1000)
        .stdout(false)
        .sink(FileSink::new("async_test.log")?)
        .on_overflow({
            let alerts = Arc::clone(&alerts);
            Arc::new(move |_total: u64| {
                alerts.fetch_add(1, Ordering::Relaxed);
            })
        })
        .build()?;

    eprintln!("1. Logging 100 messages without blocking:");
    for i in 0..100 {
        logger.info(format_args!("Message #{}", i));
    }

    eprintln!("\n2. Multi-threaded logging:");
    let logger = Arc::new(logger);
    let handles: Vec<_> = (0..5)
        .map(|thread_id| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..20 {
                    logger.info(format_args!("Thread {} - Message {}", thread_id, i));
                    thread::sleep(Duration::from_millis(10));
                }
            })
        })
        .collect();
    for handle in handles {
        let _ = handle.join();
    }

    eprintln!("\n3. Flooding the queue:");
    for i in 0..50_000 {
        logger.debug(format_args!("filtered {}", i));
        logger.warning(format_args!("flood {}", i));
    }

    logger.stop_sync();

    let metrics = logger.metrics();
    eprintln!("   written:  {}", metrics.written_count());
    eprintln!("   dropped:  {}", metrics.dropped_count());
    eprintln!("   alerts:   {}", alerts.load(Ordering::Relaxed));
    eprintln!("   records:  {:?}", logger.record_pool_stats());

    eprintln!("\n=== Example completed! Check async_test.log ===");

    Ok(())
}
