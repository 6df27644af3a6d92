//! Basic logger usage example
//!
//! Demonstrates JSON-line logging to stdout at different levels, the writer
//! adapters and the process-wide logger.
//!
//! Run with: cargo run --example basic_usage

use rust_async_logger::prelude::*;
use rust_async_logger::{global, info, warning};
use std::io::Write;

fn main() -> Result<()> {
    eprintln!("=== Rust Async Logger - Basic Usage Example ===\n");

    // Level and split length come from LOGLEVEL / LOGSPLITLENGTH when set.
    let logger = Logger::new("basic-usage");
    logger.set_min_level(LogLevel::Debug);

    eprintln!("1. Logging at different levels:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warning("This is a warning message");
    logger.error("This is an error message");

    eprintln!("\n2. Raising the minimum level to WARNING:");
    logger.set_min_level(LogLevel::Warning);
    logger.info("Info message (hidden)");
    warning!(logger, "Disk usage at {}%", 91);

    eprintln!("\n3. Tagging lines with a service id:");
    logger.set_module_id("node-1");
    logger.error("Lines now carry service_id");

    eprintln!("\n4. Adapters for code that wants a writer:");
    let mut out = logger.error_writer();
    writeln!(out, "written through io::Write")?;
    logger.error_logger("[legacy] ").println("line logger output");

    // Wait until everything above has been written.
    logger.stop_sync();

    eprintln!("\n5. Process-wide logger:");
    global::init_single("basic-usage-global");
    info!("hello from the global logger, pid {}", std::process::id());
    global::stop_sync_single();

    eprintln!("\n=== Example completed successfully! ===");

    Ok(())
}
