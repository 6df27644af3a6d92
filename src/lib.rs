//! # Rust Async Logger
//!
//! An asynchronous JSON-line logger. Callers emit leveled messages without
//! blocking; one background worker per logger renders each message as a JSON
//! object and writes it to standard output and any registered sinks.
//!
//! ## Features
//!
//! - **Non-blocking**: a bounded queue sheds load instead of stalling callers
//! - **Allocation-free hot path**: records and output buffers are pooled
//! - **Message splitting**: oversized messages are carved into several lines
//! - **Pluggable sinks**: files, arbitrary writers, in-memory capture
//!
//! ## Wire format
//!
//! ```text
//! {"timestamp":"2024-05-01T12:00:00.000000000Z","level":"INFO","message":"ready","service":"billing","src_file":"main.rs","src_line":12}
//! ```
//!
//! ## Example
//!
//! ```
//! use rust_async_logger::{Logger, MemorySink};
//!
//! let capture = MemorySink::new();
//! let logger = Logger::builder("billing")
//!     .stdout(false)
//!     .sink(capture.clone())
//!     .build()
//!     .unwrap();
//!
//! logger.info(format_args!("{} invoices queued", 3));
//! logger.stop_sync();
//!
//! assert_eq!(capture.json_lines().unwrap()[0]["service"], "billing");
//! ```

pub mod adapters;
pub mod core;
pub mod global;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::adapters::{LevelWriter, LineLogger};
    pub use crate::core::{
        DropNotice, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics,
        OverflowCallback, PoolStats, Result, Sink, TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::sinks::{FileSink, MemorySink, WriterSink};
}

pub use adapters::{LevelWriter, LineLogger};
pub use core::{
    DropNotice, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics,
    OverflowCallback, PoolStats, Result, Sink, TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use sinks::{FileSink, MemorySink, StdoutSink, WriterSink};
