//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. Arguments are
//! forwarded as `format_args!`, so the text is rendered straight into a
//! pooled record and nothing is formatted when the level is filtered out.
//!
//! With a logger expression first they target that logger; with the format
//! string first they target the process-wide logger from
//! [`global`](crate::global).
//!
//! # Examples
//!
//! ```
//! use rust_async_logger::prelude::*;
//! use rust_async_logger::{info, warning};
//!
//! let logger = Logger::builder("api").stdout(false).build().unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // Inline captures work too
//! let retries = 3;
//! warning!(logger, "upstream flaky, retries={retries}");
//! # logger.stop_sync();
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_async_logger::prelude::*;
/// # let logger = Logger::builder("api").stdout(false).build().unwrap();
/// use rust_async_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, ::std::format_args!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_async_logger::prelude::*;
/// # let logger = Logger::builder("api").stdout(false).build().unwrap();
/// use rust_async_logger::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($fmt:literal $($arg:tt)*) => {
        $crate::global::debug(::std::format_args!($fmt $($arg)*))
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_async_logger::prelude::*;
/// # let logger = Logger::builder("api").stdout(false).build().unwrap();
/// use rust_async_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($fmt:literal $($arg:tt)*) => {
        $crate::global::info(::std::format_args!($fmt $($arg)*))
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_async_logger::prelude::*;
/// # let logger = Logger::builder("api").stdout(false).build().unwrap();
/// use rust_async_logger::warning;
/// warning!(logger, "Low disk space");
/// warning!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warning {
    ($fmt:literal $($arg:tt)*) => {
        $crate::global::warning(::std::format_args!($fmt $($arg)*))
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Alias for [`warning!`](crate::warning).
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::warning!($($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_async_logger::prelude::*;
/// # let logger = Logger::builder("api").stdout(false).build().unwrap();
/// use rust_async_logger::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($fmt:literal $($arg:tt)*) => {
        $crate::global::error(::std::format_args!($fmt $($arg)*))
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use std::fmt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn capture_logger(level: LogLevel) -> (Logger, MemorySink) {
        let capture = MemorySink::new();
        let logger = Logger::builder("macros")
            .stdout(false)
            .min_level(level)
            .sink(capture.clone())
            .build()
            .unwrap();
        (logger, capture)
    }

    #[test]
    fn test_log_macro() {
        let (logger, capture) = capture_logger(LogLevel::Debug);
        log!(logger, LogLevel::Info, "Test message");
        log!(logger, LogLevel::Error, "Error: {}", 42);
        logger.stop_sync();

        let values = capture.json_lines().unwrap();
        assert_eq!(values[0]["message"], "Test message");
        assert_eq!(values[1]["message"], "Error: 42");
        assert_eq!(values[1]["level"], "ERROR");
    }

    #[test]
    fn test_level_macros() {
        let (logger, capture) = capture_logger(LogLevel::Debug);
        let user = "ada";
        debug!(logger, "debug {}", 1);
        info!(logger, "info {user}");
        warning!(logger, "warning");
        warn!(logger, "warn alias");
        error!(logger, "error {:>3}", 7);
        logger.stop_sync();

        let levels: Vec<String> = capture
            .json_lines()
            .unwrap()
            .iter()
            .map(|v| format!("{} {}", v["level"].as_str().unwrap(), v["message"].as_str().unwrap()))
            .collect();
        assert_eq!(
            levels,
            vec![
                "DEBUG debug 1",
                "INFO info ada",
                "WARNING warning",
                "WARNING warn alias",
                "ERROR error   7",
            ]
        );
    }

    #[test]
    fn test_macro_records_invocation_site() {
        let (logger, capture) = capture_logger(LogLevel::Info);
        let line = line!() + 1;
        info!(logger, "here");
        logger.stop_sync();

        let values = capture.json_lines().unwrap();
        assert_eq!(values[0]["src_file"], "macros.rs");
        assert_eq!(values[0]["src_line"], line);
    }

    struct Counted(Arc<AtomicUsize>);

    impl fmt::Display for Counted {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.fetch_add(1, Ordering::Relaxed);
            f.write_str("counted")
        }
    }

    #[test]
    fn test_filtered_arguments_are_never_formatted() {
        let (logger, _capture) = capture_logger(LogLevel::Error);
        let calls = Arc::new(AtomicUsize::new(0));

        debug!(logger, "{}", Counted(Arc::clone(&calls)));
        info!(logger, "{}", Counted(Arc::clone(&calls)));
        assert_eq!(calls.load(Ordering::Relaxed), 0);

        error!(logger, "{}", Counted(Arc::clone(&calls)));
        assert_eq!(calls.load(Ordering::Relaxed), 1);
        logger.stop_sync();
    }
}
