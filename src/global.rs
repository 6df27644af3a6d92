//! Process-wide logger
//!
//! A single optional [`Logger`] shared by the whole process. The free
//! functions here are no-ops until [`init_single`] has been called, and again
//! after [`stop_single`] or [`stop_sync_single`] clears the slot.
//!
//! ```
//! use rust_async_logger::global;
//!
//! let logger = global::init_single("billing");
//! global::info(format_args!("{} invoices queued", 3));
//! global::stop_sync_single();
//! assert!(!logger.is_running());
//! ```

use crate::core::{LogLevel, Logger, LoggerConfig, Result};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

static SINGLETON: RwLock<Option<Arc<Logger>>> = parking_lot::const_rwlock(None);

/// Install the process-wide logger for `module`, configured from the
/// environment. If one is already installed it is returned unchanged.
///
/// # Panics
///
/// Panics if the worker thread cannot be spawned. Use [`try_init_single`]
/// to handle that instead.
pub fn init_single(module: impl Into<String>) -> Arc<Logger> {
    match try_init_single(module) {
        Ok(logger) => logger,
        Err(e) => panic!("failed to start logger: {}", e),
    }
}

/// Fallible form of [`init_single`]. The slot stays empty on error.
pub fn try_init_single(module: impl Into<String>) -> Result<Arc<Logger>> {
    if let Some(logger) = SINGLETON.read().as_ref() {
        return Ok(Arc::clone(logger));
    }

    let mut slot = SINGLETON.write();
    // Another thread may have won the race between the two locks.
    if let Some(logger) = slot.as_ref() {
        return Ok(Arc::clone(logger));
    }
    let logger = Arc::new(Logger::with_config(LoggerConfig::from_env(module))?);
    *slot = Some(Arc::clone(&logger));
    Ok(logger)
}

/// The installed logger, if any.
pub fn singleton() -> Option<Arc<Logger>> {
    SINGLETON.read().clone()
}

#[track_caller]
pub fn log(level: LogLevel, message: impl fmt::Display) {
    if let Some(logger) = SINGLETON.read().as_ref() {
        logger.log(level, message);
    }
}

#[track_caller]
pub fn debug(message: impl fmt::Display) {
    if let Some(logger) = SINGLETON.read().as_ref() {
        logger.debug(message);
    }
}

#[track_caller]
pub fn info(message: impl fmt::Display) {
    if let Some(logger) = SINGLETON.read().as_ref() {
        logger.info(message);
    }
}

#[track_caller]
pub fn warning(message: impl fmt::Display) {
    if let Some(logger) = SINGLETON.read().as_ref() {
        logger.warning(message);
    }
}

#[track_caller]
pub fn error(message: impl fmt::Display) {
    if let Some(logger) = SINGLETON.read().as_ref() {
        logger.error(message);
    }
}

/// Close the process-wide logger without waiting and clear the slot.
///
/// Returns immediately even when this releases the last handle; the worker
/// drains what is queued in the background.
pub fn stop_single() {
    let logger = SINGLETON.write().take();
    if let Some(logger) = logger {
        logger.detach();
    }
}

/// Close the process-wide logger, wait until everything queued is written,
/// and clear the slot.
pub fn stop_sync_single() {
    let logger = SINGLETON.write().take();
    if let Some(logger) = logger {
        logger.stop_sync();
    }
}
