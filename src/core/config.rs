//! Logger configuration
//!
//! Configuration is fixed at construction apart from the minimum level,
//! the module id and the sink list, which the [`Logger`](super::Logger)
//! lets callers change at runtime.

use super::encoder::DEFAULT_SPLIT_LENGTH;
use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::overflow_policy::DropNotice;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};

/// Environment variable holding the minimum level (`DEBUG`..`ERROR` or `0`..`3`).
pub const LEVEL_ENV_VAR: &str = "LOGLEVEL";

/// Environment variable holding the split length in bytes.
pub const SPLIT_LENGTH_ENV_VAR: &str = "LOGSPLITLENGTH";

/// Default number of records the queue holds before dropping.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Value of the `service` field
    pub module: String,
    /// Value of the optional `service_id` field
    pub module_id: Option<String>,
    pub min_level: LogLevel,
    /// Maximum message bytes per emitted object
    pub split_length: usize,
    pub queue_capacity: usize,
    pub timestamp_format: TimestampFormat,
    /// Mirror every line to standard output
    pub write_stdout: bool,
    /// Attach `src_file`/`src_line` to each line
    pub capture_source: bool,
    /// Recycle records and buffers through the pools
    pub pooling: bool,
    pub drop_notice: DropNotice,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            module: String::new(),
            module_id: None,
            min_level: LogLevel::Info,
            split_length: DEFAULT_SPLIT_LENGTH,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            timestamp_format: TimestampFormat::default(),
            write_stdout: true,
            capture_source: true,
            pooling: true,
            drop_notice: DropNotice::default(),
        }
    }
}

impl LoggerConfig {
    /// Defaults for `module`, ignoring the environment.
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            ..Self::default()
        }
    }

    /// Defaults for `module` with level and split length read from the process environment.
    pub fn from_env(module: impl Into<String>) -> Self {
        Self::from_lookup(module, |key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) but with an arbitrary key lookup.
    ///
    /// The level must match exactly (`DEBUG`, `INFO`, `WARNING`, `ERROR` or
    /// `0`-`3`). An absent or unrecognised level falls back to `INFO`; an absent, zero
    /// or non-numeric split length falls back to [`DEFAULT_SPLIT_LENGTH`].
    pub fn from_lookup<F>(module: impl Into<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let min_level = lookup(LEVEL_ENV_VAR)
            .and_then(|value| LogLevel::from_env_value(&value))
            .unwrap_or(LogLevel::Info);

        let split_length = lookup(SPLIT_LENGTH_ENV_VAR)
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|&length| length > 0)
            .unwrap_or(DEFAULT_SPLIT_LENGTH);

        Self {
            min_level,
            split_length,
            ..Self::new(module)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(LoggerError::config(
                "queue_capacity",
                "must be greater than zero",
            ));
        }
        if self.split_length == 0 {
            return Err(LoggerError::config(
                "split_length",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}
