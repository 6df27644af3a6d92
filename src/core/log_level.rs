//! Log level definitions

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log message, totally ordered `Debug < Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum LogLevel {
    Debug = 0,
    #[default]
    Info = 1,
    Warning = 2,
    Error = 3,
}

impl LogLevel {
    /// All levels in ascending severity.
    pub const ALL: [LogLevel; 4] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }

    /// Convert a numeric code back into a level.
    ///
    /// Codes above `3` saturate to [`LogLevel::Error`].
    pub const fn from_u8(code: u8) -> Self {
        match code {
            0 => LogLevel::Debug,
            1 => LogLevel::Info,
            2 => LogLevel::Warning,
            _ => LogLevel::Error,
        }
    }

    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl LogLevel {
    /// Strict parse used for the `LOGLEVEL` variable: exact upper-case names
    /// or the codes `0`-`3`, no trimming and no aliases.
    pub fn from_env_value(value: &str) -> Option<Self> {
        match value {
            "DEBUG" | "0" => Some(LogLevel::Debug),
            "INFO" | "1" => Some(LogLevel::Info),
            "WARNING" | "2" => Some(LogLevel::Warning),
            "ERROR" | "3" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    /// Accepts level names (any case, `WARN` as an alias) and the numeric codes `0`-`3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEBUG" | "0" => Ok(LogLevel::Debug),
            "INFO" | "1" => Ok(LogLevel::Info),
            "WARNING" | "WARN" | "2" => Ok(LogLevel::Warning),
            "ERROR" | "3" => Ok(LogLevel::Error),
            _ => Err(LoggerError::InvalidLevel(s.to_string())),
        }
    }
}
