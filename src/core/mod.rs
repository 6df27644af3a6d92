//! Core logger types and traits

pub mod config;
pub mod encoder;
pub mod error;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod overflow_policy;
pub(crate) mod pipeline;
pub mod pool;
pub mod record;
pub mod sink;
pub mod timestamp;
pub(crate) mod worker;

pub use config::{LoggerConfig, DEFAULT_QUEUE_CAPACITY, LEVEL_ENV_VAR, SPLIT_LENGTH_ENV_VAR};
pub use encoder::{escape_into, split_message, Encoder, ServiceFields, DEFAULT_SPLIT_LENGTH};
pub use error::{LoggerError, Result};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, DEFAULT_SHUTDOWN_TIMEOUT};
pub use metrics::LoggerMetrics;
pub use overflow_policy::{DropNotice, OverflowCallback, DROP_NOTICE};
pub use pool::{BufferPool, MessagePool, Pool, PoolStats, Recycle};
pub use record::{Record, FORMAT_ERROR_MARKER};
pub use sink::{SharedSink, Sink, SinkSet};
pub use timestamp::TimestampFormat;
