//! Core queue, logger and sink types

pub mod config;
pub mod context;
pub mod error;
pub mod logger;
pub mod metrics;
pub mod overflow_policy;
pub mod sink;
pub mod thread_queue;
pub mod timestamp;
pub mod work_item;

pub use config::OutputConfig;
pub use context::OutputContext;
pub use error::{QueueError, Result};
pub use logger::{LineEnding, Logger, LoggerBuilder};
pub use metrics::QueueMetrics;
pub use overflow_policy::OverflowPolicy;
pub use sink::Sink;
pub use thread_queue::{default_reporter, FailureReporter, QueueBuilder, ThreadQueue, DEFAULT_QUEUE_NAME};
pub use timestamp::TimestampFormat;
pub use work_item::{OutputItem, WorkItem};
