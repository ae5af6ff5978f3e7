//! # Serial Output
//!
//! A serialized asynchronous output pipeline: producers on any thread render
//! text and push it onto a queue, and one dedicated worker thread per sink
//! writes it out in order.
//!
//! ## Features
//!
//! - **Non-blocking writes**: callers never wait on sink I/O
//! - **Ordered delivery**: one consumer per queue, FIFO in lock order
//! - **Graceful drain**: `exit()` returns only after queued output is written
//! - **Failure containment**: a failing write is reported and skipped, never
//!   thrown back at the producer

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        FailureReporter, LineEnding, Logger, LoggerBuilder, OutputConfig, OutputContext,
        OutputItem, OverflowPolicy, QueueBuilder, QueueError, QueueMetrics, Result, Sink,
        ThreadQueue, TimestampFormat, WorkItem,
    };
    pub use crate::sinks::{ConsoleSink, ConsoleStream, DebugSink, FileSink};
}

pub use crate::core::{
    default_reporter, FailureReporter, LineEnding, Logger, LoggerBuilder, OutputConfig,
    OutputContext, OutputItem, OverflowPolicy, QueueBuilder, QueueError, QueueMetrics, Result,
    Sink, ThreadQueue, TimestampFormat, WorkItem, DEFAULT_QUEUE_NAME,
};
pub use crate::sinks::{ConsoleSink, ConsoleStream, DebugSink, FileSink};
