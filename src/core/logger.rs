//! Logger façade: render on the caller, write on the worker

use super::{
    error::Result,
    metrics::QueueMetrics,
    overflow_policy::OverflowPolicy,
    sink::Sink,
    thread_queue::{FailureReporter, QueueBuilder, ThreadQueue},
    timestamp::TimestampFormat,
    work_item::OutputItem,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// Line terminator appended by [`Logger::write_line`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    /// CRLF on Windows, LF elsewhere
    pub const fn native() -> Self {
        if cfg!(windows) {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

impl Default for LineEnding {
    fn default() -> Self {
        Self::native()
    }
}

/// A stateless proxy in front of one queue and its sink.
///
/// Text is rendered on the calling thread; the write itself happens later on
/// the queue's worker thread, in queue order. Share a logger between threads
/// by reference or `Arc`.
///
/// # Example
///
/// ```
/// use serial_output::{write_line, Logger};
/// use serial_output::sinks::{ConsoleSink, ConsoleStream};
///
/// let logger = Logger::new(ConsoleSink::new(ConsoleStream::Stdout)).unwrap();
/// logger.write_line(format_args!("listening on port {}", 8080)).unwrap();
/// write_line!(logger, "{} workers ready", 4).unwrap();
/// logger.exit();
/// ```
pub struct Logger<S: Sink> {
    queue: ThreadQueue<OutputItem, S>,
    line_ending: LineEnding,
    timestamp: Option<TimestampFormat>,
}

impl<S: Sink> Logger<S> {
    /// Create a logger with an unbounded queue and default settings
    pub fn new(sink: S) -> Result<Self> {
        LoggerBuilder::new().build(sink)
    }

    /// Render `args` and queue it without a terminator.
    ///
    /// # Errors
    ///
    /// `QueueError::Format` if an argument's `Display` fails, or the queue's
    /// push errors (stopped, full). Sink failures are never returned here.
    pub fn write(&self, args: fmt::Arguments<'_>) -> Result<()> {
        let text = self.render(args, false)?;
        self.queue.push(OutputItem::Text(text))
    }

    /// Render `args`, append the line terminator and queue it.
    pub fn write_line(&self, args: fmt::Arguments<'_>) -> Result<()> {
        let text = self.render(args, true)?;
        self.queue.push(OutputItem::Text(text))
    }

    /// Queue already rendered text as-is
    pub fn write_str(&self, text: impl Into<String>) -> Result<()> {
        self.queue.push(OutputItem::Text(text.into()))
    }

    /// Ask the sink to flush once everything queued so far is written
    pub fn flush(&self) -> Result<()> {
        self.queue.push(OutputItem::Flush)
    }

    /// Drain the queue and stop the worker. Idempotent.
    pub fn exit(&self) {
        self.queue.exit();
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn metrics(&self) -> &QueueMetrics {
        self.queue.metrics()
    }

    pub fn queue(&self) -> &ThreadQueue<OutputItem, S> {
        &self.queue
    }

    fn render(&self, args: fmt::Arguments<'_>, terminate: bool) -> Result<String> {
        let mut text = String::new();

        if let Some(ref format) = self.timestamp {
            text.push('[');
            format.write_to(&mut text, &Utc::now())?;
            text.push_str("] ");
        }

        text.write_fmt(args)?;

        if terminate {
            text.push_str(self.line_ending.as_str());
        }

        Ok(text)
    }
}

/// Builder for constructing a Logger with a fluent API
///
/// # Example
/// ```
/// use serial_output::prelude::*;
/// use serial_output::sinks::{ConsoleSink, ConsoleStream};
///
/// let logger = LoggerBuilder::new()
///     .name("stderr")
///     .line_ending(LineEnding::CrLf)
///     .timestamps(TimestampFormat::Iso8601)
///     .build(ConsoleSink::new(ConsoleStream::Stderr))
///     .unwrap();
/// ```
pub struct LoggerBuilder {
    queue: QueueBuilder,
    line_ending: LineEnding,
    timestamp: Option<TimestampFormat>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            queue: QueueBuilder::new(),
            line_ending: LineEnding::default(),
            timestamp: None,
        }
    }

    /// Name of the queue and its worker thread
    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.queue = self.queue.name(name);
        self
    }

    /// Bound the queue; unbounded when never called
    #[must_use = "builder methods return a new value"]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.queue = self.queue.capacity(capacity);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn maybe_capacity(mut self, capacity: Option<usize>) -> Self {
        self.queue = self.queue.maybe_capacity(capacity);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.queue = self.queue.overflow_policy(policy);
        self
    }

    /// Where worker-side failures are reported
    #[must_use = "builder methods return a new value"]
    pub fn on_failure(mut self, reporter: FailureReporter) -> Self {
        self.queue = self.queue.on_failure(reporter);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Prefix every message with `[timestamp] `
    #[must_use = "builder methods return a new value"]
    pub fn timestamps(mut self, format: TimestampFormat) -> Self {
        self.timestamp = Some(format);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn maybe_timestamps(mut self, format: Option<TimestampFormat>) -> Self {
        self.timestamp = format;
        self
    }

    /// Spawn the worker thread and bind `sink` to it
    pub fn build<S: Sink>(self, sink: S) -> Result<Logger<S>> {
        if let Some(ref format) = self.timestamp {
            format
                .validate()
                .map_err(|message| super::QueueError::config("LoggerBuilder", message))?;
        }

        Ok(Logger {
            queue: self.queue.spawn(sink)?,
            line_ending: self.line_ending,
            timestamp: self.timestamp,
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
