//! Process-lifetime set of independent output stacks

use super::{config::OutputConfig, error::Result, logger::Logger};
use crate::sinks::{ConsoleSink, DebugSink};

/// One logger per output kind, each with its own queue, lock and worker
/// thread. They never share anything, so a slow stderr cannot delay stdout.
///
/// Construct it once near the top of the program and pass references down.
///
/// # Example
///
/// ```
/// use serial_output::{write_line, OutputContext};
///
/// let output = OutputContext::new().unwrap();
/// write_line!(output.out(), "ready").unwrap();
/// write_line!(output.err(), "warning: {} retries left", 2).unwrap();
/// output.exit();
/// ```
pub struct OutputContext {
    out: Logger<ConsoleSink>,
    err: Logger<ConsoleSink>,
    debug: Logger<DebugSink>,
}

impl OutputContext {
    pub fn new() -> Result<Self> {
        Self::with_config(&OutputConfig::default())
    }

    pub fn with_config(config: &OutputConfig) -> Result<Self> {
        config.validate()?;

        let err_sink = ConsoleSink::stderr();
        #[cfg(feature = "console")]
        let err_sink = if config.colors {
            err_sink.with_color(colored::Color::Red)
        } else {
            err_sink
        };

        let debug_sink = if config.debug_builds_only {
            DebugSink::debug_builds_only()
        } else {
            DebugSink::new()
        };

        Ok(Self {
            out: config.logger_builder("stdout").build(ConsoleSink::stdout())?,
            err: config.logger_builder("stderr").build(err_sink)?,
            debug: config.logger_builder("debug").build(debug_sink)?,
        })
    }

    pub fn out(&self) -> &Logger<ConsoleSink> {
        &self.out
    }

    pub fn err(&self) -> &Logger<ConsoleSink> {
        &self.err
    }

    pub fn debug(&self) -> &Logger<DebugSink> {
        &self.debug
    }

    /// Drain and stop all three stacks, one after another: out, err, debug.
    pub fn exit(&self) {
        self.out.exit();
        self.err.exit();
        self.debug.exit();
    }
}

impl Drop for OutputContext {
    fn drop(&mut self) {
        self.exit();
    }
}
