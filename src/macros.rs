//! Formatting macros for the logger façade.
//!
//! These mirror `write!`/`writeln!`: the template is checked at compile time
//! and rendered on the calling thread, then queued.
//!
//! # Examples
//!
//! ```
//! use serial_output::prelude::*;
//! use serial_output::sinks::{ConsoleSink, ConsoleStream};
//! use serial_output::{write_line, write_text};
//!
//! let out = Logger::new(ConsoleSink::new(ConsoleStream::Stdout)).unwrap();
//!
//! write_text!(out, "progress: ").unwrap();
//! write_line!(out, "{}%", 50).unwrap();
//! write_line!(out).unwrap();
//! ```

/// Render and queue text without a line terminator.
///
/// Expands to [`Logger::write`](crate::Logger::write) and returns its `Result`.
///
/// # Examples
///
/// ```
/// # use serial_output::prelude::*;
/// # use serial_output::sinks::{ConsoleSink, ConsoleStream};
/// # let out = Logger::new(ConsoleSink::new(ConsoleStream::Stdout)).unwrap();
/// use serial_output::write_text;
/// write_text!(out, "no newline").unwrap();
/// write_text!(out, "code {}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! write_text {
    ($logger:expr, $($arg:tt)+) => {
        $logger.write(format_args!($($arg)+))
    };
}

/// Render and queue text followed by the logger's line terminator.
///
/// With only a logger, queues an empty line.
///
/// # Examples
///
/// ```
/// # use serial_output::prelude::*;
/// # use serial_output::sinks::{ConsoleSink, ConsoleStream};
/// # let err = Logger::new(ConsoleSink::new(ConsoleStream::Stderr)).unwrap();
/// use serial_output::write_line;
/// write_line!(err, "failed to open {}", "config.json").unwrap();
/// write_line!(err).unwrap();
/// ```
#[macro_export]
macro_rules! write_line {
    ($logger:expr) => {
        $logger.write_line(format_args!(""))
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.write_line(format_args!($($arg)+))
    };
}
