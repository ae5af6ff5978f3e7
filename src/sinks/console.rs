//! Console sink implementation

use crate::core::{QueueError, Result, Sink};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::{self, Write};

#[cfg(feature = "console")]
use colored::{Color, Colorize};

/// Standard stream a [`ConsoleSink`] writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsoleStream {
    Stdout,
    Stderr,
}

impl ConsoleStream {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsoleStream::Stdout => "stdout",
            ConsoleStream::Stderr => "stderr",
        }
    }
}

pub struct ConsoleSink {
    stream: ConsoleStream,
    #[cfg(feature = "console")]
    color: Option<Color>,
}

impl ConsoleSink {
    pub fn new(stream: ConsoleStream) -> Self {
        Self {
            stream,
            #[cfg(feature = "console")]
            color: None,
        }
    }

    pub fn stdout() -> Self {
        Self::new(ConsoleStream::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(ConsoleStream::Stderr)
    }

    /// Color the text of every write; line terminators stay uncolored
    ///
    /// # Example
    ///
    /// ```
    /// use serial_output::sinks::ConsoleSink;
    /// use colored::Color;
    ///
    /// let sink = ConsoleSink::stderr().with_color(Color::Red);
    /// ```
    #[cfg(feature = "console")]
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }

    #[cfg(feature = "console")]
    fn colorize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let Some(color) = self.color else {
            return Cow::Borrowed(text);
        };

        let body = text.trim_end_matches(|c| c == '\r' || c == '\n');
        if body.is_empty() {
            return Cow::Borrowed(text);
        }
        let terminator = &text[body.len()..];
        Cow::Owned(format!("{}{}", body.color(color), terminator))
    }

    #[cfg(not(feature = "console"))]
    fn colorize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }

    fn write_stream(&self, bytes: &[u8]) -> io::Result<()> {
        match self.stream {
            ConsoleStream::Stdout => io::stdout().lock().write_all(bytes),
            ConsoleStream::Stderr => io::stderr().lock().write_all(bytes),
        }
    }

    fn flush_stream(&self) -> io::Result<()> {
        match self.stream {
            ConsoleStream::Stdout => io::stdout().flush(),
            ConsoleStream::Stderr => io::stderr().flush(),
        }
    }
}

impl Sink for ConsoleSink {
    fn accept(&mut self, text: &str) -> Result<()> {
        let output = self.colorize(text);
        self.write_stream(output.as_bytes()).map_err(|e| {
            QueueError::io_operation(
                format!("writing to {}", self.stream.as_str()),
                "console write failed",
                e,
            )
        })
    }

    fn flush(&mut self) -> Result<()> {
        self.flush_stream()?;
        Ok(())
    }

    fn name(&self) -> &str {
        self.stream.as_str()
    }
}

impl Drop for ConsoleSink {
    fn drop(&mut self) {
        // Text written without a terminator may still sit in the stdout buffer.
        let _ = self.flush_stream();
    }
}
