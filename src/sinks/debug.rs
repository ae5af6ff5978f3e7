//! Debugger channel sink
//!
//! On Windows this is `OutputDebugStringW`, visible in an attached debugger
//! or a tool such as DebugView. Elsewhere there is no equivalent channel, so
//! the text goes to stderr unbuffered.

use crate::core::{QueueError, Result, Sink};

pub struct DebugSink {
    enabled: bool,
}

impl DebugSink {
    /// Always writes
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Writes only in builds with debug assertions; a no-op in release
    pub fn debug_builds_only() -> Self {
        Self {
            enabled: cfg!(debug_assertions),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for DebugSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for DebugSink {
    fn accept(&mut self, text: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        emit(text)
    }

    fn name(&self) -> &str {
        "debug"
    }
}

/// Write `text` straight to the platform debug channel on the calling thread.
///
/// Used by the default failure reporter, which must not go through a queue.
pub fn emit(text: &str) -> Result<()> {
    platform::emit(text)
        .map_err(|e| QueueError::io_operation("writing to debug channel", "debug output failed", e))
}

/// Whether a debugger is attached to this process
pub fn debugger_attached() -> bool {
    platform::debugger_attached()
}

#[cfg(windows)]
mod platform {
    use std::io;

    #[link(name = "kernel32")]
    extern "system" {
        fn OutputDebugStringW(output: *const u16);
        fn IsDebuggerPresent() -> i32;
    }

    pub fn emit(text: &str) -> io::Result<()> {
        let wide: Vec<u16> = text.encode_utf16().chain(std::iter::once(0)).collect();
        // SAFETY: `wide` is NUL-terminated and lives across the call.
        unsafe { OutputDebugStringW(wide.as_ptr()) };
        Ok(())
    }

    pub fn debugger_attached() -> bool {
        // SAFETY: no arguments, no preconditions.
        unsafe { IsDebuggerPresent() != 0 }
    }
}

#[cfg(not(windows))]
mod platform {
    use std::io::{self, Write};

    pub fn emit(text: &str) -> io::Result<()> {
        let mut stderr = io::stderr().lock();
        stderr.write_all(text.as_bytes())?;
        stderr.flush()
    }

    pub fn debugger_attached() -> bool {
        // Linux reports the tracer in /proc; other Unixes report nothing.
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|status| {
                status
                    .lines()
                    .find_map(|line| line.strip_prefix("TracerPid:"))
                    .map(|pid| pid.trim() != "0")
            })
            .unwrap_or(false)
    }
}
