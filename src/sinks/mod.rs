//! Sink implementations

pub mod console;
pub mod debug;
pub mod file;

pub use console::{ConsoleSink, ConsoleStream};
pub use debug::{debugger_attached, DebugSink};
pub use file::FileSink;

pub use crate::core::Sink;
