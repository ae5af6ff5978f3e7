//! File sink implementation

use crate::core::{QueueError, Result, Sink};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Append-only file sink
///
/// Output is buffered; it reaches the file on [`Logger::flush`](crate::Logger::flush),
/// when the buffer fills, or when the owning queue exits. A failed flush at
/// exit goes to the queue's failure reporter.
pub struct FileSink {
    writer: BufWriter<File>,
    path: PathBuf,
    name: String,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                QueueError::io_operation("opening output file", path.display().to_string(), e)
            })?;

        Ok(Self {
            writer: BufWriter::new(file),
            name: format!("file:{}", path.display()),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn accept(&mut self, text: &str) -> Result<()> {
        self.writer
            .write_all(text.as_bytes())
            .map_err(|e| QueueError::io_operation("writing output file", self.path.display().to_string(), e))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Only reached with data still buffered outside a queue; nothing to
        // report to here.
        let _ = self.writer.flush();
    }
}
