//! Sink trait for output destinations

use super::error::Result;

/// Terminal destination of rendered text.
///
/// A sink is owned by exactly one worker thread, so it only needs to be
/// `Send`; the queue serializes every call into it.
pub trait Sink: Send + 'static {
    /// Perform the platform write for one fully rendered string.
    fn accept(&mut self, text: &str) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn accept(&mut self, text: &str) -> Result<()> {
        (**self).accept(text)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
