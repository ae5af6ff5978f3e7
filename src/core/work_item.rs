//! Work item trait and the rendered-text item used by [`Logger`](super::Logger)

use super::{error::Result, sink::Sink};

/// A self-contained unit of deferred work.
///
/// Items are moved into a [`ThreadQueue`](super::ThreadQueue) by producers and
/// executed exactly once by its worker thread. The target `T` is the state the
/// worker owns for its whole life (typically a [`Sink`]); it is handed to each
/// item instead of being carried by it, so items never smuggle handles between
/// threads.
///
/// Returning `Err` (or panicking) only affects this item: the worker reports the
/// failure and moves on to the next one.
///
/// # Example
///
/// ```
/// use serial_output::{Result, WorkItem};
///
/// #[derive(Clone)]
/// struct Add(u64);
///
/// impl WorkItem<u64> for Add {
///     fn execute(self, total: &mut u64) -> Result<()> {
///         *total += self.0;
///         Ok(())
///     }
/// }
/// ```
pub trait WorkItem<T>: Send + 'static {
    fn execute(self, target: &mut T) -> Result<()>;

    /// Runs once on the worker after the queue drained on exit, before the
    /// target is dropped. Errors go to the failure reporter.
    fn finish(_target: &mut T) -> Result<()> {
        Ok(())
    }
}

/// Item pushed by the logger façade: either text for the sink, or a request
/// to flush whatever the sink buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputItem {
    Text(String),
    Flush,
}

impl OutputItem {
    pub fn text(&self) -> Option<&str> {
        match self {
            OutputItem::Text(text) => Some(text),
            OutputItem::Flush => None,
        }
    }
}

impl<S: Sink> WorkItem<S> for OutputItem {
    fn execute(self, sink: &mut S) -> Result<()> {
        match self {
            OutputItem::Text(text) => sink.accept(&text),
            OutputItem::Flush => sink.flush(),
        }
    }

    fn finish(sink: &mut S) -> Result<()> {
        sink.flush()
    }
}
