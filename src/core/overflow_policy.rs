//! Overflow policies for bounded output queues
//!
//! Queues are unbounded unless a capacity is configured. When a bounded
//! queue is full, the policy decides what `push` does with the new item.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Policy for handling a full bounded queue
///
/// # Example
///
/// ```
/// use serial_output::OverflowPolicy;
/// use std::time::Duration;
///
/// // Default behavior: wait for the worker to make room
/// let policy = OverflowPolicy::default();
/// assert_eq!(policy, OverflowPolicy::Block);
///
/// // Wait a little, then give up
/// let policy = OverflowPolicy::BlockWithTimeout(Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Block the producer until space is available
    ///
    /// Warning: this applies backpressure to the application.
    Block,

    /// Block with timeout, then reject
    BlockWithTimeout(Duration),

    /// Reject immediately with `QueueError::QueueFull`
    Reject,
}

impl Default for OverflowPolicy {
    fn default() -> Self {
        OverflowPolicy::Block
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::Block => write!(f, "Block"),
            OverflowPolicy::BlockWithTimeout(d) => write!(f, "BlockWithTimeout({:?})", d),
            OverflowPolicy::Reject => write!(f, "Reject"),
        }
    }
}
