//! Queue metrics for observability
//!
//! Counters for items pushed, executed, failed and rejected, shared between
//! producers and the worker thread.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for one output queue
///
/// # Example
///
/// ```
/// use serial_output::QueueMetrics;
///
/// let metrics = QueueMetrics::new();
/// metrics.record_pushed();
/// metrics.record_executed();
///
/// assert_eq!(metrics.pushed(), 1);
/// assert_eq!(metrics.pending(), 0);
/// ```
#[derive(Debug)]
pub struct QueueMetrics {
    /// Items accepted by `push`
    pushed: AtomicU64,

    /// Items whose `execute` returned `Ok`
    executed: AtomicU64,

    /// Items whose `execute` returned `Err` or panicked
    failed: AtomicU64,

    /// Pushes refused because the queue was full or stopped
    rejected: AtomicU64,
}

impl QueueMetrics {
    pub const fn new() -> Self {
        Self {
            pushed: AtomicU64::new(0),
            executed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn pushed(&self) -> u64 {
        self.pushed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn executed(&self) -> u64 {
        self.executed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    /// Items pushed but not yet finished, successfully or not
    pub fn pending(&self) -> u64 {
        self.pushed()
            .saturating_sub(self.executed() + self.failed())
    }

    #[inline]
    pub fn record_pushed(&self) -> u64 {
        self.pushed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_executed(&self) -> u64 {
        self.executed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected(&self) -> u64 {
        self.rejected.fetch_add(1, Ordering::Relaxed)
    }

    /// Failure rate as a percentage of finished items (0.0 - 100.0)
    pub fn failure_rate(&self) -> f64 {
        let failed = self.failed() as f64;
        let total = self.executed() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }
}

impl Default for QueueMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for QueueMetrics {
    /// Create a snapshot of the current counter values
    fn clone(&self) -> Self {
        Self {
            pushed: AtomicU64::new(self.pushed()),
            executed: AtomicU64::new(self.executed()),
            failed: AtomicU64::new(self.failed()),
            rejected: AtomicU64::new(self.rejected()),
        }
    }
}
