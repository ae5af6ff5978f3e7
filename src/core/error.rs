//! Error types for the output pipeline

pub type Result<T> = std::result::Result<T, QueueError>;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON configuration error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A sink refused or failed a write
    #[error("Sink '{sink}' failed: {message}")]
    Sink { sink: String, message: String },

    /// A `Display` implementation failed while rendering on the caller thread
    #[error("Failed to render message: {0}")]
    Format(#[from] std::fmt::Error),

    /// Bounded queue is at capacity
    #[error("Output queue full: {current}/{max} items buffered")]
    QueueFull { current: usize, max: usize },

    /// Push after exit, or after the worker died
    #[error("Output queue already stopped")]
    QueueStopped,

    /// The worker thread could not be created
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// A work item panicked while executing
    #[error("Work item panicked: {0}")]
    ItemPanicked(String),

    /// The worker loop itself panicked; the worker is gone
    #[error("Worker thread panicked: {0}")]
    WorkerPanicked(String),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },
}

impl QueueError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        QueueError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a sink error
    pub fn sink(sink: impl Into<String>, message: impl Into<String>) -> Self {
        QueueError::Sink {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create a queue full error with buffer details
    pub fn queue_full(current: usize, max: usize) -> Self {
        QueueError::QueueFull { current, max }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        QueueError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Build an error from a caught panic payload
    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send), in_worker: bool) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        if in_worker {
            QueueError::WorkerPanicked(message)
        } else {
            QueueError::ItemPanicked(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = QueueError::queue_full(100, 1000);
        assert!(matches!(err, QueueError::QueueFull { .. }));

        let err = QueueError::config("QueueBuilder", "capacity must be non-zero");
        assert!(matches!(err, QueueError::InvalidConfiguration { .. }));

        let err = QueueError::sink("console", "broken pipe");
        assert!(matches!(err, QueueError::Sink { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = QueueError::queue_full(100, 1000);
        assert_eq!(err.to_string(), "Output queue full: 100/1000 items buffered");

        let err = QueueError::sink("stderr", "broken pipe");
        assert_eq!(err.to_string(), "Sink 'stderr' failed: broken pipe");

        assert_eq!(
            QueueError::QueueStopped.to_string(),
            "Output queue already stopped"
        );
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = QueueError::io_operation("opening output file", "cannot open file", io_err);

        assert!(matches!(err, QueueError::IoOperation { .. }));
        assert!(err.to_string().contains("opening output file"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_from_panic_payloads() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        let err = QueueError::from_panic(payload.as_ref(), false);
        assert_eq!(err.to_string(), "Work item panicked: boom");

        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("loop broke"));
        let err = QueueError::from_panic(payload.as_ref(), true);
        assert_eq!(err.to_string(), "Worker thread panicked: loop broke");

        let payload: Box<dyn std::any::Any + Send> = Box::new(42_u32);
        let err = QueueError::from_panic(payload.as_ref(), false);
        assert!(err.to_string().contains("Unknown panic"));
    }
}
