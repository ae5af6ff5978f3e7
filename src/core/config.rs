//! Serializable configuration for an [`OutputContext`](super::OutputContext)

use super::{
    error::{QueueError, Result},
    logger::{LineEnding, LoggerBuilder},
    overflow_policy::OverflowPolicy,
    timestamp::TimestampFormat,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings shared by the out, err and debug stacks
///
/// Every field has a default, so a JSON document only needs the fields it
/// changes:
///
/// ```
/// use serial_output::{LineEnding, OutputConfig};
///
/// let config = OutputConfig::from_json(r#"{ "line_ending": "CrLf", "capacity": 4096 }"#).unwrap();
/// assert_eq!(config.line_ending, LineEnding::CrLf);
/// assert_eq!(config.capacity, Some(4096));
/// assert_eq!(config.thread_name_prefix, "output");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Worker threads are named `<prefix>-stdout`, `<prefix>-stderr`, `<prefix>-debug`
    pub thread_name_prefix: String,
    pub line_ending: LineEnding,
    /// `None` keeps the queues unbounded
    pub capacity: Option<usize>,
    pub overflow_policy: OverflowPolicy,
    /// Color stderr output red (requires the `console` feature)
    pub colors: bool,
    pub timestamps: Option<TimestampFormat>,
    /// Silence the debug stack in builds without debug assertions
    pub debug_builds_only: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            thread_name_prefix: "output".to_string(),
            line_ending: LineEnding::default(),
            capacity: None,
            overflow_policy: OverflowPolicy::default(),
            colors: false,
            timestamps: None,
            debug_builds_only: false,
        }
    }
}

impl OutputConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            QueueError::io_operation("reading output config", path.display().to_string(), e)
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == Some(0) {
            return Err(QueueError::config("OutputConfig", "capacity must be non-zero"));
        }
        if self.thread_name_prefix.is_empty() {
            return Err(QueueError::config(
                "OutputConfig",
                "thread_name_prefix must not be empty",
            ));
        }
        if let Some(ref format) = self.timestamps {
            format
                .validate()
                .map_err(|message| QueueError::config("OutputConfig", message))?;
        }
        Ok(())
    }

    /// Logger builder for one stream, e.g. `"stdout"`
    pub fn logger_builder(&self, stream: &str) -> LoggerBuilder {
        LoggerBuilder::new()
            .name(format!("{}-{}", self.thread_name_prefix, stream))
            .line_ending(self.line_ending)
            .maybe_capacity(self.capacity)
            .overflow_policy(self.overflow_policy)
            .maybe_timestamps(self.timestamps.clone())
    }
}
