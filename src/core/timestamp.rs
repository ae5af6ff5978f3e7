//! Timestamp prefixes for rendered lines
//!
//! The logger can stamp each message with the time it was rendered on the
//! producer thread, before it is queued.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use serial_output::TimestampFormat;
/// use chrono::Utc;
///
/// let format = TimestampFormat::Iso8601;
/// let mut out = String::new();
/// format.write_to(&mut out, &Utc::now()).unwrap();
/// assert!(out.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// RFC 3339 format: `2025-01-08T10:30:45.123456+00:00`
    Rfc3339,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format, checked by [`validate`](Self::validate)
    Custom(String),
}

impl TimestampFormat {
    /// Write `datetime` in this format to `out`
    ///
    /// Fails only for a `Custom` format chrono cannot render.
    pub fn write_to(&self, out: &mut String, datetime: &DateTime<Utc>) -> fmt::Result {
        match self {
            TimestampFormat::Iso8601 => write!(out, "{}", datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            TimestampFormat::Rfc3339 => {
                out.push_str(&datetime.to_rfc3339());
                Ok(())
            }
            TimestampFormat::UnixMillis => write!(out, "{}", datetime.timestamp_millis()),
            TimestampFormat::Custom(format_str) => write!(out, "{}", datetime.format(format_str)),
        }
    }

    /// Format to a new string, or `None` if the format cannot render
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> Option<String> {
        let mut out = String::new();
        self.write_to(&mut out, datetime).ok().map(|()| out)
    }

    /// Reject custom formats containing invalid strftime specifiers
    pub fn validate(&self) -> Result<(), String> {
        if let TimestampFormat::Custom(format_str) = self {
            if StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error)) {
                return Err(format!("invalid strftime format '{}'", format_str));
            }
        }
        Ok(())
    }
}
