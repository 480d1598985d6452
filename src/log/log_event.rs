use chrono::{DateTime, Local};

use crate::log::severity::Severity;

/// A single log occurrence.
///
/// Immutable once built: the writer consumes it exactly once and only the
/// text line it produces survives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    message: String,
    stack_trace: Option<String>,
    severity: Severity,
    timestamp: DateTime<Local>,
}

impl LogEvent {
    /// Creates an event stamped with the current local time.
    ///
    /// # Example
    ///
    /// ```rust
    /// use streamlog::log::{LogEvent, Severity};
    ///
    /// let ev = LogEvent::now(Severity::Info, "boot ok", None);
    /// assert_eq!(ev.message(), "boot ok");
    /// ```
    pub fn now(
        severity: Severity,
        message: impl Into<String>,
        stack_trace: Option<String>,
    ) -> Self {
        Self::at(Local::now(), severity, message, stack_trace)
    }

    /// Creates an event with an explicit timestamp.
    ///
    /// The timestamp drives both the formatted time and the hour bucket the
    /// event is written to.
    pub fn at(
        timestamp: DateTime<Local>,
        severity: Severity,
        message: impl Into<String>,
        stack_trace: Option<String>,
    ) -> Self {
        Self {
            message: message.into(),
            stack_trace,
            severity,
            timestamp,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn stack_trace(&self) -> Option<&str> {
        self.stack_trace.as_deref()
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }
}
