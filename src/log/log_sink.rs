use crate::log::severity::Severity;

/// Anything that accepts log events from producers.
///
/// Implementations must never block or fail loudly: a rejected event is
/// simply discarded.
pub trait LogSink: Send + Sync {
    fn record(&self, severity: Severity, message: &str, stack_trace: Option<&str>);
}
