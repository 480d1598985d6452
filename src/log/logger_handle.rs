use std::sync::Arc;

use parking_lot::RwLock;

use crate::log::{
    event_queue::EventSender, log_event::LogEvent, log_sink::LogSink, severity::Severity,
};

/// Lifecycle state shared by a logger and all of its handles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoggerState {
    /// Not accepting events. Initial state, and the state after disabling.
    #[default]
    Disabled,
    /// Accepting events; the consumer is draining.
    Enabled,
    /// Terminal. Everything is silently discarded.
    ShutDown,
}

/// Producers hold the read side across check and send; a state change
/// waits for every in-flight send, so nothing lands behind a drain.
#[derive(Debug, Default)]
pub(crate) struct StateGate(RwLock<LoggerState>);

impl StateGate {
    pub(crate) fn load(&self) -> LoggerState {
        *self.0.read()
    }

    pub(crate) fn store(&self, state: LoggerState) {
        *self.0.write() = state;
    }

    /// Runs `send` only while enabled, with the state pinned.
    fn admit(&self, send: impl FnOnce() -> bool) -> bool {
        let state = self.0.read();
        *state == LoggerState::Enabled && send()
    }
}

/// Lightweight, cloneable producer entry point.
///
/// Enqueueing never blocks. Events offered while the logger is disabled or
/// shut down are dropped without error.
///
/// # Examples
/// ```ignore
/// // Usually you obtain it via: let handle = logger.handle();
/// handle.record(Severity::Request, "GET /status", None);
/// ```
#[derive(Clone, Debug)]
pub struct LoggerHandle {
    tx: EventSender,
    gate: Arc<StateGate>,
}

impl LogSink for LoggerHandle {
    #[inline]
    fn record(&self, severity: Severity, message: &str, stack_trace: Option<&str>) {
        let _ = LoggerHandle::record(self, severity, message, stack_trace);
    }
}

impl LoggerHandle {
    pub(crate) fn new(tx: EventSender, gate: Arc<StateGate>) -> Self {
        Self { tx, gate }
    }

    #[must_use]
    pub fn state(&self) -> LoggerState {
        self.gate.load()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.state() == LoggerState::Enabled
    }

    /// Stamps a new event with the current time and enqueues it.
    ///
    /// Returns whether the event was accepted.
    pub fn record(
        &self,
        severity: Severity,
        message: impl Into<String>,
        stack_trace: Option<&str>,
    ) -> bool {
        self.gate.admit(|| {
            self.tx.enqueue(LogEvent::now(
                severity,
                message,
                stack_trace.map(str::to_owned),
            ))
        })
    }

    /// Enqueues an already stamped event.
    pub fn enqueue(&self, event: LogEvent) -> bool {
        self.gate.admit(|| self.tx.enqueue(event))
    }
}
