//! Listener the host integration layer forwards its native diagnostics to.
//!
//! The host side (for example [`HostFeedLayer`](crate::log::host_layer::HostFeedLayer))
//! holds a [`HostFeed`] for the whole process. The logger plugs its handle in
//! when it is enabled and pulls it out when disabled, so host events are only
//! accepted while logging is on.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::log::{logger_handle::LoggerHandle, severity::Severity};

/// Severity as reported by the host's own logging facility.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    /// An unhandled failure such as a panic.
    Panic,
}

impl HostLevel {
    /// Fixed host-to-core severity table.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            HostLevel::Trace | HostLevel::Debug => Severity::Debug,
            HostLevel::Info => Severity::Info,
            HostLevel::Warn => Severity::Warning,
            HostLevel::Error => Severity::Error,
            HostLevel::Panic => Severity::Exception,
        }
    }
}

impl From<tracing::Level> for HostLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => HostLevel::Trace,
            tracing::Level::DEBUG => HostLevel::Debug,
            tracing::Level::INFO => HostLevel::Info,
            tracing::Level::WARN => HostLevel::Warn,
            _ => HostLevel::Error,
        }
    }
}

/// Registration slot for the host feed. Cloning shares the slot.
#[derive(Clone, Debug, Default)]
pub struct HostFeed {
    listener: Arc<RwLock<Option<LoggerHandle>>>,
}

impl HostFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plugs `handle` in. Returns `false` if a listener was already
    /// registered, in which case nothing changes.
    pub fn register(&self, handle: LoggerHandle) -> bool {
        let mut slot = self.listener.write();
        if slot.is_some() {
            return false;
        }
        *slot = Some(handle);
        true
    }

    /// Removes the listener. Returns `false` if none was registered.
    pub fn unregister(&self) -> bool {
        self.listener.write().take().is_some()
    }

    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.listener.read().is_some()
    }

    /// Translates one host diagnostic and enqueues it.
    ///
    /// Returns whether a listener accepted the event.
    pub fn dispatch(&self, level: HostLevel, message: &str, stack_trace: Option<&str>) -> bool {
        match self.listener.read().as_ref() {
            Some(handle) => handle.record(level.severity(), message, stack_trace),
            None => false,
        }
    }
}
