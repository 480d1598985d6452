//! Leveled recording macros for any [`LogSink`](crate::log::log_sink::LogSink)
//! (a `LoggerHandle`, a `Logger`, or an `Arc<dyn LogSink>`).
//!
//! # Feature Flags
//! Lower levels are controlled by cargo features:
//! `log-debug`, `log-info` (also Request/Response/Socket), `log-warn`.
//! Error and exception macros are always on.
//!
//! If a feature is disabled, the corresponding macros expand to `()`, removing
//! all formatting and allocation overhead at compile time.

// ============================================================================
// 1. GENERIC MACROS
// ============================================================================

#[macro_export]
macro_rules! record_log {
    ($sink:expr, $sev:expr, $($arg:tt)*) => {{
        use $crate::log::log_sink::LogSink as _;
        let __msg = format!($($arg)*);
        $sink.record($sev, &__msg, None);
    }};
}

#[macro_export]
macro_rules! record_traced {
    ($sink:expr, $sev:expr, $trace:expr, $($arg:tt)*) => {{
        use $crate::log::log_sink::LogSink as _;
        let __msg = format!($($arg)*);
        let __trace: &str = $trace.as_ref();
        $sink.record($sev, &__msg, Some(__trace));
    }};
}

// ============================================================================
// 2. LEVEL-SPECIFIC MACROS (Feature Gated)
// ============================================================================

// ---------------------- DEBUG ----------------------
#[cfg(feature = "log-debug")]
#[macro_export]
macro_rules! record_debug { ($sink:expr, $($arg:tt)*) => { $crate::record_log!($sink, $crate::log::severity::Severity::Debug, $($arg)*) } }

#[cfg(not(feature = "log-debug"))]
#[macro_export]
macro_rules! record_debug {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- INFO ----------------------
#[cfg(feature = "log-info")]
#[macro_export]
macro_rules! record_info     { ($sink:expr, $($arg:tt)*) => { $crate::record_log!($sink, $crate::log::severity::Severity::Info, $($arg)*) } }
#[cfg(feature = "log-info")]
#[macro_export]
macro_rules! record_request  { ($sink:expr, $($arg:tt)*) => { $crate::record_log!($sink, $crate::log::severity::Severity::Request, $($arg)*) } }
#[cfg(feature = "log-info")]
#[macro_export]
macro_rules! record_response { ($sink:expr, $($arg:tt)*) => { $crate::record_log!($sink, $crate::log::severity::Severity::Response, $($arg)*) } }
#[cfg(feature = "log-info")]
#[macro_export]
macro_rules! record_socket   { ($sink:expr, $($arg:tt)*) => { $crate::record_log!($sink, $crate::log::severity::Severity::Socket, $($arg)*) } }

#[cfg(not(feature = "log-info"))]
#[macro_export]
macro_rules! record_info {
    ($($arg:tt)*) => {
        ()
    };
}
#[cfg(not(feature = "log-info"))]
#[macro_export]
macro_rules! record_request {
    ($($arg:tt)*) => {
        ()
    };
}
#[cfg(not(feature = "log-info"))]
#[macro_export]
macro_rules! record_response {
    ($($arg:tt)*) => {
        ()
    };
}
#[cfg(not(feature = "log-info"))]
#[macro_export]
macro_rules! record_socket {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- WARNING ----------------------
#[cfg(feature = "log-warn")]
#[macro_export]
macro_rules! record_warning { ($sink:expr, $($arg:tt)*) => { $crate::record_log!($sink, $crate::log::severity::Severity::Warning, $($arg)*) } }

#[cfg(not(feature = "log-warn"))]
#[macro_export]
macro_rules! record_warning {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- ERROR / EXCEPTION ----------------------
// Always enabled.
#[macro_export]
macro_rules! record_error {
    ($sink:expr, trace = $trace:expr, $($arg:tt)*) => { $crate::record_traced!($sink, $crate::log::severity::Severity::Error, $trace, $($arg)*) };
    ($sink:expr, $($arg:tt)*) => { $crate::record_log!($sink, $crate::log::severity::Severity::Error, $($arg)*) };
}

#[macro_export]
macro_rules! record_exception {
    ($sink:expr, trace = $trace:expr, $($arg:tt)*) => { $crate::record_traced!($sink, $crate::log::severity::Severity::Exception, $trace, $($arg)*) };
    ($sink:expr, $($arg:tt)*) => { $crate::record_log!($sink, $crate::log::severity::Severity::Exception, $($arg)*) };
}
