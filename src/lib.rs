//! streamlog is an in-process asynchronous log sink.
//!
//! Application threads enqueue events through a cloneable
//! [`LoggerHandle`](log::LoggerHandle); a single consumer drains them in
//! FIFO order and appends each one to an hourly file of its stream:
//!
//! - `System/SystemLog_<yyyyMMdd_HH>.txt` for debug, info, warning, error
//!   and exception events,
//! - `WebServer/WebServerLog_<yyyyMMdd_HH>.txt` for requests and responses,
//! - `WebSocket/WebSocketLog_<yyyyMMdd_HH>.txt` for socket traffic.
//!
//! The host's own `tracing` diagnostics can be fed in with
//! [`Logger::host_layer`](log::Logger::host_layer).
//!
//! ```no_run
//! use streamlog::log::{LogConfig, Logger, Severity};
//!
//! let logger = Logger::start(LogConfig::in_dir("Logs")).expect("log directories");
//! let handle = logger.handle();
//! handle.record(Severity::Request, "GET /status", None);
//! logger.shutdown();
//! ```

/// Handles configuration loading and management.
pub mod config;
/// Event queue, hourly file rotation, stream routing and the logger itself.
pub mod log;
