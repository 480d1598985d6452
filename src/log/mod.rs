pub mod event_queue;
pub mod file_rotator;
pub mod host_feed;
pub mod host_layer;
pub mod log_config;
pub mod log_error;
pub mod log_event;
pub mod log_macros;
pub mod log_sink;
pub mod log_stream;
pub mod log_writer;
pub mod logger;
pub mod logger_handle;
pub mod severity;

pub use host_feed::{HostFeed, HostLevel};
pub use host_layer::HostFeedLayer;
pub use log_config::{ConsumerMode, LogConfig};
pub use log_error::LogError;
pub use log_event::LogEvent;
pub use log_sink::LogSink;
pub use log_stream::{LogStream, Router};
pub use logger::Logger;
pub use logger_handle::{LoggerHandle, LoggerState};
pub use severity::Severity;
