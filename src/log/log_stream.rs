use std::{fmt, str::FromStr};

use crate::log::severity::Severity;

/// One of the three independent log destinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogStream {
    /// General application diagnostics.
    System,
    /// Web API requests and responses.
    WebServer,
    /// Socket traffic.
    Socket,
}

impl LogStream {
    pub const ALL: [LogStream; 3] = [LogStream::System, LogStream::WebServer, LogStream::Socket];

    /// File name prefix, e.g. `SystemLog_20240301_10.txt`.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            LogStream::System => "System",
            LogStream::WebServer => "WebServer",
            LogStream::Socket => "WebSocket",
        }
    }

    /// Default directory name under the log root.
    #[must_use]
    pub const fn default_dir_name(self) -> &'static str {
        self.prefix()
    }

    /// File name for the given hour bucket key (`yyyyMMdd_HH`).
    #[must_use]
    pub fn file_name(self, bucket: &str) -> String {
        format!("{}Log_{}.txt", self.prefix(), bucket)
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for LogStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Error returned when a stream name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log stream: {0}")]
pub struct ParseStreamError(pub String);

impl FromStr for LogStream {
    type Err = ParseStreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(LogStream::System),
            "webserver" | "web_server" | "web" => Ok(LogStream::WebServer),
            "socket" | "websocket" => Ok(LogStream::Socket),
            _ => Err(ParseStreamError(s.to_owned())),
        }
    }
}

/// Maps every severity to exactly one stream.
///
/// The default table sends request/response traffic to `WebServer`, socket
/// traffic to `Socket` and everything else to `System`. Entries can be
/// overridden with [`Router::with_route`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Router {
    routes: [LogStream; 8],
}

impl Default for Router {
    fn default() -> Self {
        let mut routes = [LogStream::System; 8];
        routes[Severity::Request.index()] = LogStream::WebServer;
        routes[Severity::Response.index()] = LogStream::WebServer;
        routes[Severity::Socket.index()] = LogStream::Socket;
        Self { routes }
    }
}

impl Router {
    #[must_use]
    pub fn with_route(mut self, severity: Severity, stream: LogStream) -> Self {
        self.routes[severity.index()] = stream;
        self
    }

    #[inline]
    #[must_use]
    pub fn route(&self, severity: Severity) -> LogStream {
        self.routes[severity.index()]
    }
}
