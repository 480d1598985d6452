use std::{fmt, str::FromStr};

/// Categorical level or purpose of a log event.
///
/// Besides the usual diagnostic levels, `Request`, `Response` and `Socket`
/// tag traffic events so they can be routed to their own streams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Developer diagnostics.
    Debug,
    /// Normal progress messages.
    Info,
    /// An inbound web API request.
    Request,
    /// An outbound web API response.
    Response,
    /// Traffic received on a socket.
    Socket,
    /// Something suspicious that did not fail.
    Warning,
    /// A failure the application recovered from.
    Error,
    /// An unhandled failure (panic, uncaught exception).
    Exception,
}

impl Severity {
    pub const ALL: [Severity; 8] = [
        Severity::Debug,
        Severity::Info,
        Severity::Request,
        Severity::Response,
        Severity::Socket,
        Severity::Warning,
        Severity::Error,
        Severity::Exception,
    ];

    /// Label written between brackets in every log line.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Debug => "Debug",
            Severity::Info => "Info",
            Severity::Request => "Request",
            Severity::Response => "Response",
            Severity::Socket => "Socket",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Exception => "Exception",
        }
    }

    /// Only error-class entries carry their stack trace into the file.
    #[must_use]
    pub const fn keeps_stack_trace(self) -> bool {
        matches!(self, Severity::Error | Severity::Exception)
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a severity name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity: {0}")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    /// Case-insensitive; accepts the labels as well as `warn`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "request" => Ok(Severity::Request),
            "response" => Ok(Severity::Response),
            "socket" => Ok(Severity::Socket),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "exception" => Ok(Severity::Exception),
            _ => Err(ParseSeverityError(s.to_owned())),
        }
    }
}
