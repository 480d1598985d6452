use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use crate::{
    config::{Config, ConfigError, expand_path, invalid},
    log::{
        file_rotator::StreamDirs,
        log_stream::{LogStream, Router},
        severity::Severity,
    },
};

pub const LOGGING_SECTION: &str = "Logging";
pub const ROUTING_SECTION: &str = "Routing";

const DEFAULT_IDLE_WAIT: Duration = Duration::from_millis(100);
/// Floor for the consumer's idle wait; zero would spin.
pub(crate) const MIN_IDLE_WAIT: Duration = Duration::from_millis(1);

/// Who drives the consumer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConsumerMode {
    /// A dedicated thread blocks on the queue.
    #[default]
    Thread,
    /// The host calls [`Logger::tick`](crate::log::logger::Logger::tick)
    /// from its own loop; each tick drains at most one event.
    Tick,
}

impl FromStr for ConsumerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "thread" => Ok(ConsumerMode::Thread),
            "tick" => Ok(ConsumerMode::Tick),
            other => Err(format!("unknown consumer mode `{other}` (thread|tick)")),
        }
    }
}

impl fmt::Display for ConsumerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsumerMode::Thread => f.write_str("thread"),
            ConsumerMode::Tick => f.write_str("tick"),
        }
    }
}

/// Everything a [`Logger`](crate::log::logger::Logger) needs to start.
#[derive(Clone, Debug)]
pub struct LogConfig {
    pub dirs: StreamDirs,
    /// Whether `Logger::start` enables logging right away.
    pub enabled: bool,
    pub mode: ConsumerMode,
    /// How long an idle consumer thread blocks before re-checking for stop.
    pub idle_wait: Duration,
    pub router: Router,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::in_dir(default_root())
    }
}

impl LogConfig {
    /// Defaults with every stream under `root`.
    pub fn in_dir(root: impl AsRef<Path>) -> Self {
        Self {
            dirs: StreamDirs::under(root.as_ref()),
            enabled: true,
            mode: ConsumerMode::default(),
            idle_wait: DEFAULT_IDLE_WAIT,
            router: Router::default(),
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ConsumerMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Clamped to at least one millisecond.
    #[must_use]
    pub fn with_idle_wait(mut self, idle_wait: Duration) -> Self {
        self.idle_wait = idle_wait.max(MIN_IDLE_WAIT);
        self
    }

    #[must_use]
    pub fn with_router(mut self, router: Router) -> Self {
        self.router = router;
        self
    }

    /// Reads `[Logging]` and `[Routing]`.
    ///
    /// Keys in `[Logging]`: `root_dir`, `system_dir`, `web_server_dir`,
    /// `socket_dir`, `enabled`, `mode`, `idle_wait_ms`. `[Routing]` maps
    /// severity names to stream names.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for values that do not parse.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let root = config
            .get_non_empty(LOGGING_SECTION, "root_dir")
            .map_or_else(default_root, expand_path);

        let dir = |key: &str, stream: LogStream| {
            config
                .get_non_empty(LOGGING_SECTION, key)
                .map_or_else(|| root.join(stream.default_dir_name()), expand_path)
        };
        let dirs = StreamDirs::new(
            dir("system_dir", LogStream::System),
            dir("web_server_dir", LogStream::WebServer),
            dir("socket_dir", LogStream::Socket),
        );

        let mut router = Router::default();
        if let Some(routes) = config.section(ROUTING_SECTION) {
            for (sev, stream) in routes {
                let severity = sev
                    .parse::<Severity>()
                    .map_err(|e| invalid(ROUTING_SECTION, sev, stream, e.to_string()))?;
                let target = stream
                    .parse::<LogStream>()
                    .map_err(|e| invalid(ROUTING_SECTION, sev, stream, e.to_string()))?;
                router = router.with_route(severity, target);
            }
        }

        Ok(Self {
            dirs,
            enabled: config.get_bool(LOGGING_SECTION, "enabled")?.unwrap_or(true),
            mode: config
                .get_parsed(LOGGING_SECTION, "mode")?
                .unwrap_or_default(),
            idle_wait: idle_wait(config)?,
            router,
        })
    }
}

/// `idle_wait_ms`, which must be at least 1.
fn idle_wait(config: &Config) -> Result<Duration, ConfigError> {
    match config.get_parsed::<u64>(LOGGING_SECTION, "idle_wait_ms")? {
        None => Ok(DEFAULT_IDLE_WAIT),
        Some(0) => Err(invalid(
            LOGGING_SECTION,
            "idle_wait_ms",
            "0",
            "must be at least 1".into(),
        )),
        Some(ms) => Ok(Duration::from_millis(ms)),
    }
}

/// `./Logs` under the current directory.
fn default_root() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("Logs")
}
