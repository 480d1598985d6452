use std::{io, path::PathBuf};

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised by the logging core.
///
/// Only lifecycle calls return these. Failures while draining the queue are
/// counted and the event dropped; they never reach producers.
#[derive(Debug, Error)]
pub enum LogError {
    /// A stream directory could not be created.
    #[error("cannot create log directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A stream file could not be opened for appending.
    #[error("cannot open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Appending a line failed.
    #[error("cannot write log file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The consumer thread could not be started.
    #[error("cannot spawn log consumer: {0}")]
    Spawn(#[source] io::Error),

    /// The consumer panicked or never started; nothing can be drained.
    #[error("log consumer is gone")]
    WorkerLost,

    /// The configuration could not be interpreted.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The logger was already shut down.
    #[error("logger is shut down")]
    ShutDown,
}
