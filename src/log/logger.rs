use std::{
    mem,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use chrono::Local;
use parking_lot::Mutex;

use crate::{
    config::Config,
    log::{
        event_queue::{EventReceiver, event_queue},
        host_feed::HostFeed,
        host_layer::HostFeedLayer,
        log_config::{ConsumerMode, LogConfig, MIN_IDLE_WAIT},
        log_error::LogError,
        log_sink::LogSink,
        log_writer::{LogWriter, WriterStats, WriterStatsSnapshot},
        logger_handle::{LoggerHandle, LoggerState, StateGate},
        severity::Severity,
    },
};

/// The queue's consumer half together with the files it writes to.
///
/// Exactly one exists per logger; it moves between the logger and the
/// consumer thread, so file handles are only ever touched by one context.
struct Consumer {
    writer: LogWriter,
    queue: EventReceiver,
}

impl Consumer {
    /// Blocks on the queue until `stop` is raised, then drains what is left.
    fn run(mut self, stop: &AtomicBool, idle_wait: Duration) -> Self {
        while !stop.load(Ordering::Acquire) {
            if let Some(event) = self.queue.dequeue_timeout(idle_wait) {
                self.writer.consume(&event);
            }
        }
        self.writer.drain_all(&self.queue);
        self
    }
}

enum Worker {
    /// Logging is off; the consumer is parked.
    Idle(Consumer),
    /// Logging is on and the host drives [`Logger::tick`].
    Ticking(Consumer),
    /// Logging is on and a thread owns the consumer.
    Running {
        stop: Arc<AtomicBool>,
        thread: JoinHandle<Option<Consumer>>,
    },
    /// Shut down, or the consumer was lost.
    Gone,
}

/// Asynchronous log sink writing hourly files for the system, web-server
/// and socket streams.
///
/// # Architecture
///
/// 1. **Producers**: any thread calls [`LoggerHandle::record`] (or the host
///    feed does it for them).
/// 2. **Queue**: an unbounded `mpsc` channel buffers events in global FIFO
///    order.
/// 3. **Consumer**: a dedicated thread, or the host's [`Logger::tick`],
///    routes each event to its stream and appends it to the current hour's
///    file.
///
/// Construct one per process at the top of the host and pass handles down.
/// Dropping the logger shuts it down.
pub struct Logger {
    config: LogConfig,
    handle: LoggerHandle,
    gate: Arc<StateGate>,
    feed: HostFeed,
    stats: Arc<WriterStats>,
    worker: Mutex<Worker>,
}

impl Logger {
    /// Builds a disabled logger. Nothing touches the disk until it is
    /// enabled.
    #[must_use]
    pub fn new(config: LogConfig) -> Self {
        let (tx, queue) = event_queue();
        let gate = Arc::new(StateGate::default());
        let writer = LogWriter::new(config.dirs.clone(), config.router);
        let stats = writer.stats();

        Self {
            handle: LoggerHandle::new(tx, Arc::clone(&gate)),
            gate,
            feed: HostFeed::new(),
            stats,
            worker: Mutex::new(Worker::Idle(Consumer { writer, queue })),
            config,
        }
    }

    /// Builds a logger and enables it if `config.enabled` is set.
    ///
    /// # Errors
    ///
    /// Fails when the stream directories or files cannot be created, or the
    /// consumer thread cannot be spawned.
    pub fn start(config: LogConfig) -> Result<Self, LogError> {
        let enabled = config.enabled;
        let logger = Self::new(config);
        if enabled {
            logger.set_enabled(true)?;
        }
        Ok(logger)
    }

    /// Reads [`LogConfig`] from `config` and calls [`Logger::start`].
    ///
    /// # Errors
    ///
    /// Configuration errors, plus everything [`Logger::start`] can return.
    pub fn from_config(config: &Config) -> Result<Self, LogError> {
        Self::start(LogConfig::from_config(config)?)
    }

    #[must_use]
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Returns a cloneable producer handle.
    #[must_use]
    pub fn handle(&self) -> LoggerHandle {
        self.handle.clone()
    }

    /// The slot host integrations forward their diagnostics to.
    #[must_use]
    pub fn host_feed(&self) -> HostFeed {
        self.feed.clone()
    }

    /// A `tracing` layer bound to this logger's host feed.
    #[must_use]
    pub fn host_layer(&self) -> HostFeedLayer {
        HostFeedLayer::new(self.host_feed())
    }

    #[must_use]
    pub fn state(&self) -> LoggerState {
        self.gate.load()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.state() == LoggerState::Enabled
    }

    #[must_use]
    pub fn stats(&self) -> WriterStatsSnapshot {
        self.stats.snapshot()
    }

    /// Enqueues one event stamped with the current time.
    pub fn record(
        &self,
        severity: Severity,
        message: impl Into<String>,
        stack_trace: Option<&str>,
    ) -> bool {
        self.handle.record(severity, message, stack_trace)
    }

    /// Turns logging on or off. Repeating the current state is a no-op.
    ///
    /// Enabling writes a startup marker to every stream, registers the host
    /// feed and starts draining. Disabling stops accepting events, drains
    /// whatever is already queued, then parks the consumer.
    ///
    /// # Errors
    ///
    /// When enabling fails the logger stays disabled and the cause is
    /// returned once; nothing is retried.
    pub fn set_enabled(&self, enabled: bool) -> Result<(), LogError> {
        let mut worker = self.worker.lock();
        if self.state() == LoggerState::ShutDown {
            return Err(LogError::ShutDown);
        }

        match (enabled, mem::replace(&mut *worker, Worker::Gone)) {
            (true, Worker::Idle(consumer)) => {
                let (next, result) = self.enable(consumer);
                *worker = next;
                result
            }
            (false, Worker::Ticking(mut consumer)) => {
                self.close_gate(LoggerState::Disabled);
                consumer.writer.drain_all(&consumer.queue);
                *worker = Worker::Idle(consumer);
                Ok(())
            }
            (false, Worker::Running { stop, thread }) => {
                self.close_gate(LoggerState::Disabled);
                let consumer = join_consumer(&stop, thread)?;
                *worker = Worker::Idle(consumer);
                Ok(())
            }
            (_, Worker::Gone) => Err(LogError::WorkerLost),
            (_, unchanged) => {
                *worker = unchanged;
                Ok(())
            }
        }
    }

    /// Drains at most one event. Only meaningful in [`ConsumerMode::Tick`];
    /// otherwise returns `false`.
    pub fn tick(&self) -> bool {
        match &mut *self.worker.lock() {
            Worker::Ticking(consumer) => consumer.writer.drain_one(&consumer.queue),
            _ => false,
        }
    }

    /// Stops accepting events, drains the queue, writes the shutdown marker
    /// to every stream that was opened and releases the files.
    ///
    /// Idempotent; also runs on drop.
    pub fn shutdown(&self) {
        let mut worker = self.worker.lock();
        if self.state() == LoggerState::ShutDown {
            return;
        }
        self.close_gate(LoggerState::ShutDown);

        let consumer = match mem::replace(&mut *worker, Worker::Gone) {
            Worker::Idle(consumer) | Worker::Ticking(consumer) => Some(consumer),
            Worker::Running { stop, thread } => join_consumer(&stop, thread).ok(),
            Worker::Gone => None,
        };

        if let Some(mut consumer) = consumer {
            consumer.writer.drain_all(&consumer.queue);
            consumer.writer.write_shutdown_markers(&Local::now());
            tracing::debug!("logger shut down");
        }
    }

    /// Returns the worker to keep and whether enabling succeeded. On any
    /// failure the consumer is parked again so a later enable can retry.
    fn enable(&self, mut consumer: Consumer) -> (Worker, Result<(), LogError>) {
        let next = match self.config.mode {
            ConsumerMode::Tick => {
                if let Err(e) = consumer.writer.write_startup_markers(&Local::now()) {
                    tracing::error!(error = %e, "cannot start logging, staying disabled");
                    return (Worker::Idle(consumer), Err(e));
                }
                Worker::Ticking(consumer)
            }
            ConsumerMode::Thread => match self.spawn_consumer(consumer) {
                Ok(running) => running,
                Err((consumer, e)) => return (Worker::Idle(consumer), Err(e)),
            },
        };

        self.gate.store(LoggerState::Enabled);
        self.feed.register(self.handle.clone());
        (next, Ok(()))
    }

    /// Starts the consumer thread, then writes the startup markers, then
    /// hands the consumer over. The thread exits without it if either step
    /// fails.
    #[allow(clippy::result_large_err)]
    fn spawn_consumer(&self, mut consumer: Consumer) -> Result<Worker, (Consumer, LogError)> {
        let (handoff, pickup) = mpsc::sync_channel::<Consumer>(1);
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let idle_wait = self.config.idle_wait.max(MIN_IDLE_WAIT);

        let spawned = thread::Builder::new()
            .name("log-consumer".into())
            .spawn(move || {
                pickup
                    .recv()
                    .ok()
                    .map(|consumer| consumer.run(&thread_stop, idle_wait))
            });
        let thread = match spawned {
            Ok(thread) => thread,
            Err(e) => {
                tracing::error!(error = %e, "cannot spawn log consumer");
                return Err((consumer, LogError::Spawn(e)));
            }
        };

        if let Err(e) = consumer.writer.write_startup_markers(&Local::now()) {
            tracing::error!(error = %e, "cannot start logging, staying disabled");
            drop(handoff);
            let _ = thread.join();
            return Err((consumer, e));
        }

        if let Err(mpsc::SendError(consumer)) = handoff.send(consumer) {
            let _ = thread.join();
            return Err((consumer, LogError::WorkerLost));
        }
        Ok(Worker::Running { stop, thread })
    }

    fn close_gate(&self, state: LoggerState) {
        self.gate.store(state);
        self.feed.unregister();
    }
}

fn join_consumer(
    stop: &AtomicBool,
    thread: JoinHandle<Option<Consumer>>,
) -> Result<Consumer, LogError> {
    stop.store(true, Ordering::Release);
    match thread.join() {
        Ok(Some(consumer)) => Ok(consumer),
        Ok(None) => Err(LogError::WorkerLost),
        Err(_) => {
            tracing::error!("log consumer panicked");
            Err(LogError::WorkerLost)
        }
    }
}

impl LogSink for Logger {
    fn record(&self, severity: Severity, message: &str, stack_trace: Option<&str>) {
        let _ = self.handle.record(severity, message, stack_trace);
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.shutdown();
    }
}
