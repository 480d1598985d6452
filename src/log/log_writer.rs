use std::{
    io::Write,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use chrono::{DateTime, Local, Timelike};

use crate::log::{
    event_queue::EventReceiver,
    file_rotator::{FileRotator, StreamDirs},
    log_error::LogError,
    log_event::LogEvent,
    log_stream::{LogStream, Router},
    severity::Severity,
};

pub const STARTUP_MARKER: &str = "-------------------------- startup --------------------------";
pub const SHUTDOWN_MARKER: &str = "-------------------------- shutdown --------------------------";

/// Formats one log entry, without the trailing newline.
///
/// `[yyyy-MM-dd] [HH:mm:ss.ff] [LEVEL]      - message`, plus
/// `\r\nStackTrace ==> <trace>` for error-class severities with a non-empty
/// trace.
#[must_use]
pub fn format_entry(
    at: &DateTime<Local>,
    severity: Severity,
    message: &str,
    stack_trace: Option<&str>,
) -> String {
    // Leap seconds report up to 1999ms.
    let centis = (at.nanosecond() / 10_000_000).min(99);
    let level = format!("[{}]", severity.label());
    let mut line = format!(
        "[{}] [{}.{:02}] {:<12} - {}",
        at.format("%Y-%m-%d"),
        at.format("%H:%M:%S"),
        centis,
        level,
        message
    );

    if let Some(trace) = stack_trace.filter(|t| severity.keeps_stack_trace() && !t.is_empty()) {
        line.push_str("\r\nStackTrace ==> ");
        line.push_str(trace.trim());
    }
    line
}

/// Formats `event` with [`format_entry`].
#[must_use]
pub fn format_event(event: &LogEvent) -> String {
    format_entry(
        &event.timestamp(),
        event.severity(),
        event.message(),
        event.stack_trace(),
    )
}

/// Counters shared between the consumer and whoever inspects it.
#[derive(Debug, Default)]
pub struct WriterStats {
    written: AtomicU64,
    dropped: AtomicU64,
}

/// Point-in-time copy of [`WriterStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriterStatsSnapshot {
    /// Events appended to a stream file.
    pub written: u64,
    /// Events lost to an I/O failure.
    pub dropped: u64,
}

impl WriterStats {
    #[must_use]
    pub fn snapshot(&self) -> WriterStatsSnapshot {
        WriterStatsSnapshot {
            written: self.written.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Single consumer that turns events into lines in rotated stream files.
///
/// Every append opens the file, writes one entry and closes it again, so a
/// crash can lose at most the entry being written.
#[derive(Debug)]
pub struct LogWriter {
    router: Router,
    rotator: FileRotator,
    stats: Arc<WriterStats>,
}

impl LogWriter {
    #[must_use]
    pub fn new(dirs: StreamDirs, router: Router) -> Self {
        Self {
            router,
            rotator: FileRotator::new(dirs),
            stats: Arc::new(WriterStats::default()),
        }
    }

    #[must_use]
    pub fn stats(&self) -> Arc<WriterStats> {
        Arc::clone(&self.stats)
    }

    #[must_use]
    pub fn rotator(&self) -> &FileRotator {
        &self.rotator
    }

    /// Appends `event` to the stream its severity routes to.
    ///
    /// # Errors
    ///
    /// Returns the I/O failure; the event is lost either way.
    pub fn write_event(&mut self, event: &LogEvent) -> Result<LogStream, LogError> {
        let stream = self.router.route(event.severity());
        self.append(stream, &event.timestamp(), &format_event(event))?;
        Ok(stream)
    }

    /// Writes `event`, counting it as written or dropped. Never fails.
    pub fn consume(&mut self, event: &LogEvent) {
        match self.write_event(event) {
            Ok(_) => {
                self.stats.written.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(error = %e, severity = %event.severity(), "dropped log event");
            }
        }
    }

    /// Drains one event from `queue`. Returns `false` when it was empty.
    pub fn drain_one(&mut self, queue: &EventReceiver) -> bool {
        match queue.try_dequeue() {
            Some(event) => {
                self.consume(&event);
                true
            }
            None => false,
        }
    }

    /// Drains until `queue` is empty; returns how many events were taken.
    pub fn drain_all(&mut self, queue: &EventReceiver) -> usize {
        let mut n = 0;
        while self.drain_one(queue) {
            n += 1;
        }
        n
    }

    /// Touches every stream's current file with the startup marker.
    ///
    /// All three files are opened before anything is written, so a failed
    /// start leaves no marker behind and forgets every current file.
    ///
    /// # Errors
    ///
    /// Fails on the first stream whose directory or file cannot be created.
    pub fn write_startup_markers(&mut self, at: &DateTime<Local>) -> Result<(), LogError> {
        let line = format_entry(at, Severity::Info, STARTUP_MARKER, None);
        let mut opened = Vec::with_capacity(LogStream::ALL.len());
        for stream in LogStream::ALL {
            match self.rotator.open(stream, at) {
                Ok(file) => opened.push(file),
                Err(e) => {
                    self.rotator.release_all();
                    return Err(e);
                }
            }
        }
        for (mut file, path) in opened {
            writeln!(file, "{line}").map_err(|source| LogError::Write { path, source })?;
        }
        Ok(())
    }

    /// Writes the shutdown marker to every stream that has a current file.
    ///
    /// Best effort: a failing stream does not stop the others.
    pub fn write_shutdown_markers(&mut self, at: &DateTime<Local>) {
        let mut line = format_entry(at, Severity::Info, SHUTDOWN_MARKER, None);
        line.push('\n');
        for stream in LogStream::ALL {
            if !self.rotator.is_active(stream) {
                continue;
            }
            if let Err(e) = self.append(stream, at, &line) {
                tracing::warn!(error = %e, stream = %stream, "cannot write shutdown marker");
            }
        }
    }

    fn append(
        &mut self,
        stream: LogStream,
        at: &DateTime<Local>,
        entry: &str,
    ) -> Result<(), LogError> {
        let (mut file, path) = self.rotator.open(stream, at)?;
        // Closed on drop at the end of this call.
        writeln!(file, "{entry}").map_err(|source| LogError::Write { path, source })
    }
}
