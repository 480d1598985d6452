#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local, TimeZone};
use streamlog::log::{
    ConsumerMode, LogConfig, LogStream, Logger,
    log_writer::{SHUTDOWN_MARKER, STARTUP_MARKER},
};

pub fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 3, 1, h, m, s).single().unwrap()
}

pub fn tick_logger(root: &Path) -> Logger {
    Logger::new(LogConfig::in_dir(root).with_mode(ConsumerMode::Tick))
}

pub fn drain(logger: &Logger) -> usize {
    let mut n = 0;
    while logger.tick() {
        n += 1;
    }
    n
}

/// Files of one stream, sorted by name (and therefore by hour).
pub fn stream_files(logger: &Logger, stream: LogStream) -> Vec<PathBuf> {
    let dir = logger.config().dirs.dir(stream);
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<_> = entries.map(|e| e.unwrap().path()).collect();
    files.sort();
    files
}

/// Every line of a stream, oldest file first.
pub fn stream_lines(logger: &Logger, stream: LogStream) -> Vec<String> {
    stream_files(logger, stream)
        .iter()
        .flat_map(|p| {
            fs::read_to_string(p)
                .unwrap()
                .lines()
                .map(str::to_owned)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Stream lines without markers, blank lines or stack trace continuations,
/// reduced to their message part.
pub fn messages(logger: &Logger, stream: LogStream) -> Vec<String> {
    stream_lines(logger, stream)
        .into_iter()
        .filter(|l| !l.is_empty() && !l.contains(STARTUP_MARKER) && !l.contains(SHUTDOWN_MARKER))
        .filter(|l| !l.starts_with("StackTrace ==> "))
        .map(|l| l.split_once(" - ").unwrap().1.to_owned())
        .collect()
}

pub fn count_containing(logger: &Logger, stream: LogStream, needle: &str) -> usize {
    stream_lines(logger, stream)
        .iter()
        .filter(|l| l.contains(needle))
        .count()
}
