#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{drain, messages, stream_lines, tick_logger};
use streamlog::log::LogStream;
use tracing_subscriber::prelude::*;

#[test]
fn host_diagnostics_land_in_the_system_stream() {
    let tmp = tempfile::tempdir().unwrap();
    let logger = tick_logger(tmp.path());
    logger.set_enabled(true).unwrap();

    let subscriber = tracing_subscriber::registry().with(logger.host_layer());
    tracing::subscriber::with_default(subscriber, || {
        tracing::trace!(target: "host_app", "very chatty");
        tracing::info!(target: "host_app", user = "ana", "signed in");
        tracing::warn!(target: "host_app", "cache cold");
        tracing::error!(target: "host_app", stack_trace = "  at handler()  ", "request failed");
        tracing::error!(
            target: "host_app",
            thread = "worker-3",
            panic.message = "index out of bounds",
            panic.backtrace = "at main()",
            "thread panicked"
        );
    });
    assert_eq!(drain(&logger), 5);

    assert_eq!(
        messages(&logger, LogStream::System),
        vec![
            "very chatty",
            "signed in user=ana",
            "cache cold",
            "request failed",
            "thread panicked thread=worker-3 panic.message=index out of bounds",
        ]
    );

    let lines = stream_lines(&logger, LogStream::System);
    let find = |needle: &str| lines.iter().position(|l| l.contains(needle)).unwrap();
    assert!(lines[find("very chatty")].contains("[Debug]"));
    assert!(lines[find("cache cold")].contains("[WARNING]"));
    assert!(lines[find("request failed")].contains("[ERROR]"));
    assert_eq!(lines[find("request failed") + 1], "StackTrace ==> at handler()");
    assert!(lines[find("thread panicked")].contains("[Exception]"));
    assert_eq!(lines[find("thread panicked") + 1], "StackTrace ==> at main()");

    assert!(messages(&logger, LogStream::WebServer).is_empty());
}

#[test]
fn host_feed_is_silent_while_disabled() {
    let tmp = tempfile::tempdir().unwrap();
    let logger = tick_logger(tmp.path());

    let subscriber = tracing_subscriber::registry().with(logger.host_layer());
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!(target: "host_app", "before enable");
        logger.set_enabled(true).unwrap();
        tracing::info!(target: "host_app", "while enabled");
        logger.set_enabled(false).unwrap();
        tracing::info!(target: "host_app", "after disable");
    });

    assert_eq!(messages(&logger, LogStream::System), vec!["while enabled"]);
    assert!(!logger.tick());
}

#[test]
fn own_diagnostics_are_not_fed_back() {
    let tmp = tempfile::tempdir().unwrap();
    let logger = tick_logger(tmp.path());
    logger.set_enabled(true).unwrap();

    let subscriber = tracing_subscriber::registry().with(logger.host_layer());
    tracing::subscriber::with_default(subscriber, || {
        tracing::warn!(target: "streamlog::log::log_writer", "dropped log event");
    });

    assert!(!logger.tick());
    assert!(messages(&logger, LogStream::System).is_empty());
}
