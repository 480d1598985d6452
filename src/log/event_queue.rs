//! Unbounded multi-producer, single-consumer FIFO of [`LogEvent`]s.
//!
//! Producers hold cloneable [`EventSender`]s; exactly one [`EventReceiver`]
//! exists. Ordering is global FIFO across all producers because every
//! sender feeds the same channel.

use std::{
    sync::mpsc::{self, RecvTimeoutError, TryRecvError},
    time::Duration,
};

use crate::log::log_event::LogEvent;

/// Creates a connected sender/receiver pair.
#[must_use]
pub fn event_queue() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::channel();
    (EventSender { tx }, EventReceiver { rx })
}

/// Producer half. Never blocks and never rejects while the consumer half
/// is alive.
#[derive(Clone, Debug)]
pub struct EventSender {
    tx: mpsc::Sender<LogEvent>,
}

impl EventSender {
    /// Appends `event` to the tail of the queue.
    ///
    /// Returns `false` when the consumer half is gone; the event is then
    /// discarded.
    pub fn enqueue(&self, event: LogEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Consumer half. Not `Clone`: there is only ever one drain.
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::Receiver<LogEvent>,
}

impl EventReceiver {
    /// Removes and returns the head of the queue, or `None` if nothing is
    /// pending. Never blocks.
    pub fn try_dequeue(&self) -> Option<LogEvent> {
        match self.rx.try_recv() {
            Ok(ev) => Some(ev),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Waits up to `timeout` for the next event.
    ///
    /// Returns immediately when an event is already pending.
    pub fn dequeue_timeout(&self, timeout: Duration) -> Option<LogEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::log::severity::Severity;
    use std::{sync::Barrier, thread};

    #[test]
    fn try_dequeue_on_empty_returns_none() {
        let (_tx, rx) = event_queue();
        assert!(rx.try_dequeue().is_none());
    }

    #[test]
    fn fifo_for_single_producer() {
        let (tx, rx) = event_queue();
        for i in 0..5 {
            assert!(tx.enqueue(LogEvent::now(Severity::Info, format!("m{i}"), None)));
        }
        let got: Vec<_> = std::iter::from_fn(|| rx.try_dequeue())
            .map(|e| e.message().to_owned())
            .collect();
        assert_eq!(got, vec!["m0", "m1", "m2", "m3", "m4"]);
    }

    #[test]
    fn enqueue_after_receiver_dropped_is_discarded() {
        let (tx, rx) = event_queue();
        drop(rx);
        assert!(!tx.enqueue(LogEvent::now(Severity::Info, "late", None)));
    }

    #[test]
    fn concurrent_producers_lose_nothing() {
        const PRODUCERS: usize = 4;
        const PER: usize = 250;

        let (tx, rx) = event_queue();
        let barrier = std::sync::Arc::new(Barrier::new(PRODUCERS));
        let workers: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let tx = tx.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..PER {
                        tx.enqueue(LogEvent::now(Severity::Debug, format!("{p}:{i}"), None));
                    }
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }

        let mut last_seen = [None::<usize>; PRODUCERS];
        let mut total = 0;
        while let Some(ev) = rx.try_dequeue() {
            let (p, i) = ev.message().split_once(':').unwrap();
            let (p, i): (usize, usize) = (p.parse().unwrap(), i.parse().unwrap());
            // Per-producer order survives the interleaving.
            if let Some(prev) = last_seen[p] {
                assert!(i > prev);
            }
            last_seen[p] = Some(i);
            total += 1;
        }
        assert_eq!(total, PRODUCERS * PER);
    }

    #[test]
    fn dequeue_timeout_returns_pending_event_immediately() {
        let (tx, rx) = event_queue();
        tx.enqueue(LogEvent::now(Severity::Info, "ready", None));
        let ev = rx.dequeue_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(ev.message(), "ready");
        assert!(rx.dequeue_timeout(Duration::from_millis(10)).is_none());
    }
}
