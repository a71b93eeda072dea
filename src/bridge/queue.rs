//! Worker-to-UI update queue
//!
//! The worker pushes updates from its own thread; the UI drains them on a
//! fixed tick and applies them one by one, in the order they were sent.

use crate::bridge::messages::{SessionOutcome, UiUpdate};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error};

/// How often the UI drains the queue
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Create a connected sender/queue pair
pub fn channel() -> (UpdateSender, UpdateQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (UpdateSender { tx }, UpdateQueue { rx })
}

/// Sending half, cloned into each worker
#[derive(Debug, Clone)]
pub struct UpdateSender {
    tx: mpsc::UnboundedSender<UiUpdate>,
}

impl UpdateSender {
    /// Queue an update. If the UI is gone the update is dropped.
    pub fn send(&self, update: UiUpdate) {
        if let Err(e) = self.tx.send(update) {
            debug!("UI queue closed, dropping {} update", e.0.label());
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.send(UiUpdate::info(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(UiUpdate::error(message));
    }

    pub fn progress(&self, fraction: f32) {
        self.send(UiUpdate::Progress(fraction));
    }

    pub fn output(&self, line: impl Into<String>) {
        self.send(UiUpdate::output(line));
    }

    pub fn session_ended(&self, outcome: SessionOutcome) {
        self.send(UiUpdate::SessionEnded(outcome));
    }
}

/// Receiving half, owned by the UI thread
#[derive(Debug)]
pub struct UpdateQueue {
    rx: mpsc::UnboundedReceiver<UiUpdate>,
}

impl UpdateQueue {
    /// Next pending update, without blocking
    pub fn try_next(&mut self) -> Option<UiUpdate> {
        self.rx.try_recv().ok()
    }

    /// Apply every pending update in FIFO order. A failing update is logged
    /// and skipped; the drain continues with the next one. Returns how many
    /// updates were taken off the queue.
    pub fn drain<F>(&mut self, mut apply: F) -> usize
    where
        F: FnMut(UiUpdate) -> anyhow::Result<()>,
    {
        let mut count = 0;
        while let Some(update) = self.try_next() {
            count += 1;
            let label = update.label();
            if let Err(e) = apply(update) {
                error!("Failed applying {} update: {:#}", label, e);
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_send_order() {
        let (tx, mut queue) = channel();
        tx.info("Starting...");
        tx.output("line 1");
        tx.progress(0.5);
        tx.output("line 2");

        let mut seen = Vec::new();
        let count = queue.drain(|update| {
            seen.push(update);
            Ok(())
        });

        assert_eq!(count, 4);
        assert_eq!(
            seen,
            vec![
                UiUpdate::info("Starting..."),
                UiUpdate::output("line 1"),
                UiUpdate::Progress(0.5),
                UiUpdate::output("line 2"),
            ]
        );
    }

    #[test]
    fn failing_update_does_not_stop_the_drain() {
        let (tx, mut queue) = channel();
        tx.output("a");
        tx.progress(2.0);
        tx.output("b");

        let mut lines = Vec::new();
        let count = queue.drain(|update| match update {
            UiUpdate::Progress(_) => anyhow::bail!("progress widget unavailable"),
            UiUpdate::AppendOutput(line) => {
                lines.push(line);
                Ok(())
            }
            _ => Ok(()),
        });

        assert_eq!(count, 3);
        assert_eq!(lines, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn empty_queue_drains_nothing() {
        let (_tx, mut queue) = channel();
        assert_eq!(queue.drain(|_| Ok(())), 0);
    }

    #[test]
    fn updates_from_another_thread_arrive_in_order() {
        let (tx, mut queue) = channel();
        let worker = std::thread::spawn(move || {
            for i in 0..100 {
                tx.output(i.to_string());
            }
        });
        worker.join().unwrap();

        let mut seen = Vec::new();
        queue.drain(|update| {
            if let UiUpdate::AppendOutput(line) = update {
                seen.push(line.parse::<i32>()?);
            }
            Ok(())
        });
        assert_eq!(seen, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn send_after_queue_dropped_is_silent() {
        let (tx, queue) = channel();
        drop(queue);
        tx.info("nobody listening");
    }
}
