//! Terminal front-end: runs one supervised download and prints the updates
//! the GUI would otherwise render.

use crate::bridge::{SessionOutcome, Severity, UiUpdate, UpdateQueue, POLL_INTERVAL};
use crate::downloader::{DownloadRequest, Supervisor};
use anyhow::Result;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Console mirror of the window's status line, progress bar and log
#[derive(Debug, Default)]
pub struct ConsoleView {
    pub status: String,
    pub severity: Severity,
    pub progress: f32,
    pub outcome: Option<SessionOutcome>,
}

impl ConsoleView {
    /// Apply one update, echoing it to `out`
    pub fn apply(&mut self, update: UiUpdate, out: &mut impl Write) -> Result<()> {
        match update {
            UiUpdate::Status { message, severity } => {
                writeln!(out, "Status: {}", message)?;
                self.status = message;
                self.severity = severity;
            }
            UiUpdate::Progress(value) => {
                self.progress = value.clamp(0.0, 1.0);
            }
            UiUpdate::AppendOutput(line) => {
                writeln!(out, "{}", line)?;
            }
            UiUpdate::ClearOutput => {}
            UiUpdate::SessionEnded(outcome) => {
                writeln!(out, "Progress: {:.1}%", self.progress * 100.0)?;
                self.outcome = Some(outcome);
            }
        }
        Ok(())
    }
}

/// Run `request` to completion, cancelling on Ctrl-C
pub fn run(
    supervisor: &mut Supervisor,
    queue: &mut UpdateQueue,
    request: DownloadRequest,
) -> Result<SessionOutcome> {
    let runtime = tokio::runtime::Runtime::new()?;
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    runtime.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            flag.store(true, Ordering::SeqCst);
        }
    });

    let mut view = ConsoleView::default();
    let mut stdout = std::io::stdout();

    if let Err(e) = supervisor.start(request) {
        queue.drain(|update| view.apply(update, &mut stdout));
        return Err(e.into());
    }

    loop {
        std::thread::sleep(POLL_INTERVAL);

        if interrupted.swap(false, Ordering::SeqCst) {
            info!("Interrupted, cancelling download");
            supervisor.cancel();
        }

        queue.drain(|update| view.apply(update, &mut stdout));

        if let Some(outcome) = view.outcome.take() {
            supervisor.session_ended();
            if view.severity == Severity::Error {
                warn!("Download ended with an error: {}", view.status);
            }
            return Ok(outcome);
        }
    }
}
