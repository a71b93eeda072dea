//! Download supervisor
//!
//! Owns the single download session: validates requests, starts one worker
//! thread per download, and routes cancellation to it. The worker runs
//! yt-dlp, classifies every output line and reports through the update
//! queue; the UI thread never blocks on the child process.

use crate::bridge::{SessionOutcome, UpdateSender};
use crate::downloader::command::{build_command, ToolCommand};
use crate::downloader::parser::classify_line;
use crate::downloader::process::{
    request_termination, spawn_tool, terminate_pid, LossyLines, Termination,
};
use crate::downloader::progress::ProgressState;
use crate::downloader::request::DownloadRequest;
use crate::tools::ToolSet;
use crate::utils::error::VidSnareError;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tokio::process::Child;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Upper bound on how long the worker waits for output before re-checking
/// the cancellation flag
const READ_POLL: Duration = Duration::from_millis(100);

/// Cancellation flag shared between the UI thread and the worker
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Process id of the running tool, published by the worker so the UI thread
/// can stop it without waiting for the next poll. Whoever takes the id owns
/// the stop request.
#[derive(Debug, Clone, Default)]
pub struct ChildPid(Arc<AtomicU32>);

impl ChildPid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, pid: u32) {
        self.0.store(pid, Ordering::SeqCst);
    }

    pub fn get(&self) -> Option<u32> {
        match self.0.load(Ordering::SeqCst) {
            0 => None,
            pid => Some(pid),
        }
    }

    pub fn take(&self) -> Option<u32> {
        match self.0.swap(0, Ordering::SeqCst) {
            0 => None,
            pid => Some(pid),
        }
    }
}

/// The one in-flight download
#[derive(Debug)]
pub struct DownloadSession {
    pub id: Uuid,
    cancel_requested: bool,
    worker: JoinHandle<()>,
}

/// Starts, tracks and cancels downloads. Lives on the UI thread.
pub struct Supervisor {
    tools: ToolSet,
    updates: UpdateSender,
    cancel: CancelFlag,
    child_pid: ChildPid,
    session: Option<DownloadSession>,
}

impl Supervisor {
    pub fn new(tools: ToolSet, updates: UpdateSender) -> Self {
        Self {
            tools,
            updates,
            cancel: CancelFlag::new(),
            child_pid: ChildPid::new(),
            session: None,
        }
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    /// Whether a session is in flight
    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// Process id of the running tool, once the worker has started it
    pub fn child_pid(&self) -> Option<u32> {
        self.child_pid.get()
    }

    /// Whether the worker thread has returned. Its final updates are queued
    /// by then.
    pub fn worker_finished(&self) -> bool {
        self.session
            .as_ref()
            .map(|session| session.worker.is_finished())
            .unwrap_or(false)
    }

    /// Block until the worker thread returns or `timeout` passes. Returns
    /// whether the worker finished.
    pub fn wait_for_worker(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.is_running() && !self.worker_finished() {
            if Instant::now() >= deadline {
                warn!("Download worker still running after {:?}", timeout);
                return false;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        true
    }

    /// The Download control is enabled exactly when no session exists
    pub fn can_start(&self) -> bool {
        self.session.is_none()
    }

    /// The Cancel control is enabled while a session runs and has not
    /// already been asked to stop
    pub fn can_cancel(&self) -> bool {
        self.session
            .as_ref()
            .map(|session| !session.cancel_requested)
            .unwrap_or(false)
    }

    /// Validate `request` and start a worker for it.
    ///
    /// Rejections (empty URL, unusable output directory, missing ffmpeg, a
    /// session already running) are reported as an error status and
    /// returned; no process is started for them.
    pub fn start(&mut self, mut request: DownloadRequest) -> Result<Uuid, VidSnareError> {
        let command = match self.prepare(&mut request) {
            Ok(command) => command,
            Err(e) => {
                warn!("Download rejected ({}): {}", e.kind(), e);
                self.updates.error(rejection_status(&e));
                return Err(e);
            }
        };

        let id = Uuid::new_v4();
        self.cancel.clear();
        self.child_pid.take();

        self.updates.info("Starting...");
        self.updates.progress(0.0);
        self.updates.send(crate::bridge::UiUpdate::ClearOutput);
        for line in request.preamble() {
            self.updates.output(line);
        }

        let context = SessionContext {
            id,
            request,
            command,
            cancel: self.cancel.clone(),
            child_pid: self.child_pid.clone(),
            updates: self.updates.clone(),
        };

        let worker = std::thread::Builder::new()
            .name(format!("download-{}", &id.to_string()[..8]))
            .spawn(move || run_session(context))
            .map_err(|source| {
                error!("Failed to spawn download worker: {}", source);
                self.updates.error("An unexpected error occurred.");
                VidSnareError::Spawn {
                    tool: "download worker".to_string(),
                    source,
                }
            })?;

        info!(session = %id, "Download session started");
        self.session = Some(DownloadSession {
            id,
            cancel_requested: false,
            worker,
        });
        Ok(id)
    }

    fn prepare(&self, request: &mut DownloadRequest) -> Result<ToolCommand, VidSnareError> {
        if self.session.is_some() {
            return Err(VidSnareError::SessionActive);
        }

        request.url = request.url.trim().to_string();
        if request.url.is_empty() {
            return Err(VidSnareError::EmptyUrl);
        }

        std::fs::create_dir_all(&request.output_directory).map_err(|source| {
            VidSnareError::InvalidOutputDirectory {
                path: request.output_directory.clone(),
                source,
            }
        })?;

        build_command(&self.tools.ytdlp, request, self.tools.ffmpeg_available)
    }

    /// Ask the running session to stop. Returns `false` when there is
    /// nothing to cancel or cancellation was already requested, so repeated
    /// calls have no further effect.
    pub fn cancel(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            debug!("No active download to cancel");
            return false;
        };
        if session.cancel_requested {
            debug!(session = %session.id, "Cancellation already requested");
            return false;
        }
        session.cancel_requested = true;

        if session.worker.is_finished() {
            warn!(session = %session.id, "Process already finished before termination");
            self.updates
                .output("[Warning] Process already finished before termination.");
            return true;
        }

        self.cancel.set();
        self.updates.info("Cancelling...");
        self.updates
            .output("[Info] Cancellation requested. Terminating process...");
        info!(session = %session.id, "Cancellation requested");

        // Until the worker publishes a pid it stops the tool on its next poll
        if let Some(pid) = self.child_pid.take() {
            match terminate_pid(pid) {
                Ok(()) => info!(session = %session.id, pid, "Termination requested"),
                Err(e) => {
                    warn!(
                        session = %session.id,
                        pid,
                        "Process already finished before termination: {}",
                        e
                    );
                    self.updates
                        .output("[Warning] Process already finished before termination.");
                }
            }
        }
        true
    }

    /// Called when the session's final update has been applied
    pub fn session_ended(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(session = %session.id, "Session closed");
            if session.worker.is_finished() && session.worker.join().is_err() {
                error!("Download worker panicked");
            }
        }
    }
}

/// Status line shown when `start` rejects a request
pub fn rejection_status(err: &VidSnareError) -> String {
    match err {
        VidSnareError::InvalidOutputDirectory { source, .. } => {
            format!("Invalid output directory: {}", source)
        }
        VidSnareError::EmptyUrl => err.to_string(),
        _ => format!("Error: {}", err),
    }
}

/// Everything the worker needs, moved into its thread
struct SessionContext {
    id: Uuid,
    request: DownloadRequest,
    command: ToolCommand,
    cancel: CancelFlag,
    child_pid: ChildPid,
    updates: UpdateSender,
}

/// Runs on every exit path of the worker, including panics: clears the
/// cancellation flag and releases the controls.
struct SessionCleanup {
    cancel: CancelFlag,
    child_pid: ChildPid,
    updates: UpdateSender,
    outcome: Option<SessionOutcome>,
}

impl Drop for SessionCleanup {
    fn drop(&mut self) {
        self.cancel.clear();
        self.child_pid.take();
        let outcome = self.outcome.take().unwrap_or_else(|| {
            self.updates.error("An unexpected error occurred.");
            SessionOutcome::Errored {
                kind: "WorkerPanic".to_string(),
                message: "download worker stopped unexpectedly".to_string(),
            }
        });
        self.updates.session_ended(outcome);
    }
}

fn run_session(ctx: SessionContext) {
    let mut cleanup = SessionCleanup {
        cancel: ctx.cancel.clone(),
        child_pid: ctx.child_pid.clone(),
        updates: ctx.updates.clone(),
        outcome: None,
    };

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(VidSnareError::from)
        .and_then(|runtime| runtime.block_on(supervise(&ctx)));

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err) => report_failure(&ctx, err),
    };
    info!(session = %ctx.id, ?outcome, "Download session finished");
    cleanup.outcome = Some(outcome);
}

async fn supervise(ctx: &SessionContext) -> Result<SessionOutcome, VidSnareError> {
    let command_line = ctx.command.display();
    ctx.updates.output(format!("Executing: {}", command_line));

    let mut child = spawn_tool(&ctx.command).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            VidSnareError::ToolNotFound {
                tool: ctx.command.tool_name(),
                command_line: command_line.clone(),
            }
        } else {
            VidSnareError::Spawn {
                tool: ctx.command.tool_name(),
                source,
            }
        }
    })?;
    info!(session = %ctx.id, pid = ?child.id(), "yt-dlp started");
    if let Some(pid) = child.id() {
        ctx.child_pid.publish(pid);
    }

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "stdout was not captured"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "stderr was not captured"))?;

    let mut stdout_lines = LossyLines::new(stdout);
    let mut stderr_lines = LossyLines::new(stderr);
    let mut stdout_open = true;
    let mut stderr_open = true;
    let mut state = ProgressState::new();
    let mut ticker = tokio::time::interval(READ_POLL);

    while stdout_open || stderr_open {
        if ctx.cancel.is_set() {
            return Ok(stop_child(ctx, &mut child));
        }

        tokio::select! {
            line = stdout_lines.next_line(), if stdout_open => match line? {
                Some(line) => handle_line(ctx, &mut state, line),
                None => stdout_open = false,
            },
            line = stderr_lines.next_line(), if stderr_open => match line? {
                Some(line) => handle_line(ctx, &mut state, line),
                None => stderr_open = false,
            },
            _ = ticker.tick() => {}
        }
    }

    let status = loop {
        if ctx.cancel.is_set() {
            return Ok(stop_child(ctx, &mut child));
        }

        tokio::select! {
            status = child.wait() => break status?,
            _ = ticker.tick() => {}
        }
    };

    ctx.child_pid.take();

    // Signal deaths have no exit code
    let code = status.code().unwrap_or(-1);
    info!(session = %ctx.id, code, "yt-dlp exited");
    Ok(finish(ctx, &state, code))
}

fn handle_line(ctx: &SessionContext, state: &mut ProgressState, line: String) {
    let kind = classify_line(&line, ctx.request.download_playlist);
    ctx.updates.output(line);

    let effect = state.observe(kind);
    if let Some(status) = effect.status {
        ctx.updates.info(status);
    }
    if let Some(progress) = effect.progress {
        ctx.updates.progress(progress);
    }
}

fn stop_child(ctx: &SessionContext, child: &mut Child) -> SessionOutcome {
    if ctx.child_pid.take().is_none() {
        debug!(session = %ctx.id, "Termination already requested by cancel");
        ctx.updates.info("Download Cancelled.");
        return SessionOutcome::Cancelled;
    }

    match request_termination(child) {
        Ok(Termination::Requested) => {
            info!(session = %ctx.id, "Termination requested");
        }
        Ok(Termination::AlreadyExited) => {
            warn!(session = %ctx.id, "Process already finished before termination");
            ctx.updates
                .output("[Warning] Process already finished before termination.");
        }
        Err(e) => {
            error!(session = %ctx.id, "Could not terminate process: {}", e);
            ctx.updates
                .output(format!("[Error] Could not terminate process: {}", e));
        }
    }

    ctx.updates.info("Download Cancelled.");
    SessionOutcome::Cancelled
}

fn finish(ctx: &SessionContext, state: &ProgressState, code: i32) -> SessionOutcome {
    let mode = ctx.request.mode_label();

    if code == 0 {
        ctx.updates.progress(1.0);
        ctx.updates.info(format!("{}finished successfully!", mode));
        SessionOutcome::Succeeded
    } else {
        ctx.updates.progress(state.last_percent);
        ctx.updates.error(format!("{}failed (Code: {})", mode, code));
        ctx.updates
            .output(format!("Error Code: {}. Check output above.", code));
        SessionOutcome::Failed { code }
    }
}

fn report_failure(ctx: &SessionContext, err: VidSnareError) -> SessionOutcome {
    error!(session = %ctx.id, kind = err.kind(), "Download failed: {}", err);

    match &err {
        VidSnareError::ToolNotFound { command_line, .. } => {
            ctx.updates.error(format!("Error: {}", err));
            ctx.updates.output(format!("Failed command: {}", command_line));
        }
        _ => {
            let status = if ctx.cancel.is_set() {
                "Cancelled during error."
            } else {
                "An unexpected error occurred."
            };
            ctx.updates.error(status);
            ctx.updates.output(format!("Error Kind: {}", err.kind()));
            ctx.updates.output(format!("Error Details: {}", err));
        }
    }

    SessionOutcome::Errored {
        kind: err.kind().to_string(),
        message: err.to_string(),
    }
}
