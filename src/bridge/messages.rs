//! Updates passed from the download worker to the UI

/// How a status line should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Error,
}

/// How a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Succeeded,
    Failed { code: i32 },
    Cancelled,
    /// The run loop aborted (tool missing, I/O failure, ...)
    Errored { kind: String, message: String },
}

/// Updates sent from the worker to the UI thread
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    Status { message: String, severity: Severity },
    /// Progress fraction; clamped to [0, 1] when applied
    Progress(f32),
    AppendOutput(String),
    ClearOutput,
    /// Always the last update of a session: re-enable Download, disable Cancel
    SessionEnded(SessionOutcome),
}

impl UiUpdate {
    pub fn info(message: impl Into<String>) -> Self {
        UiUpdate::Status {
            message: message.into(),
            severity: Severity::Info,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        UiUpdate::Status {
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn output(line: impl Into<String>) -> Self {
        UiUpdate::AppendOutput(line.into())
    }

    /// Variant name for log messages
    pub fn label(&self) -> &'static str {
        match self {
            UiUpdate::Status { .. } => "status",
            UiUpdate::Progress(_) => "progress",
            UiUpdate::AppendOutput(_) => "output",
            UiUpdate::ClearOutput => "clear-output",
            UiUpdate::SessionEnded(_) => "session-ended",
        }
    }
}
