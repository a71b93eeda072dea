//! Error handling for VidSnare

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for VidSnare
#[derive(Debug, Error)]
pub enum VidSnareError {
    #[error("Please enter a video URL.")]
    EmptyUrl,

    #[error("Invalid output directory: {path}: {source}")]
    InvalidOutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Audio extraction selected, but {tool} is not available.")]
    DependencyMissing { tool: &'static str },

    #[error("'{tool}' not found.")]
    ToolNotFound { tool: String, command_line: String },

    #[error("A download is already running")]
    SessionActive,

    #[error("Failed to start {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Clipboard is empty or does not contain text.")]
    Clipboard(String),

    #[error("Error opening folder: {0}")]
    OpenFolder(String),

    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl VidSnareError {
    /// Short category name used in logs and in the output panel
    pub fn kind(&self) -> &'static str {
        match self {
            VidSnareError::EmptyUrl | VidSnareError::InvalidOutputDirectory { .. } => {
                "ValidationError"
            }
            VidSnareError::DependencyMissing { .. } => "DependencyMissing",
            VidSnareError::ToolNotFound { .. } => "ToolNotFound",
            VidSnareError::SessionActive => "SessionActive",
            VidSnareError::Spawn { .. } => "SpawnError",
            VidSnareError::Clipboard(_) => "ClipboardError",
            VidSnareError::OpenFolder(_) | VidSnareError::DirectoryNotFound(_) => {
                "OpenFolderError"
            }
            VidSnareError::IoError(_) => "IoError",
            VidSnareError::SerializationError(_) => "SerializationError",
        }
    }

    /// Whether the error was raised before any process could start
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            VidSnareError::EmptyUrl
                | VidSnareError::InvalidOutputDirectory { .. }
                | VidSnareError::DependencyMissing { .. }
                | VidSnareError::SessionActive
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_flagged() {
        assert!(VidSnareError::EmptyUrl.is_validation());
        assert!(VidSnareError::DependencyMissing { tool: "ffmpeg" }.is_validation());
        assert!(!VidSnareError::ToolNotFound {
            tool: "yt-dlp".to_string(),
            command_line: "yt-dlp x".to_string(),
        }
        .is_validation());
    }

    #[test]
    fn dependency_message_names_the_tool() {
        let err = VidSnareError::DependencyMissing { tool: "ffmpeg" };
        assert_eq!(
            err.to_string(),
            "Audio extraction selected, but ffmpeg is not available."
        );
        assert_eq!(err.kind(), "DependencyMissing");
    }
}
