//! Startup detection of the optional ffmpeg dependency

use std::path::PathBuf;
use tracing::{info, warn};

/// Helper tool needed for audio extraction
pub const FFMPEG_COMMAND: &str = "ffmpeg";

/// Locate ffmpeg on PATH
pub fn find_ffmpeg() -> Option<PathBuf> {
    match which::which(FFMPEG_COMMAND) {
        Ok(path) => {
            info!("ffmpeg found at: {}", path.display());
            Some(path)
        }
        Err(_) => {
            warn!("ffmpeg not found in PATH. Audio extraction/conversion will be disabled.");
            None
        }
    }
}

/// Tools the supervisor needs, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSet {
    /// Program used to run downloads
    pub ytdlp: PathBuf,
    /// Whether audio extraction can be offered
    pub ffmpeg_available: bool,
}

impl ToolSet {
    pub fn new(ytdlp: PathBuf, ffmpeg_available: bool) -> Self {
        Self {
            ytdlp,
            ffmpeg_available,
        }
    }

    /// Probe the system, honouring an explicit yt-dlp override
    pub fn detect(ytdlp_override: Option<PathBuf>) -> Self {
        let ytdlp = super::ytdlp::resolve_ytdlp(ytdlp_override);
        let ffmpeg_available = find_ffmpeg().is_some();
        Self::new(ytdlp, ffmpeg_available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_honours_override() {
        let tools = ToolSet::detect(Some(PathBuf::from("/custom/yt-dlp")));
        assert_eq!(tools.ytdlp, PathBuf::from("/custom/yt-dlp"));
        assert_eq!(tools.ffmpeg_available, which::which(FFMPEG_COMMAND).is_ok());
    }
}
