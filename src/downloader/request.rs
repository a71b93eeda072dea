//! Download request model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Output format chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FormatChoice {
    /// Best video stream merged with best audio, or best combined stream
    #[default]
    #[serde(rename = "best_video_audio")]
    VideoAudio,
    /// Audio extracted and converted to mp3 (needs ffmpeg)
    #[serde(rename = "audio_mp3")]
    AudioOnly,
}

impl FormatChoice {
    pub const ALL: [FormatChoice; 2] = [FormatChoice::VideoAudio, FormatChoice::AudioOnly];

    /// Key stored in the settings file and echoed in the run preamble
    pub fn key(&self) -> &'static str {
        match self {
            FormatChoice::VideoAudio => "best_video_audio",
            FormatChoice::AudioOnly => "audio_mp3",
        }
    }

    /// Label for radio buttons
    pub fn label(&self) -> &'static str {
        match self {
            FormatChoice::VideoAudio => "Video+Audio (Best)",
            FormatChoice::AudioOnly => "Audio Only (mp3)",
        }
    }
}

impl fmt::Display for FormatChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything needed to run one download. Built from the form when the user
/// presses Download and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub output_directory: PathBuf,
    pub format: FormatChoice,
    pub download_playlist: bool,
    pub number_playlist_items: bool,
}

impl DownloadRequest {
    /// Single-video request with the default format
    pub fn new(url: impl Into<String>, output_directory: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            output_directory: output_directory.into(),
            format: FormatChoice::VideoAudio,
            download_playlist: false,
            number_playlist_items: false,
        }
    }

    pub fn with_format(mut self, format: FormatChoice) -> Self {
        self.format = format;
        self
    }

    pub fn with_playlist(mut self, download_playlist: bool, number_items: bool) -> Self {
        self.download_playlist = download_playlist;
        self.number_playlist_items = number_items;
        self
    }

    /// Prefix of completion status lines ("Download " / "Playlist download ")
    pub fn mode_label(&self) -> &'static str {
        if self.download_playlist {
            "Playlist download "
        } else {
            "Download "
        }
    }

    /// Lines written to the output panel before the tool starts
    pub fn preamble(&self) -> Vec<String> {
        let mut lines = vec![
            format!("URL: {}", self.url),
            format!("Format: {}", self.format.key()),
            format!(
                "Playlist Mode: {}",
                if self.download_playlist {
                    "Full Playlist"
                } else {
                    "Single Video"
                }
            ),
        ];
        if self.download_playlist {
            lines.push(format!(
                "Numbering: {}",
                if self.number_playlist_items {
                    "Enabled"
                } else {
                    "Disabled"
                }
            ));
        }
        lines.push(format!("Saving to: {}", self.output_directory.display()));
        lines.push("-".repeat(20));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preamble_mentions_numbering_only_for_playlists() {
        let single = DownloadRequest::new("https://x/1", "/tmp/out");
        assert!(!single.preamble().iter().any(|l| l.starts_with("Numbering")));
        assert_eq!(single.preamble().last().unwrap(), "--------------------");

        let playlist = single.with_playlist(true, true);
        let lines = playlist.preamble();
        assert!(lines.contains(&"Playlist Mode: Full Playlist".to_string()));
        assert!(lines.contains(&"Numbering: Enabled".to_string()));
    }

    #[test]
    fn mode_label_follows_playlist_flag() {
        let request = DownloadRequest::new("u", "/tmp");
        assert_eq!(request.mode_label(), "Download ");
        assert_eq!(
            request.with_playlist(true, false).mode_label(),
            "Playlist download "
        );
    }

    #[test]
    fn format_keys_match_serialized_form() {
        for format in FormatChoice::ALL {
            let json = serde_json::to_string(&format).unwrap();
            assert_eq!(json, format!("\"{}\"", format.key()));
        }
    }
}
