//! Persisted application settings
//!
//! Settings live in a small JSON document next to the working directory. A
//! missing or unreadable file is never an error: the app starts with defaults
//! and writes a fresh file on exit.

use crate::downloader::FormatChoice;
use crate::utils::error::VidSnareError;
use crate::utils::platform;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Settings file name, resolved relative to the working directory
pub const CONFIG_FILE: &str = "vidsnare_config.json";

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Last-used output directory
    pub output_directory: PathBuf,

    /// Last selected format
    pub last_format: FormatChoice,

    /// Download the whole playlist when the URL points into one
    pub download_playlist: bool,

    /// Prefix file names with the playlist index
    pub number_playlist: bool,
}

/// On-disk shape; every key is optional so partial files still load
#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    output_directory: Option<PathBuf>,
    #[serde(default)]
    last_format: Option<FormatChoice>,
    #[serde(default)]
    download_playlist: Option<bool>,
    #[serde(default)]
    number_playlist: Option<bool>,
}

impl AppSettings {
    /// Defaults with an explicit output directory
    pub fn with_output_directory(output_directory: PathBuf) -> Self {
        Self {
            output_directory,
            last_format: FormatChoice::VideoAudio,
            download_playlist: true,
            number_playlist: false,
        }
    }

    /// Load settings from `path`, falling back to defaults for anything
    /// missing. The default download folder is only resolved (and created)
    /// when the file does not name an output directory.
    pub fn load_from(path: &Path) -> Self {
        let stored = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<SettingsFile>(&content) {
                Ok(stored) => stored,
                Err(e) => {
                    info!(
                        "Config file '{}' is invalid ({}). Using defaults.",
                        path.display(),
                        e
                    );
                    SettingsFile::default()
                }
            },
            Err(e) => {
                info!(
                    "Config file '{}' not found or unreadable ({}). Using defaults.",
                    path.display(),
                    e
                );
                SettingsFile::default()
            }
        };

        let output_directory = stored
            .output_directory
            .unwrap_or_else(platform::default_download_dir);

        let mut settings = Self::with_output_directory(output_directory);
        if let Some(format) = stored.last_format {
            settings.last_format = format;
        }
        if let Some(playlist) = stored.download_playlist {
            settings.download_playlist = playlist;
        }
        if let Some(number) = stored.number_playlist {
            settings.number_playlist = number;
        }

        debug!("Loaded settings: {:?}", settings);
        settings
    }

    /// Write settings to `path` as pretty-printed JSON
    pub fn save_to(&self, path: &Path) -> Result<(), VidSnareError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        debug!("Saved settings to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let settings = AppSettings::load_from(&dir.path().join("absent.json"));

        assert_eq!(settings.last_format, FormatChoice::VideoAudio);
        assert!(settings.download_playlist);
        assert!(!settings.number_playlist);
        assert!(!settings.output_directory.as_os_str().is_empty());
    }

    #[test]
    fn corrupt_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        let settings = AppSettings::load_from(&path);
        assert_eq!(settings.last_format, FormatChoice::VideoAudio);
        assert!(settings.download_playlist);
    }

    #[test]
    fn partial_file_keeps_known_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let out = dir.path().join("videos");
        std::fs::write(
            &path,
            format!(
                r#"{{"output_directory": {:?}, "number_playlist": true}}"#,
                out.to_string_lossy()
            ),
        )
        .unwrap();

        let settings = AppSettings::load_from(&path);
        assert_eq!(settings.output_directory, out);
        assert!(settings.number_playlist);
        assert!(settings.download_playlist);
    }

    #[test]
    fn save_then_load_keeps_every_field() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let settings = AppSettings {
            output_directory: dir.path().join("music"),
            last_format: FormatChoice::AudioOnly,
            download_playlist: false,
            number_playlist: true,
        };

        settings.save_to(&path).unwrap();
        assert_eq!(AppSettings::load_from(&path), settings);
    }

    #[test]
    fn file_uses_stable_key_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        AppSettings::with_output_directory(dir.path().to_path_buf())
            .save_to(&path)
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["last_format"], "best_video_audio");
        assert_eq!(raw["download_playlist"], true);
        assert_eq!(raw["number_playlist"], false);
        assert!(raw["output_directory"].is_string());
    }
}
