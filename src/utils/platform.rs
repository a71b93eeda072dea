//! Platform-specific utilities for VidSnare
//!
//! This module provides cross-platform helpers for:
//! - The default download directory
//! - Opening a directory in the native file manager

use crate::utils::error::VidSnareError;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Folder created in the user's home directory on first run
pub const DEFAULT_DOWNLOAD_FOLDER_NAME: &str = "VidSnareDownloads";

/// Returns the default download directory, creating it if needed
/// - All platforms: ~/VidSnareDownloads
///
/// Falls back to the current working directory when the folder cannot be
/// created.
pub fn default_download_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    ensure_dir_or_cwd(home.join(DEFAULT_DOWNLOAD_FOLDER_NAME))
}

fn ensure_dir_or_cwd(dir: PathBuf) -> PathBuf {
    match std::fs::create_dir_all(&dir) {
        Ok(()) => {
            debug!("Default download directory: {:?}", dir);
            dir
        }
        Err(e) => {
            error!(
                "Could not create default download directory '{}': {}",
                dir.display(),
                e
            );
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        }
    }
}

/// Open `dir` in the system file manager (Explorer, Finder or xdg-open)
pub fn open_folder(dir: &Path) -> Result<(), VidSnareError> {
    if !dir.is_dir() {
        return Err(VidSnareError::DirectoryNotFound(dir.to_path_buf()));
    }

    open::that(dir).map_err(|e| VidSnareError::OpenFolder(e.to_string()))
}

/// Human-readable status line for an `open_folder` result
pub fn open_folder_status(result: &Result<(), VidSnareError>) -> String {
    match result {
        Ok(()) => "Opened output folder.".to_string(),
        Err(e @ VidSnareError::OpenFolder(_)) => e.to_string(),
        Err(e) => format!("Error: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_uncreatable_dir_falls_back_to_cwd() {
        let temp = tempdir().unwrap();
        let blocker = temp.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let dir = ensure_dir_or_cwd(blocker.join("nested"));
        assert_eq!(dir, std::env::current_dir().unwrap());
    }

    #[test]
    fn test_creatable_dir_is_created() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("Downloads").join(DEFAULT_DOWNLOAD_FOLDER_NAME);

        let dir = ensure_dir_or_cwd(target.clone());
        assert_eq!(dir, target);
        assert!(target.is_dir());
    }

    #[test]
    fn test_open_missing_folder_is_reported() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("missing");

        let result = open_folder(&missing);
        assert!(matches!(result, Err(VidSnareError::DirectoryNotFound(_))));
        assert!(open_folder_status(&result).starts_with("Error: Directory not found: "));
    }

    #[test]
    fn test_open_failure_status_has_no_double_prefix() {
        let result = Err(VidSnareError::OpenFolder("no handler".to_string()));
        assert_eq!(
            open_folder_status(&result),
            "Error opening folder: no handler"
        );
        assert_eq!(open_folder_status(&Ok(())), "Opened output folder.");
    }
}
