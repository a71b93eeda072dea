//! yt-dlp discovery
//!
//! The downloader can be bundled next to the executable (or inside a macOS
//! .app bundle), installed on PATH, or sitting in one of the usual package
//! manager locations.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Program name used when nothing better is found
pub const YT_DLP_COMMAND: &str = "yt-dlp";

/// Find yt-dlp binary with priority:
/// 1. Bundled (next to the executable or inside .app bundle)
/// 2. System PATH
/// 3. Common installation paths
pub fn find_ytdlp() -> Option<PathBuf> {
    if let Some(bundled) = find_bundled_ytdlp() {
        info!("Using bundled yt-dlp: {:?}", bundled);
        return Some(bundled);
    }

    if let Ok(system) = which::which(YT_DLP_COMMAND) {
        info!("Using system yt-dlp: {:?}", system);
        return Some(system);
    }

    if let Some(common) = find_in_common_paths() {
        info!("Using yt-dlp from common path: {:?}", common);
        return Some(common);
    }

    warn!("yt-dlp not found anywhere");
    None
}

/// Resolve the program to invoke. Falls back to the bare command name so a
/// missing install surfaces as a "not found" error when the download starts.
pub fn resolve_ytdlp(override_path: Option<PathBuf>) -> PathBuf {
    override_path
        .or_else(find_ytdlp)
        .unwrap_or_else(|| PathBuf::from(YT_DLP_COMMAND))
}

fn binary_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "yt-dlp.exe"
    } else {
        YT_DLP_COMMAND
    }
}

fn find_bundled_ytdlp() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let exe_dir = exe_path.parent()?;
    debug!("Current executable: {:?}", exe_path);

    // Structure: VidSnare.app/Contents/MacOS/vidsnare
    //                               /Resources/bin/yt-dlp
    if exe_dir.ends_with("MacOS") {
        let contents_dir = exe_dir.parent()?;
        let bundled = contents_dir.join("Resources").join("bin").join(YT_DLP_COMMAND);
        if is_executable(&bundled) {
            return Some(bundled);
        }
    }

    let adjacent = exe_dir.join(binary_name());
    if is_executable(&adjacent) {
        return Some(adjacent);
    }

    None
}

fn find_in_common_paths() -> Option<PathBuf> {
    let mut candidates = vec![
        // macOS Homebrew (Apple Silicon)
        PathBuf::from("/opt/homebrew/bin/yt-dlp"),
        // macOS Homebrew (Intel)
        PathBuf::from("/usr/local/bin/yt-dlp"),
        PathBuf::from("/usr/bin/yt-dlp"),
    ];
    // pip --user installs
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".local").join("bin").join(YT_DLP_COMMAND));
    }

    candidates.into_iter().find(|path| is_executable(path))
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        std::fs::metadata(path)
            .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    {
        path.is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let path = resolve_ytdlp(Some(PathBuf::from("/opt/tools/yt-dlp")));
        assert_eq!(path, PathBuf::from("/opt/tools/yt-dlp"));
    }

    #[test]
    fn test_find_ytdlp_does_not_panic() {
        // yt-dlp might not be installed in CI
        let result = find_ytdlp();
        println!("yt-dlp found at: {:?}", result);
    }

    #[cfg(unix)]
    #[test]
    fn test_is_executable() {
        let path = PathBuf::from("/bin/sh");
        if path.exists() {
            assert!(is_executable(&path));
        }
        assert!(!is_executable(Path::new("/definitely/not/here")));
    }
}
