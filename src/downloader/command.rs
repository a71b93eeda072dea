//! yt-dlp command line construction

use crate::downloader::request::{DownloadRequest, FormatChoice};
use crate::tools::FFMPEG_COMMAND;
use crate::utils::error::VidSnareError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// File name template for single items and un-numbered playlists
pub const TITLE_TEMPLATE: &str = "%(title)s [%(id)s].%(ext)s";

/// File name template for numbered playlist items
pub const INDEXED_TEMPLATE: &str = "%(playlist_index)s - %(title)s [%(id)s].%(ext)s";

/// Placeholder expanded by yt-dlp to the item's position in the playlist
pub const INDEX_PLACEHOLDER: &str = "%(playlist_index)s";

/// Flags passed on every run: parseable progress on its own line, no ANSI
/// colours, restart partial files, keep going past broken playlist items.
const COMMON_FLAGS: [&str; 5] = [
    "--progress",
    "--newline",
    "--no-colors",
    "--no-continue",
    "--ignore-errors",
];

/// A fully built invocation of the external tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl ToolCommand {
    /// Space-joined command line for the output panel
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|part| part.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Short tool name for status messages
    pub fn tool_name(&self) -> String {
        self.program
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.to_string_lossy().into_owned())
    }
}

/// File name template for a request
pub fn output_template(request: &DownloadRequest) -> &'static str {
    if request.download_playlist && request.number_playlist_items {
        INDEXED_TEMPLATE
    } else {
        TITLE_TEMPLATE
    }
}

/// Full `-o` argument: output directory joined with the file name template
pub fn output_path(request: &DownloadRequest) -> PathBuf {
    Path::new(&request.output_directory).join(output_template(request))
}

/// Build the yt-dlp invocation for `request`.
///
/// Audio-only requests need ffmpeg; without it this fails with
/// [`VidSnareError::DependencyMissing`] and nothing is run.
pub fn build_command(
    program: &Path,
    request: &DownloadRequest,
    ffmpeg_available: bool,
) -> Result<ToolCommand, VidSnareError> {
    let mut args: Vec<OsString> = Vec::new();

    match request.format {
        FormatChoice::VideoAudio => {
            args.extend(["-f", "bv*+ba/b"].map(OsString::from));
        }
        FormatChoice::AudioOnly => {
            if !ffmpeg_available {
                return Err(VidSnareError::DependencyMissing {
                    tool: FFMPEG_COMMAND,
                });
            }
            args.extend(["-x", "--audio-format", "mp3", "-f", "ba"].map(OsString::from));
        }
    }

    if !request.download_playlist {
        args.push("--no-playlist".into());
    }

    args.push("-o".into());
    args.push(output_path(request).into_os_string());

    args.extend(COMMON_FLAGS.map(OsString::from));
    args.push(request.url.clone().into());

    Ok(ToolCommand {
        program: program.to_path_buf(),
        args,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn request(playlist: bool, number: bool) -> DownloadRequest {
        DownloadRequest::new("https://x/1", "/downloads").with_playlist(playlist, number)
    }

    fn has_flag(command: &ToolCommand, flag: &str) -> bool {
        command.args.iter().any(|arg| arg == flag)
    }

    #[test]
    fn video_audio_selects_best_streams() {
        let cmd = build_command(Path::new("yt-dlp"), &request(false, false), false).unwrap();
        let args: Vec<_> = cmd.args.iter().map(|a| a.to_string_lossy()).collect();

        assert_eq!(args[0], "-f");
        assert_eq!(args[1], "bv*+ba/b");
        assert!(!has_flag(&cmd, "-x"));
        assert_eq!(args.last().unwrap(), "https://x/1");
    }

    #[test]
    fn audio_only_requires_ffmpeg() {
        let req = request(false, false).with_format(FormatChoice::AudioOnly);
        let err = build_command(Path::new("yt-dlp"), &req, false).unwrap_err();
        assert!(matches!(err, VidSnareError::DependencyMissing { tool: "ffmpeg" }));

        let cmd = build_command(Path::new("yt-dlp"), &req, true).unwrap();
        assert!(has_flag(&cmd, "-x"));
        assert!(has_flag(&cmd, "mp3"));
        assert!(has_flag(&cmd, "ba"));
    }

    #[test]
    fn single_video_disables_playlist() {
        let cmd = build_command(Path::new("yt-dlp"), &request(false, true), false).unwrap();
        assert!(has_flag(&cmd, "--no-playlist"));

        let cmd = build_command(Path::new("yt-dlp"), &request(true, true), false).unwrap();
        assert!(!has_flag(&cmd, "--no-playlist"));
    }

    #[test]
    fn common_flags_always_present() {
        let cmd = build_command(Path::new("yt-dlp"), &request(true, false), false).unwrap();
        for flag in COMMON_FLAGS {
            assert!(has_flag(&cmd, flag), "missing {}", flag);
        }
    }

    #[test]
    fn output_argument_joins_directory_and_template() {
        let cmd = build_command(Path::new("yt-dlp"), &request(true, true), false).unwrap();
        let position = cmd.args.iter().position(|a| a == "-o").unwrap();
        assert_eq!(
            PathBuf::from(&cmd.args[position + 1]),
            Path::new("/downloads").join(INDEXED_TEMPLATE)
        );
    }

    #[test]
    fn display_joins_program_and_args() {
        let cmd = build_command(Path::new("/usr/bin/yt-dlp"), &request(false, false), false)
            .unwrap();
        let line = cmd.display();
        assert!(line.starts_with("/usr/bin/yt-dlp -f bv*+ba/b --no-playlist -o "));
        assert!(line.ends_with("--ignore-errors https://x/1"));
        assert_eq!(cmd.tool_name(), "yt-dlp");
    }

    proptest! {
        #[test]
        fn single_items_never_use_the_index(number in any::<bool>(), url in "[a-z:/.0-9]{1,40}") {
            let req = DownloadRequest::new(url, "/out").with_playlist(false, number);
            prop_assert!(!output_template(&req).contains(INDEX_PLACEHOLDER));
        }

        #[test]
        fn numbering_controls_the_index_prefix(number in any::<bool>()) {
            let req = DownloadRequest::new("https://x/list", "/out").with_playlist(true, number);
            let template = output_template(&req);
            prop_assert_eq!(template.starts_with(INDEX_PLACEHOLDER), number);
            if !number {
                prop_assert!(!template.contains(INDEX_PLACEHOLDER));
            }
        }
    }
}
