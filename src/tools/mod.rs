//! External tool discovery

pub mod detect;
pub mod ytdlp;

pub use detect::{find_ffmpeg, ToolSet, FFMPEG_COMMAND};
pub use ytdlp::{find_ytdlp, resolve_ytdlp, YT_DLP_COMMAND};
