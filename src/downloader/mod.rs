//! Supervised yt-dlp downloads

pub mod command;
pub mod parser;
pub mod process;
pub mod progress;
pub mod request;
pub mod supervisor;

pub use command::{build_command, output_template, ToolCommand};
pub use parser::{classify_line, parse_percent, ItemLabel, LineKind};
pub use progress::ProgressState;
pub use request::{DownloadRequest, FormatChoice};
pub use supervisor::{rejection_status, CancelFlag, ChildPid, DownloadSession, Supervisor};
