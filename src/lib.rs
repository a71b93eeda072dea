//! VidSnare library

pub mod bridge;
pub mod downloader;
pub mod gui;
pub mod headless;
pub mod tools;
pub mod utils;

// Re-export main types for easier use
pub use bridge::{SessionOutcome, Severity, UiUpdate, UpdateQueue, UpdateSender};
pub use downloader::{DownloadRequest, FormatChoice, Supervisor};
pub use gui::{AppFlags, Message, VidSnareApp};
pub use tools::ToolSet;
pub use utils::{AppSettings, VidSnareError};
