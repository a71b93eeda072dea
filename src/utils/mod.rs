//! Utility modules for error handling, configuration and platform glue

pub mod config;
pub mod error;
pub mod platform;

// Re-export for convenience
pub use config::{AppSettings, CONFIG_FILE};
pub use error::VidSnareError;
pub use platform::{default_download_dir, open_folder, open_folder_status};
