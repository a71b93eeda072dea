//! GUI components

pub mod output_log;
pub mod progress_bar;
pub mod url_input;

// Re-export for convenience
pub use output_log::output_log;
pub use progress_bar::progress_bar;
pub use url_input::url_input;
