//! Clipboard functionality

use crate::utils::error::VidSnareError;
use arboard::Clipboard;

/// Get clipboard text
pub fn get_clipboard_content() -> Result<String, VidSnareError> {
    let mut clipboard = Clipboard::new()
        .map_err(|e| VidSnareError::Clipboard(format!("Failed to access clipboard: {}", e)))?;

    clipboard
        .get_text()
        .map_err(|e| VidSnareError::Clipboard(format!("Failed to read clipboard: {}", e)))
}
