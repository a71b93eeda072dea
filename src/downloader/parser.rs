//! Classification of yt-dlp output lines
//!
//! yt-dlp is run with `--newline`, so every progress refresh arrives as its
//! own line:
//!
//! ```text
//! [download] Downloading item 3 of 12
//! [download]  42.5% of   10.50MiB at    1.23MiB/s ETA 00:05
//! [Merger] Merging formats into "clip [abc].mkv"
//! [ExtractAudio] Destination: clip [abc].mp3
//! ```

use std::fmt;
use tracing::trace;

const DOWNLOAD_TAG: &str = "[download]";
const ITEM_PREFIX: &str = "[download] Downloading item ";
const PROCESSING_TAGS: [&str; 2] = ["[ExtractAudio]", "[Merger]"];

/// Which playlist entry is currently downloading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemLabel {
    #[default]
    None,
    Item(u32),
    /// An item announcement whose number could not be read
    Playlist,
}

impl fmt::Display for ItemLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemLabel::None => Ok(()),
            ItemLabel::Item(n) => write!(f, " (Item {})", n),
            ItemLabel::Playlist => f.write_str(" (Playlist)"),
        }
    }
}

/// What a single output line means for the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineKind {
    /// A new playlist entry started
    Item(ItemLabel),
    /// A download progress line; `None` when no percentage could be read
    Progress(Option<f32>),
    /// Post-processing (audio extraction or stream merging)
    Processing,
    /// Anything else
    Plain,
}

/// Classify one line of tool output. Item announcements are only
/// recognised in playlist mode.
pub fn classify_line(line: &str, playlist_mode: bool) -> LineKind {
    if playlist_mode && line.starts_with(ITEM_PREFIX) {
        return LineKind::Item(parse_item_label(line));
    }

    if line.contains(DOWNLOAD_TAG) && line.contains('%') {
        return LineKind::Progress(parse_percent(line));
    }

    if PROCESSING_TAGS.iter().any(|tag| line.contains(tag)) {
        return LineKind::Processing;
    }

    LineKind::Plain
}

fn parse_item_label(line: &str) -> ItemLabel {
    let mut parts = line.split_whitespace();
    if parts.by_ref().find(|part| *part == "item").is_none() {
        return ItemLabel::Playlist;
    }

    parts
        .next()
        .and_then(|n| n.parse::<u32>().ok())
        .map(ItemLabel::Item)
        .unwrap_or(ItemLabel::Playlist)
}

/// Parse the last `<number>%` token of a line into a fraction in [0, 1]
pub fn parse_percent(line: &str) -> Option<f32> {
    let token = line
        .split_whitespace()
        .filter_map(|part| part.strip_suffix('%'))
        .filter(|number| number.starts_with(|c: char| c.is_ascii_digit()))
        .last()?;

    let value = match token.parse::<f32>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            trace!("Ignoring malformed percentage {:?}", token);
            return None;
        }
    };

    Some((value / 100.0).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_line_yields_fraction() {
        let kind = classify_line("[download]  42.5% of 10.50MiB at 1.23MiB/s ETA 00:05", false);
        assert_eq!(kind, LineKind::Progress(Some(0.425)));
    }

    #[test]
    fn full_progress_is_one() {
        assert_eq!(
            classify_line("[download] 100% of 10.50MiB in 00:03", false),
            LineKind::Progress(Some(1.0))
        );
    }

    #[test]
    fn last_percentage_token_wins() {
        assert_eq!(parse_percent("[download] 10% then 55.5% done"), Some(0.555));
    }

    #[test]
    fn malformed_percentage_is_tolerated() {
        assert_eq!(
            classify_line("[download] abc% of ???", false),
            LineKind::Progress(None)
        );
        assert_eq!(parse_percent("[download] 1.2.3%"), None);
    }

    #[test]
    fn download_line_without_percent_is_plain() {
        assert_eq!(
            classify_line("[download] Destination: clip [abc].webm", false),
            LineKind::Plain
        );
    }

    #[test]
    fn percent_without_download_tag_is_plain() {
        assert_eq!(classify_line("[youtube] 50% sure", false), LineKind::Plain);
    }

    #[test]
    fn item_announcement_in_playlist_mode() {
        assert_eq!(
            classify_line("[download] Downloading item 3 of 12", true),
            LineKind::Item(ItemLabel::Item(3))
        );
        assert_eq!(ItemLabel::Item(3).to_string(), " (Item 3)");
    }

    #[test]
    fn unreadable_item_number_falls_back() {
        assert_eq!(
            classify_line("[download] Downloading item x of 12", true),
            LineKind::Item(ItemLabel::Playlist)
        );
        assert_eq!(
            classify_line("[download] Downloading item ", true),
            LineKind::Item(ItemLabel::Playlist)
        );
        assert_eq!(ItemLabel::Playlist.to_string(), " (Playlist)");
    }

    #[test]
    fn item_announcement_ignored_outside_playlist_mode() {
        assert_eq!(
            classify_line("[download] Downloading item 3 of 12", false),
            LineKind::Plain
        );
    }

    #[test]
    fn processing_tags() {
        assert_eq!(
            classify_line("[Merger] Merging formats into \"a.mkv\"", false),
            LineKind::Processing
        );
        assert_eq!(
            classify_line("[ExtractAudio] Destination: a.mp3", true),
            LineKind::Processing
        );
    }

    #[test]
    fn empty_label_renders_nothing() {
        assert_eq!(ItemLabel::None.to_string(), "");
    }
}
