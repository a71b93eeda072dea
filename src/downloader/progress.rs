//! Progress tracking for a running session

use crate::downloader::parser::{ItemLabel, LineKind};

/// Progress state owned by the worker thread
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressState {
    /// Last parsed fraction (0.0 to 1.0)
    pub last_percent: f32,
    /// Playlist entry currently downloading
    pub current_item: ItemLabel,
    /// Set by the first progress or processing line of the run
    pub download_started: bool,
}

/// UI-visible consequences of one classified line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineEffect {
    pub status: Option<String>,
    pub progress: Option<f32>,
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a classified line into the state
    pub fn observe(&mut self, kind: LineKind) -> LineEffect {
        let mut effect = LineEffect::default();

        match kind {
            LineKind::Item(label) => {
                self.current_item = label;
            }
            LineKind::Progress(percent) => {
                if !self.download_started {
                    effect.status = Some(format!("Downloading{}...", self.current_item));
                    self.download_started = true;
                }
                if let Some(percent) = percent {
                    self.last_percent = percent;
                    effect.progress = Some(percent);
                }
            }
            LineKind::Processing => {
                effect.status = Some(format!("Processing{}...", self.current_item));
                self.download_started = true;
            }
            LineKind::Plain => {}
        }

        effect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_progress_line_announces_download() {
        let mut state = ProgressState::new();

        let effect = state.observe(LineKind::Progress(Some(0.1)));
        assert_eq!(effect.status.as_deref(), Some("Downloading..."));
        assert_eq!(effect.progress, Some(0.1));

        let effect = state.observe(LineKind::Progress(Some(0.2)));
        assert_eq!(effect.status, None);
        assert_eq!(state.last_percent, 0.2);
    }

    #[test]
    fn unparsed_percent_keeps_last_value() {
        let mut state = ProgressState::new();
        state.observe(LineKind::Progress(Some(0.6)));

        let effect = state.observe(LineKind::Progress(None));
        assert_eq!(effect.progress, None);
        assert_eq!(state.last_percent, 0.6);
    }

    #[test]
    fn item_label_flows_into_statuses() {
        let mut state = ProgressState::new();
        state.observe(LineKind::Item(ItemLabel::Item(2)));

        let effect = state.observe(LineKind::Progress(Some(0.5)));
        assert_eq!(effect.status.as_deref(), Some("Downloading (Item 2)..."));

        let effect = state.observe(LineKind::Processing);
        assert_eq!(effect.status.as_deref(), Some("Processing (Item 2)..."));
        assert_eq!(effect.progress, None);
        assert_eq!(state.last_percent, 0.5);
    }

    #[test]
    fn plain_lines_change_nothing() {
        let mut state = ProgressState::new();
        assert_eq!(state.observe(LineKind::Plain), LineEffect::default());
        assert_eq!(state, ProgressState::new());
    }
}
