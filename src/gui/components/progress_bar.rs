//! Progress bar component

use crate::bridge::Severity;
use iced::widget::{column, progress_bar as iced_progress_bar, text};
use iced::{Element, Length};

/// Create the status line with the session progress bar underneath
pub fn progress_bar(
    status_line: String,
    severity: Severity,
    progress: f32,
) -> Element<'static, crate::gui::app::Message> {
    use crate::gui::theme;

    let style = if progress >= 1.0 {
        iced::theme::ProgressBar::Custom(Box::new(theme::ProgressBarCompleted))
    } else {
        iced::theme::ProgressBar::Custom(Box::new(theme::ProgressBarStyle))
    };

    let bar = iced_progress_bar(0.0..=1.0, progress.clamp(0.0, 1.0))
        .height(Length::Fixed(8.0))
        .style(style);

    let status_color = match severity {
        Severity::Info => theme::TEXT_SECONDARY,
        Severity::Error => theme::DANGER,
    };

    column![
        text(status_line)
            .size(13)
            .style(iced::theme::Text::Color(status_color)),
        bar,
    ]
    .spacing(6)
    .into()
}
