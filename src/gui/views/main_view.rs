//! Main view implementation - Light Theme

use crate::downloader::FormatChoice;
use crate::gui::app::{DownloadPanel, Message};
use crate::gui::components::{output_log, progress_bar, url_input};
use iced::widget::{button, checkbox, column, container, radio, row, text, text_input, Space};
use iced::{Alignment, Element, Length};

const LABEL_WIDTH: f32 = 80.0;

/// Everything the main view renders
pub struct MainViewState<'a> {
    pub url_value: &'a str,
    pub output_directory: &'a str,
    pub format: FormatChoice,
    pub ffmpeg_available: bool,
    pub download_playlist: bool,
    pub number_playlist: bool,
    pub can_start: bool,
    pub can_cancel: bool,
    pub panel: &'a DownloadPanel,
}

fn label(content: &str) -> Element<'static, Message> {
    use crate::gui::theme;
    text(content)
        .size(14)
        .width(Length::Fixed(LABEL_WIDTH))
        .style(iced::theme::Text::Color(theme::GRAY_600))
        .into()
}

fn format_row(format: FormatChoice, ffmpeg_available: bool) -> Element<'static, Message> {
    use crate::gui::theme;

    let mut options = row![label("Format:")]
        .spacing(16)
        .align_items(Alignment::Center);

    for choice in FormatChoice::ALL {
        if choice == FormatChoice::AudioOnly && !ffmpeg_available {
            options = options.push(
                text(format!("{} (ffmpeg needed)", choice.label()))
                    .size(14)
                    .style(iced::theme::Text::Color(theme::GRAY_400)),
            );
        } else {
            options = options.push(
                radio(choice.label(), choice, Some(format), Message::FormatSelected).size(16),
            );
        }
    }

    options.into()
}

/// Create the main view
pub fn main_view(state: MainViewState<'_>) -> Element<'static, Message> {
    use crate::gui::theme;

    let form = container(
        column![
            text("Download Video")
                .size(26)
                .style(iced::theme::Text::Color(theme::GRAY_800)),
            row![
                label("Video URL:"),
                url_input(
                    state.url_value,
                    Message::UrlInputChanged,
                    Message::PasteFromClipboard,
                ),
            ]
            .align_items(Alignment::Center),
            format_row(state.format, state.ffmpeg_available),
            row![
                label("Playlist:"),
                checkbox("Download Full Playlist", state.download_playlist)
                    .on_toggle(Message::PlaylistToggled),
                checkbox("Number Items", state.number_playlist)
                    .on_toggle(Message::NumberingToggled),
            ]
            .spacing(16)
            .align_items(Alignment::Center),
            row![
                label("Save To:"),
                text_input("Output folder", state.output_directory)
                    .on_input(Message::OutputDirectoryChanged)
                    .padding(10)
                    .width(Length::Fill)
                    .style(iced::theme::TextInput::Custom(Box::new(theme::InputStyle))),
                button(text("Browse...").size(14))
                    .on_press(Message::BrowseOutputDirectory)
                    .padding([8, 12])
                    .style(iced::theme::Button::Custom(Box::new(theme::SecondaryButton))),
                button(text("Open").size(14))
                    .on_press(Message::OpenOutputFolder)
                    .padding([8, 12])
                    .style(iced::theme::Button::Custom(Box::new(theme::SecondaryButton))),
            ]
            .spacing(12)
            .align_items(Alignment::Center),
            row![
                Space::with_width(Length::Fill),
                button(text("Cancel").size(15))
                    .on_press_maybe(state.can_cancel.then_some(Message::CancelPressed))
                    .padding([12, 24])
                    .style(iced::theme::Button::Custom(Box::new(
                        theme::DestructiveButton
                    ))),
                button(text("Download").size(15))
                    .on_press_maybe(state.can_start.then_some(Message::DownloadPressed))
                    .padding([12, 28])
                    .style(iced::theme::Button::Custom(Box::new(theme::PrimaryButton))),
            ]
            .spacing(12),
        ]
        .spacing(14),
    )
    .padding(24)
    .width(Length::Fill)
    .style(iced::theme::Container::Custom(Box::new(theme::GlassContainer)));

    let session = column![
        progress_bar(
            state.panel.status_line(),
            state.panel.severity,
            state.panel.progress,
        ),
        output_log(&state.panel.output),
    ]
    .spacing(12)
    .height(Length::Fill);

    container(column![form, session].spacing(16).padding(20))
        .width(Length::Fill)
        .height(Length::Fill)
        .style(iced::theme::Container::Custom(Box::new(
            theme::MainGradientContainer,
        )))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(panel: &DownloadPanel, ffmpeg_available: bool) -> MainViewState<'_> {
        MainViewState {
            url_value: "https://example.com/v",
            output_directory: "/tmp/out",
            format: FormatChoice::VideoAudio,
            ffmpeg_available,
            download_playlist: true,
            number_playlist: false,
            can_start: true,
            can_cancel: false,
            panel,
        }
    }

    #[test]
    fn view_builds_with_playlist_toggles() {
        let mut panel = DownloadPanel::default();
        panel.output.push("URL: https://example.com/v".to_string());

        let _with_audio: Element<'static, Message> = main_view(state(&panel, true));
        let _without_audio: Element<'static, Message> = main_view(state(&panel, false));
    }

    #[test]
    fn format_row_builds_for_both_tool_states() {
        let _ = format_row(FormatChoice::AudioOnly, true);
        let _ = format_row(FormatChoice::VideoAudio, false);
    }
}
