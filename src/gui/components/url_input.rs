//! URL input component

use crate::gui::app::Message;
use iced::widget::{button, row, text, text_input, tooltip};
use iced::{Alignment, Element, Length};

/// Create a URL input field with a paste button
pub fn url_input(
    value: &str,
    on_change: impl Fn(String) -> Message + 'static,
    on_paste: Message,
) -> Element<'static, Message> {
    use crate::gui::theme;

    row![
        text_input("Paste video or playlist URL here...", value)
            .on_input(on_change)
            .padding(12)
            .width(Length::Fill)
            .style(iced::theme::TextInput::Custom(Box::new(theme::InputStyle))),
        tooltip(
            button(text("Paste").size(14))
                .on_press(on_paste)
                .padding([8, 12])
                .style(iced::theme::Button::Custom(Box::new(theme::SecondaryButton))),
            "Paste from clipboard",
            tooltip::Position::Bottom,
        ),
    ]
    .spacing(12)
    .align_items(Alignment::Center)
    .into()
}
