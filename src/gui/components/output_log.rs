//! Scrolling tool output

use crate::gui::app::{Message, OUTPUT_LOG_ID};
use iced::widget::{container, scrollable, text, Column};
use iced::{Element, Length};

pub fn output_log(lines: &[String]) -> Element<'static, Message> {
    use crate::gui::theme;

    let content = Column::with_children(
        lines
            .iter()
            .map(|line| text(line).size(12).into())
            .collect::<Vec<Element<'static, Message>>>(),
    )
    .spacing(2)
    .padding(10)
    .width(Length::Fill);

    container(
        scrollable(content)
            .id(scrollable::Id::new(OUTPUT_LOG_ID))
            .height(Length::Fill)
            .style(iced::theme::Scrollable::Custom(Box::new(
                theme::ScrollableStyle,
            ))),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .style(iced::theme::Container::Custom(Box::new(theme::LogContainer)))
    .into()
}
