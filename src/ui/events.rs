/// Events page: search, filter, list, and the add/edit form

use iced::widget::{button, column, container, pick_list, row, text, text_input, Space};
use iced::{Alignment, Element, Length};

use crate::state::data::EventFilter;
use crate::{EventForm, Keepsake, Message};

pub fn view(app: &Keepsake) -> Element<'_, Message> {
    let header = row![
        text("Events").size(22),
        Space::with_width(Length::Fill),
        button("Add event").on_press(Message::OpenEventForm(None)),
    ]
    .align_y(Alignment::Center);

    let toolbar = row![
        text_input("Search events...", &app.event_search)
            .on_input(Message::EventSearchChanged)
            .width(Length::Fixed(260.0)),
        pick_list(
            EventFilter::ALL,
            Some(app.event_filter),
            Message::EventFilterPicked
        ),
    ]
    .spacing(12);

    let mut page = column![header, toolbar].spacing(14).padding(16);

    if app.events.is_empty() {
        page = page.push(super::empty_state(
            "No matching events",
            Some(("Add a new event", Message::OpenEventForm(None))),
        ));
        return page.into();
    }

    let mut list = column![].spacing(10);
    for event in &app.events {
        list = list.push(event_row(event));
    }
    page.push(list).into()
}

fn event_row(event: &crate::state::data::Event) -> Element<'_, Message> {
    let date_block = column![
        text(event.date.format("%-d").to_string()).size(24),
        text(event.date.format("%Y.%-m").to_string()).size(12),
    ]
    .align_x(Alignment::Center)
    .width(Length::Fixed(70.0));

    let description = event.description.as_deref().unwrap_or("No description yet");
    let details = column![
        text(&event.title).size(16),
        text(description.to_string()).size(13),
    ]
    .spacing(4)
    .width(Length::Fill);

    let actions = row![
        button(text("Edit").size(13))
            .style(button::secondary)
            .on_press(Message::OpenEventForm(Some(event.clone()))),
        button(text("Delete").size(13))
            .style(button::danger)
            .on_press(Message::DeleteEvent(event.id)),
    ]
    .spacing(6);

    container(
        row![date_block, details, actions]
            .spacing(14)
            .align_y(Alignment::Center),
    )
    .padding(12)
    .width(Length::Fill)
    .style(container::rounded_box)
    .into()
}

/// Modal card for creating or editing an event
pub fn form_card(form: &EventForm) -> Element<'_, Message> {
    let title = if form.id.is_some() {
        "Edit event"
    } else {
        "Add event"
    };

    let body = column![
        text_input("Title", &form.title).on_input(Message::EventTitleChanged),
        text_input("Date (YYYY-MM-DD)", &form.date).on_input(Message::EventDateChanged),
        text_input("Description", &form.description).on_input(Message::EventDescriptionChanged),
    ]
    .spacing(10);

    let actions = row![
        Space::with_width(Length::Fill),
        button("Cancel")
            .style(button::secondary)
            .on_press(Message::CloseModals),
        button("Save").on_press(Message::SubmitEventForm),
    ]
    .spacing(8);

    super::form_card(title, body.into(), actions.into())
}
