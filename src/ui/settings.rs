/// Settings page: scalar settings, carousel slide manager, backups

use iced::widget::{button, column, container, row, text, text_input, Space};
use iced::{Alignment, ContentFit, Element, Length};

use crate::state::carousel::CarouselModel;
use crate::{CarouselEditor, Keepsake, Message};

pub fn view(app: &Keepsake) -> Element<'_, Message> {
    column![
        text("Settings").size(22),
        dates_section(app),
        words_section(app),
        carousel_section(app),
        row![
            Space::with_width(Length::Fill),
            button("Save settings").on_press(Message::SaveSettings),
        ],
        backups_section(app),
    ]
    .spacing(18)
    .padding(16)
    .into()
}

fn dates_section(app: &Keepsake) -> Element<'_, Message> {
    section(
        "Important dates",
        column![
            labeled(
                "Together since",
                text_input("YYYY-MM-DD", &app.settings.relationship_date)
                    .on_input(Message::RelationshipDateChanged)
                    .into(),
            ),
            labeled(
                "First met on",
                text_input("YYYY-MM-DD", &app.settings.first_meeting_date)
                    .on_input(Message::FirstMeetingDateChanged)
                    .into(),
            ),
        ]
        .spacing(10)
        .into(),
    )
}

fn words_section(app: &Keepsake) -> Element<'_, Message> {
    section(
        "Words",
        column![
            labeled(
                "Motto",
                text_input("Our motto", &app.settings.motto)
                    .on_input(Message::MottoChanged)
                    .into(),
            ),
            labeled(
                "Values",
                text_input("What we value", &app.settings.values)
                    .on_input(Message::ValuesChanged)
                    .into(),
            ),
            labeled(
                "Rules",
                text_input("Our rules", &app.settings.rules)
                    .on_input(Message::RulesChanged)
                    .into(),
            ),
        ]
        .spacing(10)
        .into(),
    )
}

/// The slide manager renders the raw model: unlike the home carousel it
/// may legitimately be empty.
fn carousel_section(app: &Keepsake) -> Element<'_, Message> {
    let mut list = column![].spacing(8);

    if app.carousel.is_empty() {
        list = list.push(text("No slides yet, add one below").size(13));
    }

    for (index, item) in app.carousel.items().iter().enumerate() {
        let url = CarouselModel::resolve_display_url(item, index);
        let thumbnail: Element<'_, Message> = match app.image_for(&url) {
            Some(handle) => iced::widget::image(handle.clone())
                .width(Length::Fixed(72.0))
                .height(Length::Fixed(48.0))
                .content_fit(ContentFit::Cover)
                .into(),
            None => container(Space::with_width(Length::Fixed(0.0)))
                .width(Length::Fixed(72.0))
                .height(Length::Fixed(48.0))
                .style(container::rounded_box)
                .into(),
        };

        let captions = column![
            text(&item.title).size(14),
            text(&item.subtitle).size(12),
        ]
        .spacing(2)
        .width(Length::Fill);

        let actions = row![
            button(text("Edit").size(13))
                .style(button::secondary)
                .on_press(Message::EditCarouselItem(index)),
            button(text("Delete").size(13))
                .style(button::danger)
                .on_press(Message::DeleteCarouselItem(index)),
        ]
        .spacing(6);

        list = list.push(
            container(
                row![thumbnail, captions, actions]
                    .spacing(12)
                    .align_y(Alignment::Center),
            )
            .padding(8)
            .width(Length::Fill)
            .style(container::rounded_box),
        );
    }

    list = list.push(
        button("Add slide")
            .style(button::secondary)
            .on_press(Message::AddCarouselItem),
    );

    section("Carousel slides", list.into())
}

fn backups_section(app: &Keepsake) -> Element<'_, Message> {
    let mut list = column![
        row![
            text("Backups").size(17),
            Space::with_width(Length::Fill),
            button("Create backup").on_press(Message::CreateBackup),
        ]
        .align_y(Alignment::Center),
    ]
    .spacing(8);

    if app.backups.is_empty() {
        return container(list.push(text("No backup files yet").size(13)))
            .padding(14)
            .width(Length::Fill)
            .style(container::rounded_box)
            .into();
    }

    for backup in &app.backups {
        list = list.push(
            row![
                text(&backup.filename).size(13).width(Length::Fill),
                text(super::format_file_size(backup.size)).size(13),
                text(&backup.created_at).size(13),
                button(text("Restore").size(13))
                    .style(button::secondary)
                    .on_press(Message::RestoreBackup(backup.filename.clone())),
                button(text("Delete").size(13))
                    .style(button::danger)
                    .on_press(Message::DeleteBackup(backup.filename.clone())),
            ]
            .spacing(10)
            .align_y(Alignment::Center),
        );
    }

    container(list)
        .padding(14)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

/// Modal card for editing one carousel slide
pub fn editor_card(editor: &CarouselEditor) -> Element<'_, Message> {
    let body = column![
        text_input("Image URL", &editor.image_url).on_input(Message::EditorImageUrlChanged),
        text_input("Title", &editor.title).on_input(Message::EditorTitleChanged),
        text_input("Subtitle", &editor.subtitle).on_input(Message::EditorSubtitleChanged),
    ]
    .spacing(10);

    let actions = row![
        Space::with_width(Length::Fill),
        button("Cancel")
            .style(button::secondary)
            .on_press(Message::CancelCarouselEditor),
        button("Save").on_press(Message::SaveCarouselEditor),
    ]
    .spacing(8);

    super::form_card("Edit slide", body.into(), actions.into())
}

fn section<'a>(title: &'a str, body: Element<'a, Message>) -> Element<'a, Message> {
    container(column![text(title).size(17), body].spacing(10))
        .padding(14)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

fn labeled<'a>(label: &'a str, input: Element<'a, Message>) -> Element<'a, Message> {
    row![
        text(label).size(13).width(Length::Fixed(120.0)),
        input,
    ]
    .spacing(10)
    .align_y(Alignment::Center)
    .into()
}
