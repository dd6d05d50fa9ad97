/// Home page: carousel, day counters, words, recent events, featured photos

use chrono::Local;
use iced::widget::{button, column, container, row, text, Space};
use iced::{Alignment, ContentFit, Element, Length};
use iced_aw::Wrap;

use crate::state::carousel::CarouselModel;
use crate::state::settings::{
    days_since, DEFAULT_MOTTO, DEFAULT_RULES, DEFAULT_VALUES, FIRST_MEETING_DATE_KEY, MOTTO_KEY,
    RELATIONSHIP_DATE_KEY, RULES_KEY, VALUES_KEY,
};
use crate::{Keepsake, Message, Page};

const SLIDE_HEIGHT: f32 = 320.0;

pub fn view(app: &Keepsake) -> Element<'_, Message> {
    column![
        carousel(app),
        counters(app),
        words(app),
        recent_events(app),
        featured_photos(app),
    ]
    .spacing(24)
    .padding(16)
    .into()
}

/// The active slide plus one indicator per slide. The model is
/// guaranteed non-empty by the time it reaches rendering.
fn carousel(app: &Keepsake) -> Element<'_, Message> {
    let index = app.carousel.active();
    let Some(slide) = app.carousel.get(index) else {
        return Space::with_height(Length::Fixed(0.0)).into();
    };

    let url = CarouselModel::resolve_display_url(slide, index);
    let picture: Element<'_, Message> = match app.image_for(&url) {
        Some(handle) => iced::widget::image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(SLIDE_HEIGHT))
            .content_fit(ContentFit::Cover)
            .into(),
        None => container(text(&slide.title).size(24))
            .width(Length::Fill)
            .height(Length::Fixed(SLIDE_HEIGHT))
            .align_x(Alignment::Center)
            .align_y(Alignment::Center)
            .style(container::rounded_box)
            .into(),
    };

    let caption = column![text(&slide.title).size(26), text(&slide.subtitle).size(15)]
        .spacing(4)
        .align_x(Alignment::Center);

    let mut indicators = row![].spacing(6);
    for position in 0..app.carousel.len() {
        let style = if position == index {
            button::primary
        } else {
            button::text
        };
        indicators = indicators.push(
            button(text("•").size(16))
                .style(style)
                .padding(4)
                .on_press(Message::CarouselGoTo(position)),
        );
    }

    column![picture, caption, indicators]
        .spacing(10)
        .align_x(Alignment::Center)
        .into()
}

/// Day counters for the two anniversary dates, shown only when set
fn counters(app: &Keepsake) -> Element<'_, Message> {
    let now = Local::now().naive_local();

    let mut cards = row![].spacing(16);
    for (key, label) in [
        (RELATIONSHIP_DATE_KEY, "days together"),
        (FIRST_MEETING_DATE_KEY, "days since we met"),
    ] {
        let Some(value) = app.configs.get(key) else {
            continue;
        };
        let Some(days) = days_since(value, now) else {
            continue;
        };
        let card = container(
            column![
                text(format!("{days}")).size(34),
                text(label).size(13),
                text(value.to_string()).size(12),
            ]
            .spacing(2)
            .align_x(Alignment::Center),
        )
        .padding(16)
        .style(container::rounded_box);
        cards = cards.push(card);
    }
    cards.into()
}

/// Motto, values and rules, with fixed fallbacks when unset
fn words(app: &Keepsake) -> Element<'_, Message> {
    let block = |label: &'static str, value: &str| {
        container(column![text(label).size(13), text(value.to_string()).size(15)].spacing(6))
            .padding(14)
            .width(Length::Fill)
            .style(container::rounded_box)
    };

    row![
        block("Our motto", app.configs.get_or(MOTTO_KEY, DEFAULT_MOTTO)),
        block("What we value", app.configs.get_or(VALUES_KEY, DEFAULT_VALUES)),
        block("Our rules", app.configs.get_or(RULES_KEY, DEFAULT_RULES)),
    ]
    .spacing(16)
    .into()
}

fn recent_events(app: &Keepsake) -> Element<'_, Message> {
    let mut section = column![text("Recent events").size(19)].spacing(10);

    if app.recent_events.is_empty() {
        return section
            .push(super::empty_state(
                "No events recorded yet",
                Some(("Go to events", Message::Navigate(Page::Events))),
            ))
            .into();
    }

    let mut cards = row![].spacing(12);
    for event in app.recent_events.iter().take(3) {
        let description = event.description.as_deref().unwrap_or("");
        let card = container(
            column![
                text(event.date.format("%b %-d").to_string()).size(13),
                text(&event.title).size(16),
                text(description.to_string()).size(13),
            ]
            .spacing(4),
        )
        .padding(14)
        .width(Length::Fill)
        .style(container::rounded_box);
        cards = cards.push(card);
    }
    section.push(cards).into()
}

fn featured_photos(app: &Keepsake) -> Element<'_, Message> {
    let mut section = column![text("Featured photos").size(19)].spacing(10);

    if app.featured_photos.is_empty() {
        return section
            .push(super::empty_state(
                "No photos uploaded yet",
                Some(("Go upload one", Message::Navigate(Page::Photos))),
            ))
            .into();
    }

    let tiles: Vec<Element<'_, Message>> = app
        .featured_photos
        .iter()
        .enumerate()
        .map(|(index, photo)| super::photo_tile(app, photo, Message::OpenFeaturedPhoto(index)))
        .collect();

    section
        .push(Wrap::with_elements(tiles).spacing(12.0).line_spacing(12.0))
        .into()
}
