/// View layer
///
/// Pure projection functions from state snapshots to widget trees.
/// No network or mutation side effects originate here; every handler
/// is a `Message` the shell interprets.

pub mod events;
pub mod home;
pub mod photos;
pub mod settings;

use iced::widget::{button, center, column, container, mouse_area, opaque, row, stack, text, Space};
use iced::{Alignment, Color, ContentFit, Element, Length};

use crate::state::data::Photo;
use crate::{Keepsake, Level, Message, Notification};

/// Photo tile dimensions shared by the featured grid and the gallery
const TILE_WIDTH: f32 = 180.0;
const TILE_HEIGHT: f32 = 140.0;

/// Top navigation bar with one button per page
pub fn navbar(app: &Keepsake) -> Element<'_, Message> {
    use crate::Page;

    let tab = |label, page: Page| {
        let style = if app.page == page {
            button::primary
        } else {
            button::text
        };
        button(text(label).size(15))
            .style(style)
            .padding(10)
            .on_press(Message::Navigate(page))
    };

    container(
        row![
            text("Keepsake").size(22),
            Space::with_width(Length::Fixed(24.0)),
            tab("Home", Page::Home),
            tab("Events", Page::Events),
            tab("Photos", Page::Photos),
            tab("Settings", Page::Settings),
        ]
        .spacing(8)
        .align_y(Alignment::Center),
    )
    .padding(12)
    .width(Length::Fill)
    .style(container::rounded_box)
    .into()
}

/// Placeholder shown where a grid or list has nothing to display
pub fn empty_state<'a>(message: &'a str, action: Option<(&'a str, Message)>) -> Element<'a, Message> {
    let mut content = column![text(message).size(15)]
        .spacing(12)
        .align_x(Alignment::Center);
    if let Some((label, on_press)) = action {
        content = content.push(button(label).on_press(on_press));
    }
    container(content)
        .width(Length::Fill)
        .padding(40)
        .align_x(Alignment::Center)
        .into()
}

/// Layer `content` over `base` with a dimmed backdrop; clicking the
/// backdrop emits `on_dismiss`.
pub fn modal<'a>(
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
    on_dismiss: Message,
) -> Element<'a, Message> {
    let base: Element<'a, Message> = base.into();
    let backdrop = center(opaque(content)).style(|_theme| container::Style {
        background: Some(
            Color {
                a: 0.8,
                ..Color::BLACK
            }
            .into(),
        ),
        ..container::Style::default()
    });

    stack![base, opaque(mouse_area(backdrop).on_press(on_dismiss))].into()
}

/// Card chrome shared by every modal form
pub fn form_card<'a>(
    title: &'a str,
    body: Element<'a, Message>,
    actions: Element<'a, Message>,
) -> Element<'a, Message> {
    container(
        column![text(title).size(20), body, actions]
            .spacing(16)
            .width(Length::Fixed(420.0)),
    )
    .padding(20)
    .style(container::rounded_box)
    .into()
}

/// Toast banner, colored by severity, floated over the top of the window
pub fn notification_banner(notification: &Notification) -> Element<'_, Message> {
    let background = match notification.level {
        Level::Success => Color::from_rgb(0.13, 0.53, 0.32),
        Level::Warning => Color::from_rgb(0.78, 0.55, 0.09),
        Level::Error => Color::from_rgb(0.72, 0.20, 0.20),
    };

    let card = container(text(&notification.message).size(14).color(Color::WHITE))
        .padding(12)
        .style(move |_theme| container::Style {
            background: Some(background.into()),
            border: iced::border::rounded(6.0),
            ..container::Style::default()
        });

    container(card)
        .width(Length::Fill)
        .padding(16)
        .align_x(Alignment::Center)
        .into()
}

/// Small "working" pill shown while a request is in flight
pub fn busy_overlay<'a>() -> Element<'a, Message> {
    container(
        container(text("Working...").size(14))
            .padding(12)
            .style(container::rounded_box),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .align_x(Alignment::Center)
    .align_y(Alignment::End)
    .padding(24)
    .into()
}

/// One clickable photo tile: cached thumbnail when available, a named
/// placeholder box while the bytes are still on their way.
pub fn photo_tile<'a>(app: &'a Keepsake, photo: &'a Photo, on_press: Message) -> Element<'a, Message> {
    let thumbnail: Element<'a, Message> = match app.image_for(&photo.thumbnail()) {
        Some(handle) => iced::widget::image(handle.clone())
            .width(Length::Fixed(TILE_WIDTH))
            .height(Length::Fixed(TILE_HEIGHT))
            .content_fit(ContentFit::Cover)
            .into(),
        None => container(text(&photo.original_name).size(12))
            .width(Length::Fixed(TILE_WIDTH))
            .height(Length::Fixed(TILE_HEIGHT))
            .align_x(Alignment::Center)
            .align_y(Alignment::Center)
            .style(container::rounded_box)
            .into(),
    };

    let card = column![thumbnail, text(&photo.original_name).size(12)]
        .spacing(4)
        .width(Length::Fixed(TILE_WIDTH));

    mouse_area(card).on_press(on_press).into()
}

/// Human-readable byte count: "1.5 KB", "12 MB"
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }
    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);

    let mut rendered = format!("{value:.2}");
    while rendered.ends_with('0') {
        rendered.pop();
    }
    if rendered.ends_with('.') {
        rendered.pop();
    }
    format!("{rendered} {}", UNITS[exponent])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
        assert_eq!(format_file_size(5 * 1024 * 1024 * 1024), "5 GB");
    }
}
