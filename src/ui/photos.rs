/// Photos page: album filters, quick search, grid, upload/search modals,
/// and the full-screen viewer

use iced::widget::{button, checkbox, column, container, pick_list, row, text, text_input, Space};
use iced::{Alignment, ContentFit, Element, Length};
use iced_aw::Wrap;

use crate::state::data::AlbumFilter;
use crate::{AlbumForm, BatchForm, Keepsake, Message, SearchForm, UploadForm};

pub fn view(app: &Keepsake) -> Element<'_, Message> {
    let header = row![
        text("Photos").size(22),
        Space::with_width(Length::Fill),
        button("Upload").on_press(Message::OpenUploadForm),
        button("Batch upload")
            .style(button::secondary)
            .on_press(Message::OpenBatchForm),
        button("Advanced search")
            .style(button::secondary)
            .on_press(Message::OpenSearchForm),
        button("New album")
            .style(button::secondary)
            .on_press(Message::OpenAlbumForm),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let quick_search = text_input("Search photos, press Enter...", &app.quick_search)
        .on_input(Message::QuickSearchChanged)
        .on_submit(Message::QuickSearchSubmitted)
        .width(Length::Fixed(280.0));

    let mut page = column![header, album_bar(app), quick_search]
        .spacing(14)
        .padding(16);

    if app.gallery.photos().is_empty() {
        page = page.push(super::empty_state(
            "No photos found",
            Some(("Upload a photo", Message::OpenUploadForm)),
        ));
        return page.into();
    }

    let tiles: Vec<Element<'_, Message>> = app
        .gallery
        .photos()
        .iter()
        .enumerate()
        .map(|(index, photo)| super::photo_tile(app, photo, Message::OpenGalleryPhoto(index)))
        .collect();

    page.push(Wrap::with_elements(tiles).spacing(12.0).line_spacing(12.0))
        .into()
}

/// One button per album plus the implicit "all" scope. The active scope
/// lives in state, never in the widgets.
fn album_bar(app: &Keepsake) -> Element<'_, Message> {
    let scope_button = |label: String, filter: AlbumFilter| {
        let style = if app.active_album == filter {
            button::primary
        } else {
            button::secondary
        };
        button(text(label).size(13))
            .style(style)
            .on_press(Message::SelectAlbum(filter))
    };

    let mut bar = row![scope_button("All photos".to_string(), AlbumFilter::All)].spacing(8);
    for album in &app.albums {
        bar = bar.push(scope_button(
            format!("{} ({})", album.name, album.photo_count),
            AlbumFilter::Album(album.id),
        ));
    }
    bar.into()
}

/// Full-screen single-photo inspection overlay
pub fn viewer_card(app: &Keepsake) -> Element<'_, Message> {
    let Some(photo) = app.gallery.current() else {
        return Space::with_height(Length::Fixed(0.0)).into();
    };

    let picture: Element<'_, Message> = match app.image_for(&photo.display_url()) {
        Some(handle) => iced::widget::image(handle.clone())
            .width(Length::Fixed(720.0))
            .height(Length::Fixed(460.0))
            .content_fit(ContentFit::Contain)
            .into(),
        None => container(text("Loading photo...").size(14))
            .width(Length::Fixed(720.0))
            .height(Length::Fixed(460.0))
            .align_x(Alignment::Center)
            .align_y(Alignment::Center)
            .style(container::rounded_box)
            .into(),
    };

    let description = photo.description.as_deref().unwrap_or("No description yet");
    let mut annotations = column![].spacing(2);
    if let Some(album) = &photo.album_info {
        annotations = annotations.push(text(format!("Album: {}", album.name)).size(12));
    }
    if let Some(event) = &photo.event_info {
        annotations = annotations.push(text(format!("Event: {}", event.title)).size(12));
    }

    let actions = row![
        button("Previous")
            .style(button::secondary)
            .on_press(Message::ViewerPrevious),
        button("Next")
            .style(button::secondary)
            .on_press(Message::ViewerNext),
        Space::with_width(Length::Fill),
        button("Delete")
            .style(button::danger)
            .on_press(Message::DeleteCurrentPhoto),
        button("Close").on_press(Message::CloseViewer),
    ]
    .spacing(8);

    container(
        column![
            text(&photo.original_name).size(17),
            picture,
            text(description.to_string()).size(13),
            annotations,
            actions,
        ]
        .spacing(10)
        .width(Length::Fixed(720.0)),
    )
    .padding(16)
    .style(container::rounded_box)
    .into()
}

pub fn upload_card<'a>(app: &'a Keepsake, form: &'a UploadForm) -> Element<'a, Message> {
    let picked = form
        .file
        .as_ref()
        .and_then(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "No file chosen".to_string());

    let body = column![
        row![
            button("Choose photo...")
                .style(button::secondary)
                .on_press(Message::PickUploadFile),
            text(picked).size(13),
        ]
        .spacing(10)
        .align_y(Alignment::Center),
        text_input("Description", &form.description).on_input(Message::UploadDescriptionChanged),
        text_input("Date taken (YYYY-MM-DD)", &form.date_taken)
            .on_input(Message::UploadDateChanged),
        pick_list(
            app.albums.clone(),
            form.album.clone(),
            Message::UploadAlbumPicked
        )
        .placeholder("Album (optional)"),
        pick_list(
            app.all_events.clone(),
            form.event.clone(),
            Message::UploadEventPicked
        )
        .placeholder("Event (optional)"),
        text_input("Tags, comma separated", &form.tags).on_input(Message::UploadTagsChanged),
    ]
    .spacing(10);

    let actions = row![
        Space::with_width(Length::Fill),
        button("Cancel")
            .style(button::secondary)
            .on_press(Message::CloseModals),
        button("Upload").on_press(Message::SubmitUpload),
    ]
    .spacing(8);

    super::form_card("Upload photo", body.into(), actions.into())
}

pub fn batch_card<'a>(app: &'a Keepsake, form: &'a BatchForm) -> Element<'a, Message> {
    let picked = if form.files.is_empty() {
        "No files chosen".to_string()
    } else {
        format!("{} file(s) selected", form.files.len())
    };

    let body = column![
        row![
            button("Choose photos...")
                .style(button::secondary)
                .on_press(Message::PickBatchFiles),
            text(picked).size(13),
        ]
        .spacing(10)
        .align_y(Alignment::Center),
        pick_list(
            app.albums.clone(),
            form.album.clone(),
            Message::BatchAlbumPicked
        )
        .placeholder("Album (optional)"),
        pick_list(
            app.all_events.clone(),
            form.event.clone(),
            Message::BatchEventPicked
        )
        .placeholder("Event (optional)"),
    ]
    .spacing(10);

    let actions = row![
        Space::with_width(Length::Fill),
        button("Cancel")
            .style(button::secondary)
            .on_press(Message::CloseModals),
        button("Upload all").on_press(Message::SubmitBatch),
    ]
    .spacing(8);

    super::form_card("Batch upload", body.into(), actions.into())
}

pub fn search_card<'a>(app: &'a Keepsake, form: &'a SearchForm) -> Element<'a, Message> {
    let mut tag_boxes = column![].spacing(4);
    for tag in &app.tags {
        let id = tag.id;
        tag_boxes = tag_boxes.push(
            checkbox(tag.name.clone(), form.tags.contains(&id))
                .size(16)
                .on_toggle(move |checked| Message::SearchTagToggled(id, checked)),
        );
    }

    let body = column![
        text_input("Keywords", &form.query).on_input(Message::SearchQueryChanged),
        row![
            text_input("From (YYYY-MM-DD)", &form.date_from)
                .on_input(Message::SearchDateFromChanged),
            text_input("To (YYYY-MM-DD)", &form.date_to).on_input(Message::SearchDateToChanged),
        ]
        .spacing(8),
        pick_list(
            app.albums.clone(),
            form.album.clone(),
            Message::SearchAlbumPicked
        )
        .placeholder("Album (optional)"),
        pick_list(
            app.all_events.clone(),
            form.event.clone(),
            Message::SearchEventPicked
        )
        .placeholder("Event (optional)"),
        text("Tags").size(13),
        tag_boxes,
    ]
    .spacing(10);

    let actions = row![
        Space::with_width(Length::Fill),
        button("Cancel")
            .style(button::secondary)
            .on_press(Message::CloseModals),
        button("Search").on_press(Message::SubmitSearch),
    ]
    .spacing(8);

    super::form_card("Search photos", body.into(), actions.into())
}

pub fn album_card(form: &AlbumForm) -> Element<'_, Message> {
    let body = column![
        text_input("Album name", &form.name).on_input(Message::AlbumNameChanged),
        text_input("Description", &form.description).on_input(Message::AlbumDescriptionChanged),
    ]
    .spacing(10);

    let actions = row![
        Space::with_width(Length::Fill),
        button("Cancel")
            .style(button::secondary)
            .on_press(Message::CloseModals),
        button("Create").on_press(Message::SubmitAlbumForm),
    ]
    .spacing(8);

    super::form_card("New album", body.into(), actions.into())
}
