use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

use iced::widget::{column, image, scrollable, stack};
use iced::{keyboard, Element, Length, Subscription, Task, Theme};

mod api;
mod config;
mod state;
mod ui;

use api::{ApiClient, ApiError, EventPayload, PhotoSearchQuery, PhotoUploadMeta};
use config::ClientConfig;
use state::carousel::{CarouselModel, NEW_SLIDE_SUBTITLE, NEW_SLIDE_TITLE};
use state::data::{
    Album, AlbumFilter, BackupEntry, BackupListing, BatchUploadReport, ConfigEntry, ConfigMap,
    Event, EventFilter, Photo, Tag,
};
use state::gallery::GalleryState;
use state::settings::SettingsForm;

/// How long the carousel rests on a slide before advancing
const CAROUSEL_PERIOD: Duration = Duration::from_secs(5);
/// How long a notification toast stays on screen
const NOTIFICATION_TTL: Duration = Duration::from_secs(3);
/// Debounce applied to the events search box
const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
/// Home page list sizes
const RECENT_EVENT_COUNT: u32 = 3;
const FEATURED_PHOTO_COUNT: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Events,
    Photos,
    Settings,
}

/// Notification severity, mirrored in the banner color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: Level,
}

/// Add/edit form for an event; `id` is set when editing
#[derive(Debug, Clone, Default)]
pub struct EventForm {
    pub id: Option<i64>,
    pub title: String,
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub file: Option<PathBuf>,
    pub description: String,
    pub date_taken: String,
    pub album: Option<Album>,
    pub event: Option<Event>,
    pub tags: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchForm {
    pub files: Vec<PathBuf>,
    pub album: Option<Album>,
    pub event: Option<Event>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchForm {
    pub query: String,
    pub date_from: String,
    pub date_to: String,
    pub album: Option<Album>,
    pub event: Option<Event>,
    pub tags: HashSet<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct AlbumForm {
    pub name: String,
    pub description: String,
}

/// In-flight edit of one carousel slide
#[derive(Debug, Clone)]
pub struct CarouselEditor {
    pub index: usize,
    pub image_url: String,
    pub title: String,
    pub subtitle: String,
}

/// The whole application state. One instance owns everything; views
/// render projections of it and handlers mutate it, so the rendered
/// tree is always derived state and never queried back.
pub struct Keepsake {
    pub api: ApiClient,
    pub page: Page,

    // home
    pub configs: ConfigMap,
    pub carousel: CarouselModel,
    pub recent_events: Vec<Event>,
    pub featured_photos: Vec<Photo>,

    // events
    pub events: Vec<Event>,
    pub event_search: String,
    pub event_filter: EventFilter,
    pub event_form: Option<EventForm>,

    // photos
    pub gallery: GalleryState,
    pub albums: Vec<Album>,
    pub all_events: Vec<Event>,
    pub active_album: AlbumFilter,
    pub quick_search: String,
    pub upload_form: Option<UploadForm>,
    pub batch_form: Option<BatchForm>,
    pub search_form: Option<SearchForm>,
    pub album_form: Option<AlbumForm>,
    pub tags: Vec<Tag>,

    // settings
    pub settings: SettingsForm,
    pub carousel_editor: Option<CarouselEditor>,
    pub backups: Vec<BackupEntry>,

    // shell
    pub notification: Option<Notification>,
    pub busy: bool,
    images: HashMap<String, image::Handle>,
    images_pending: HashSet<String>,
    /// Monotonic tag for photo list requests; responses carrying an
    /// older tag than the latest issued one are discarded
    photo_request_seq: u64,
    search_debounce_seq: u64,
    notification_seq: u64,
}

#[derive(Debug, Clone)]
pub enum Message {
    Navigate(Page),

    // home
    ConfigsLoaded(Result<Vec<ConfigEntry>, ApiError>),
    RecentEventsLoaded(Result<Vec<Event>, ApiError>),
    FeaturedPhotosLoaded(Result<Vec<Photo>, ApiError>),
    CarouselTick,
    CarouselGoTo(usize),
    OpenFeaturedPhoto(usize),

    // events
    EventSearchChanged(String),
    EventSearchDebounced(u64),
    EventFilterPicked(EventFilter),
    EventsLoaded(Result<Vec<Event>, ApiError>),
    EventChoicesLoaded(Result<Vec<Event>, ApiError>),
    OpenEventForm(Option<Event>),
    EventTitleChanged(String),
    EventDateChanged(String),
    EventDescriptionChanged(String),
    SubmitEventForm,
    EventSaved {
        created: bool,
        result: Result<Event, ApiError>,
    },
    DeleteEvent(i64),
    EventDeleted(Result<(), ApiError>),

    // photos
    AlbumsLoaded(Result<Vec<Album>, ApiError>),
    SelectAlbum(AlbumFilter),
    QuickSearchChanged(String),
    QuickSearchSubmitted,
    PhotosLoaded {
        seq: u64,
        result: Result<Vec<Photo>, ApiError>,
    },
    OpenGalleryPhoto(usize),
    ViewerNext,
    ViewerPrevious,
    CloseViewer,
    DeleteCurrentPhoto,
    PhotoDeleted(Result<(), ApiError>),
    ImageFetched {
        url: String,
        result: Result<Vec<u8>, ApiError>,
    },

    // upload
    OpenUploadForm,
    PickUploadFile,
    UploadDescriptionChanged(String),
    UploadDateChanged(String),
    UploadAlbumPicked(Album),
    UploadEventPicked(Event),
    UploadTagsChanged(String),
    SubmitUpload,
    UploadFinished(Result<Photo, ApiError>),

    // batch upload
    OpenBatchForm,
    PickBatchFiles,
    BatchAlbumPicked(Album),
    BatchEventPicked(Event),
    SubmitBatch,
    BatchFinished(Result<BatchUploadReport, ApiError>),

    // advanced search
    OpenSearchForm,
    TagsLoaded(Result<Vec<Tag>, ApiError>),
    SearchQueryChanged(String),
    SearchDateFromChanged(String),
    SearchDateToChanged(String),
    SearchAlbumPicked(Album),
    SearchEventPicked(Event),
    SearchTagToggled(i64, bool),
    SubmitSearch,

    // albums
    OpenAlbumForm,
    AlbumNameChanged(String),
    AlbumDescriptionChanged(String),
    SubmitAlbumForm,
    AlbumCreated(Result<Album, ApiError>),

    // settings
    RelationshipDateChanged(String),
    FirstMeetingDateChanged(String),
    MottoChanged(String),
    ValuesChanged(String),
    RulesChanged(String),
    SaveSettings,
    SettingsSaved(Result<(), ApiError>),
    AddCarouselItem,
    EditCarouselItem(usize),
    DeleteCarouselItem(usize),
    EditorImageUrlChanged(String),
    EditorTitleChanged(String),
    EditorSubtitleChanged(String),
    SaveCarouselEditor,
    CancelCarouselEditor,

    // backups
    BackupsLoaded(Result<BackupListing, ApiError>),
    CreateBackup,
    BackupCreated(Result<BackupEntry, ApiError>),
    RestoreBackup(String),
    BackupRestored(Result<(), ApiError>),
    DeleteBackup(String),
    BackupDeleted(Result<(), ApiError>),

    // shell
    CloseModals,
    DismissNotification(u64),
}

impl Keepsake {
    fn new() -> (Self, Task<Message>) {
        let client_config = ClientConfig::load();
        println!("💞 Keepsake starting against {}", client_config.server_url);
        let api = ApiClient::new(&client_config.server_url);

        let mut app = Keepsake {
            api,
            page: Page::Home,
            configs: ConfigMap::default(),
            carousel: CarouselModel::default(),
            recent_events: Vec::new(),
            featured_photos: Vec::new(),
            events: Vec::new(),
            event_search: String::new(),
            event_filter: EventFilter::All,
            event_form: None,
            gallery: GalleryState::default(),
            albums: Vec::new(),
            all_events: Vec::new(),
            active_album: AlbumFilter::All,
            quick_search: String::new(),
            upload_form: None,
            batch_form: None,
            search_form: None,
            album_form: None,
            tags: Vec::new(),
            settings: SettingsForm::default(),
            carousel_editor: None,
            backups: Vec::new(),
            notification: None,
            busy: false,
            images: HashMap::new(),
            images_pending: HashSet::new(),
            photo_request_seq: 0,
            search_debounce_seq: 0,
            notification_seq: 0,
        };
        let task = app.load_page_data();
        (app, task)
    }

    /// Cached image bytes for a (possibly relative) media URL
    pub fn image_for(&self, url: &str) -> Option<&image::Handle> {
        self.images.get(&self.api.absolute_url(url))
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Navigate(page) => {
                self.page = page;
                self.load_page_data()
            }

            // --- home ---
            Message::ConfigsLoaded(Ok(entries)) => {
                self.configs = ConfigMap::from_entries(entries);
                self.carousel = CarouselModel::load(&self.configs);
                match self.page {
                    Page::Home => {
                        self.carousel.ensure_non_empty();
                        self.fetch_carousel_images()
                    }
                    Page::Settings => {
                        self.settings = SettingsForm::from_configs(&self.configs);
                        self.fetch_carousel_images()
                    }
                    _ => Task::none(),
                }
            }
            Message::ConfigsLoaded(Err(error)) => {
                self.notify_api_error("Failed to load settings", &error)
            }
            Message::RecentEventsLoaded(Ok(mut events)) => {
                state::data::sort_by_date_desc(&mut events);
                self.recent_events = events;
                Task::none()
            }
            Message::RecentEventsLoaded(Err(error)) => {
                self.notify_api_error("Failed to load events", &error)
            }
            Message::FeaturedPhotosLoaded(Ok(photos)) => {
                self.featured_photos = photos;
                let urls: Vec<String> =
                    self.featured_photos.iter().map(Photo::thumbnail).collect();
                self.fetch_images(urls)
            }
            Message::FeaturedPhotosLoaded(Err(error)) => {
                self.notify_api_error("Failed to load photos", &error)
            }
            Message::CarouselTick => {
                self.carousel.advance();
                self.fetch_carousel_images()
            }
            Message::CarouselGoTo(index) => {
                self.carousel.go_to(index);
                self.fetch_carousel_images()
            }
            Message::OpenFeaturedPhoto(index) => {
                self.gallery.open_viewer(self.featured_photos.clone(), index);
                self.fetch_viewer_image()
            }

            // --- events ---
            Message::EventSearchChanged(value) => {
                self.event_search = value;
                self.search_debounce_seq += 1;
                let seq = self.search_debounce_seq;
                Task::perform(tokio::time::sleep(SEARCH_DEBOUNCE), move |_| {
                    Message::EventSearchDebounced(seq)
                })
            }
            Message::EventSearchDebounced(seq) => {
                if seq == self.search_debounce_seq {
                    self.reload_events_task()
                } else {
                    Task::none()
                }
            }
            Message::EventFilterPicked(filter) => {
                self.event_filter = filter;
                self.reload_events_task()
            }
            Message::EventsLoaded(Ok(mut events)) => {
                state::data::sort_by_date_desc(&mut events);
                self.events = events;
                Task::none()
            }
            Message::EventsLoaded(Err(error)) => {
                self.notify_api_error("Failed to load events", &error)
            }
            Message::EventChoicesLoaded(Ok(events)) => {
                self.all_events = events;
                Task::none()
            }
            Message::EventChoicesLoaded(Err(error)) => {
                log::warn!("could not load event choices: {error}");
                Task::none()
            }
            Message::OpenEventForm(event) => {
                self.event_form = Some(match event {
                    Some(event) => EventForm {
                        id: Some(event.id),
                        title: event.title,
                        date: event.date.to_string(),
                        description: event.description.unwrap_or_default(),
                    },
                    None => EventForm::default(),
                });
                Task::none()
            }
            Message::EventTitleChanged(value) => {
                if let Some(form) = &mut self.event_form {
                    form.title = value;
                }
                Task::none()
            }
            Message::EventDateChanged(value) => {
                if let Some(form) = &mut self.event_form {
                    form.date = value;
                }
                Task::none()
            }
            Message::EventDescriptionChanged(value) => {
                if let Some(form) = &mut self.event_form {
                    form.description = value;
                }
                Task::none()
            }
            Message::SubmitEventForm => {
                let Some(form) = self.event_form.clone() else {
                    return Task::none();
                };
                if form.title.trim().is_empty() {
                    return self.notify(Level::Warning, "Please enter an event title");
                }
                if form.date.trim().is_empty() {
                    return self.notify(Level::Warning, "Please pick an event date");
                }
                let payload = EventPayload {
                    title: form.title.trim().to_string(),
                    date: form.date.trim().to_string(),
                    description: form.description.trim().to_string(),
                };
                let api = self.api.clone();
                let created = form.id.is_none();
                Task::perform(
                    async move {
                        match form.id {
                            Some(id) => api.update_event(id, payload).await,
                            None => api.create_event(payload).await,
                        }
                    },
                    move |result| Message::EventSaved { created, result },
                )
            }
            Message::EventSaved {
                created,
                result: Ok(_),
            } => {
                self.event_form = None;
                let note = self.notify(
                    Level::Success,
                    if created {
                        "Event created"
                    } else {
                        "Event updated"
                    },
                );
                Task::batch([note, self.refresh_after_event_change()])
            }
            Message::EventSaved {
                result: Err(error), ..
            } => self.notify_api_error("Save failed", &error),
            Message::DeleteEvent(id) => {
                if confirm(
                    "Delete event",
                    "Delete this event? Photos linked to it are deleted as well.",
                ) {
                    let api = self.api.clone();
                    Task::perform(
                        async move { api.delete_event(id).await },
                        Message::EventDeleted,
                    )
                } else {
                    Task::none()
                }
            }
            Message::EventDeleted(Ok(())) => {
                let note = self.notify(Level::Success, "Event deleted");
                Task::batch([note, self.refresh_after_event_change()])
            }
            Message::EventDeleted(Err(error)) => self.notify_api_error("Delete failed", &error),

            // --- photos ---
            Message::AlbumsLoaded(Ok(albums)) => {
                self.albums = albums;
                Task::none()
            }
            Message::AlbumsLoaded(Err(error)) => {
                log::warn!("could not load albums: {error}");
                Task::none()
            }
            Message::SelectAlbum(filter) => {
                self.active_album = filter;
                self.reload_photos_task(String::new())
            }
            Message::QuickSearchChanged(value) => {
                self.quick_search = value;
                Task::none()
            }
            Message::QuickSearchSubmitted => {
                let search = self.quick_search.trim().to_string();
                self.reload_photos_task(search)
            }
            Message::PhotosLoaded { seq, result } => {
                self.busy = false;
                if seq != self.photo_request_seq {
                    log::debug!("discarding stale photo list response (seq {seq})");
                    return Task::none();
                }
                match result {
                    Ok(photos) => {
                        self.search_form = None;
                        let urls: Vec<String> = photos.iter().map(Photo::thumbnail).collect();
                        self.gallery.set_photos(photos);
                        self.fetch_images(urls)
                    }
                    Err(error) => self.notify_api_error("Failed to load photos", &error),
                }
            }
            Message::OpenGalleryPhoto(index) => {
                let photos = self.gallery.photos().to_vec();
                self.gallery.open_viewer(photos, index);
                self.fetch_viewer_image()
            }
            Message::ViewerNext => {
                if self.gallery.viewer_open() {
                    self.gallery.next();
                    self.fetch_viewer_image()
                } else {
                    Task::none()
                }
            }
            Message::ViewerPrevious => {
                if self.gallery.viewer_open() {
                    self.gallery.previous();
                    self.fetch_viewer_image()
                } else {
                    Task::none()
                }
            }
            Message::CloseViewer => {
                self.gallery.close_viewer();
                Task::none()
            }
            Message::DeleteCurrentPhoto => {
                let Some(photo) = self.gallery.current() else {
                    return Task::none();
                };
                let id = photo.id;
                if confirm("Delete photo", "Delete this photo?") {
                    let api = self.api.clone();
                    Task::perform(
                        async move { api.delete_photo(id).await },
                        Message::PhotoDeleted,
                    )
                } else {
                    Task::none()
                }
            }
            Message::PhotoDeleted(Ok(())) => {
                // Close rather than renumber; the follow-up fetch is
                // scoped to whatever album filter is active
                self.gallery.close_viewer();
                let note = self.notify(Level::Success, "Photo deleted");
                Task::batch([note, self.reload_photos_task(String::new())])
            }
            Message::PhotoDeleted(Err(error)) => self.notify_api_error("Delete failed", &error),
            Message::ImageFetched { url, result } => {
                self.images_pending.remove(&url);
                match result {
                    Ok(bytes) => {
                        self.images.insert(url, image::Handle::from_bytes(bytes));
                    }
                    Err(error) => log::warn!("image fetch failed for {url}: {error}"),
                }
                Task::none()
            }

            // --- upload ---
            Message::OpenUploadForm => {
                self.upload_form = Some(UploadForm::default());
                self.load_choices()
            }
            Message::PickUploadFile => {
                let picked = rfd::FileDialog::new()
                    .set_title("Select a photo")
                    .add_filter("Images", &["jpg", "jpeg", "png", "gif", "webp"])
                    .pick_file();
                if let (Some(form), Some(path)) = (&mut self.upload_form, picked) {
                    form.file = Some(path);
                }
                Task::none()
            }
            Message::UploadDescriptionChanged(value) => {
                if let Some(form) = &mut self.upload_form {
                    form.description = value;
                }
                Task::none()
            }
            Message::UploadDateChanged(value) => {
                if let Some(form) = &mut self.upload_form {
                    form.date_taken = value;
                }
                Task::none()
            }
            Message::UploadAlbumPicked(album) => {
                if let Some(form) = &mut self.upload_form {
                    form.album = Some(album);
                }
                Task::none()
            }
            Message::UploadEventPicked(event) => {
                if let Some(form) = &mut self.upload_form {
                    form.event = Some(event);
                }
                Task::none()
            }
            Message::UploadTagsChanged(value) => {
                if let Some(form) = &mut self.upload_form {
                    form.tags = value;
                }
                Task::none()
            }
            Message::SubmitUpload => {
                let Some(form) = self.upload_form.clone() else {
                    return Task::none();
                };
                let Some(file) = form.file else {
                    return self.notify(Level::Warning, "Please choose a photo to upload");
                };
                let meta = PhotoUploadMeta {
                    description: form.description.trim().to_string(),
                    date_taken: non_empty(form.date_taken),
                    album_id: form.album.map(|album| album.id),
                    event_id: form.event.map(|event| event.id),
                    tags: non_empty(form.tags),
                };
                self.busy = true;
                let api = self.api.clone();
                Task::perform(
                    async move { api.upload_photo(file, meta).await },
                    Message::UploadFinished,
                )
            }
            Message::UploadFinished(Ok(_)) => {
                self.busy = false;
                self.upload_form = None;
                let note = self.notify(Level::Success, "Photo uploaded");
                Task::batch([note, self.reload_photos_task(String::new())])
            }
            Message::UploadFinished(Err(error)) => {
                self.busy = false;
                self.notify_api_error("Upload failed", &error)
            }

            // --- batch upload ---
            Message::OpenBatchForm => {
                self.batch_form = Some(BatchForm::default());
                self.load_choices()
            }
            Message::PickBatchFiles => {
                let picked = rfd::FileDialog::new()
                    .set_title("Select photos")
                    .add_filter("Images", &["jpg", "jpeg", "png", "gif", "webp"])
                    .pick_files();
                if let (Some(form), Some(paths)) = (&mut self.batch_form, picked) {
                    form.files = paths;
                }
                Task::none()
            }
            Message::BatchAlbumPicked(album) => {
                if let Some(form) = &mut self.batch_form {
                    form.album = Some(album);
                }
                Task::none()
            }
            Message::BatchEventPicked(event) => {
                if let Some(form) = &mut self.batch_form {
                    form.event = Some(event);
                }
                Task::none()
            }
            Message::SubmitBatch => {
                let Some(form) = self.batch_form.clone() else {
                    return Task::none();
                };
                if form.files.is_empty() {
                    return self.notify(Level::Warning, "Please choose photos to upload");
                }
                self.busy = true;
                let api = self.api.clone();
                let album_id = form.album.map(|album| album.id);
                let event_id = form.event.map(|event| event.id);
                Task::perform(
                    async move { api.upload_photos_batch(form.files, album_id, event_id).await },
                    Message::BatchFinished,
                )
            }
            Message::BatchFinished(Ok(report)) => {
                self.busy = false;
                let mut tasks = Vec::new();
                if report.success_count > 0 {
                    // Successes apply even when some files failed
                    self.batch_form = None;
                    tasks.push(self.notify(
                        Level::Success,
                        format!("Uploaded {} photo(s)", report.success_count),
                    ));
                    tasks.push(self.reload_photos_task(String::new()));
                }
                if let Some(summary) = report.error_summary() {
                    tasks.push(self.notify(Level::Error, summary));
                }
                Task::batch(tasks)
            }
            Message::BatchFinished(Err(error)) => {
                self.busy = false;
                self.notify_api_error("Batch upload failed", &error)
            }

            // --- advanced search ---
            Message::OpenSearchForm => {
                self.search_form = Some(SearchForm::default());
                let api = self.api.clone();
                let tags = Task::perform(
                    async move { api.list_tags().await },
                    Message::TagsLoaded,
                );
                Task::batch([tags, self.load_choices()])
            }
            Message::TagsLoaded(Ok(tags)) => {
                self.tags = tags;
                Task::none()
            }
            Message::TagsLoaded(Err(error)) => {
                log::warn!("could not load tags: {error}");
                Task::none()
            }
            Message::SearchQueryChanged(value) => {
                if let Some(form) = &mut self.search_form {
                    form.query = value;
                }
                Task::none()
            }
            Message::SearchDateFromChanged(value) => {
                if let Some(form) = &mut self.search_form {
                    form.date_from = value;
                }
                Task::none()
            }
            Message::SearchDateToChanged(value) => {
                if let Some(form) = &mut self.search_form {
                    form.date_to = value;
                }
                Task::none()
            }
            Message::SearchAlbumPicked(album) => {
                if let Some(form) = &mut self.search_form {
                    form.album = Some(album);
                }
                Task::none()
            }
            Message::SearchEventPicked(event) => {
                if let Some(form) = &mut self.search_form {
                    form.event = Some(event);
                }
                Task::none()
            }
            Message::SearchTagToggled(id, checked) => {
                if let Some(form) = &mut self.search_form {
                    if checked {
                        form.tags.insert(id);
                    } else {
                        form.tags.remove(&id);
                    }
                }
                Task::none()
            }
            Message::SubmitSearch => {
                let Some(form) = self.search_form.clone() else {
                    return Task::none();
                };
                let query = PhotoSearchQuery {
                    q: form.query.trim().to_string(),
                    date_from: form.date_from.trim().to_string(),
                    date_to: form.date_to.trim().to_string(),
                    album_id: form.album.map(|album| album.id),
                    event_id: form.event.map(|event| event.id),
                    tags: form.tags.into_iter().collect(),
                };
                self.busy = true;
                self.photo_request_seq += 1;
                let seq = self.photo_request_seq;
                let api = self.api.clone();
                Task::perform(
                    async move { api.search_photos(query).await },
                    move |result| Message::PhotosLoaded { seq, result },
                )
            }

            // --- albums ---
            Message::OpenAlbumForm => {
                self.album_form = Some(AlbumForm::default());
                Task::none()
            }
            Message::AlbumNameChanged(value) => {
                if let Some(form) = &mut self.album_form {
                    form.name = value;
                }
                Task::none()
            }
            Message::AlbumDescriptionChanged(value) => {
                if let Some(form) = &mut self.album_form {
                    form.description = value;
                }
                Task::none()
            }
            Message::SubmitAlbumForm => {
                let Some(form) = self.album_form.clone() else {
                    return Task::none();
                };
                if form.name.trim().is_empty() {
                    return self.notify(Level::Warning, "Please enter an album name");
                }
                let api = self.api.clone();
                Task::perform(
                    async move {
                        api.create_album(form.name.trim(), form.description.trim())
                            .await
                    },
                    Message::AlbumCreated,
                )
            }
            Message::AlbumCreated(Ok(_)) => {
                self.album_form = None;
                let note = self.notify(Level::Success, "Album created");
                let api = self.api.clone();
                let albums = Task::perform(
                    async move { api.list_albums().await },
                    Message::AlbumsLoaded,
                );
                Task::batch([note, albums])
            }
            Message::AlbumCreated(Err(error)) => self.notify_api_error("Create failed", &error),

            // --- settings ---
            Message::RelationshipDateChanged(value) => {
                self.settings.relationship_date = value;
                Task::none()
            }
            Message::FirstMeetingDateChanged(value) => {
                self.settings.first_meeting_date = value;
                Task::none()
            }
            Message::MottoChanged(value) => {
                self.settings.motto = value;
                Task::none()
            }
            Message::ValuesChanged(value) => {
                self.settings.values = value;
                Task::none()
            }
            Message::RulesChanged(value) => {
                self.settings.rules = value;
                Task::none()
            }
            Message::SaveSettings => {
                let carousel_json = match self.carousel.serialize() {
                    Ok(json) => json,
                    Err(error) => {
                        log::warn!("could not serialize carousel items: {error}");
                        return self.notify(Level::Error, "Save failed");
                    }
                };
                let entries = self.settings.entries(carousel_json);
                let api = self.api.clone();
                Task::perform(
                    async move {
                        // Each key is an independent write; the save only
                        // counts as a success if every one of them lands
                        for (key, value) in entries {
                            api.put_config(&key, &value).await?;
                        }
                        Ok(())
                    },
                    Message::SettingsSaved,
                )
            }
            Message::SettingsSaved(Ok(())) => self.notify(Level::Success, "Settings saved"),
            Message::SettingsSaved(Err(error)) => self.notify_api_error("Save failed", &error),
            Message::AddCarouselItem => {
                let index = self.carousel.add();
                self.carousel_editor = Some(CarouselEditor {
                    index,
                    image_url: String::new(),
                    title: NEW_SLIDE_TITLE.to_string(),
                    subtitle: NEW_SLIDE_SUBTITLE.to_string(),
                });
                Task::none()
            }
            Message::EditCarouselItem(index) => {
                if let Some(item) = self.carousel.get(index) {
                    self.carousel_editor = Some(CarouselEditor {
                        index,
                        image_url: item.image_url.clone(),
                        title: item.title.clone(),
                        subtitle: item.subtitle.clone(),
                    });
                }
                Task::none()
            }
            Message::DeleteCarouselItem(index) => {
                if self.carousel.len() <= 1 {
                    return self.notify(Level::Warning, "At least one slide must remain");
                }
                if confirm("Delete slide", "Delete this slide?") && self.carousel.delete(index) {
                    self.notify(Level::Success, "Slide removed")
                } else {
                    Task::none()
                }
            }
            Message::EditorImageUrlChanged(value) => {
                if let Some(editor) = &mut self.carousel_editor {
                    editor.image_url = value;
                }
                Task::none()
            }
            Message::EditorTitleChanged(value) => {
                if let Some(editor) = &mut self.carousel_editor {
                    editor.title = value;
                }
                Task::none()
            }
            Message::EditorSubtitleChanged(value) => {
                if let Some(editor) = &mut self.carousel_editor {
                    editor.subtitle = value;
                }
                Task::none()
            }
            Message::SaveCarouselEditor => {
                if let Some(editor) = self.carousel_editor.take() {
                    self.carousel.edit(
                        editor.index,
                        editor.image_url.trim().to_string(),
                        editor.title.trim().to_string(),
                        editor.subtitle.trim().to_string(),
                    );
                }
                self.fetch_carousel_images()
            }
            Message::CancelCarouselEditor => {
                if let Some(editor) = self.carousel_editor.take() {
                    self.carousel.cancel_edit(editor.index);
                }
                Task::none()
            }

            // --- backups ---
            Message::BackupsLoaded(Ok(listing)) => {
                self.backups = listing.backups;
                Task::none()
            }
            Message::BackupsLoaded(Err(error)) => {
                log::warn!("could not load backup list: {error}");
                Task::none()
            }
            Message::CreateBackup => {
                let api = self.api.clone();
                Task::perform(
                    async move { api.create_backup().await },
                    Message::BackupCreated,
                )
            }
            Message::BackupCreated(Ok(entry)) => {
                let note = self.notify(
                    Level::Success,
                    format!("Backup created: {}", entry.filename),
                );
                Task::batch([note, self.reload_backups_task()])
            }
            Message::BackupCreated(Err(error)) => self.notify_api_error("Backup failed", &error),
            Message::RestoreBackup(filename) => {
                if confirm(
                    "Restore backup",
                    &format!("Restore from {filename}? Current data will be overwritten."),
                ) {
                    let api = self.api.clone();
                    Task::perform(
                        async move { api.restore_backup(&filename).await },
                        Message::BackupRestored,
                    )
                } else {
                    Task::none()
                }
            }
            Message::BackupRestored(Ok(())) => {
                let note = self.notify(Level::Success, "Data restored");
                // Everything on screen may be stale now
                Task::batch([note, self.load_page_data()])
            }
            Message::BackupRestored(Err(error)) => self.notify_api_error("Restore failed", &error),
            Message::DeleteBackup(filename) => {
                if confirm(
                    "Delete backup",
                    &format!("Delete backup {filename}? This cannot be undone."),
                ) {
                    let api = self.api.clone();
                    Task::perform(
                        async move { api.delete_backup(&filename).await },
                        Message::BackupDeleted,
                    )
                } else {
                    Task::none()
                }
            }
            Message::BackupDeleted(Ok(())) => {
                let note = self.notify(Level::Success, "Backup deleted");
                Task::batch([note, self.reload_backups_task()])
            }
            Message::BackupDeleted(Err(error)) => self.notify_api_error("Delete failed", &error),

            // --- shell ---
            Message::CloseModals => {
                self.event_form = None;
                self.upload_form = None;
                self.batch_form = None;
                self.search_form = None;
                self.album_form = None;
                if let Some(editor) = self.carousel_editor.take() {
                    self.carousel.cancel_edit(editor.index);
                }
                self.gallery.close_viewer();
                Task::none()
            }
            Message::DismissNotification(seq) => {
                if seq == self.notification_seq {
                    self.notification = None;
                }
                Task::none()
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let page: Element<'_, Message> = match self.page {
            Page::Home => ui::home::view(self),
            Page::Events => ui::events::view(self),
            Page::Photos => ui::photos::view(self),
            Page::Settings => ui::settings::view(self),
        };

        let base = column![
            ui::navbar(self),
            scrollable(page).height(Length::Fill),
        ]
        .spacing(4);

        let mut layered: Element<'_, Message> = base.into();
        if let Some(form) = &self.event_form {
            layered = ui::modal(layered, ui::events::form_card(form), Message::CloseModals);
        }
        if let Some(form) = &self.upload_form {
            layered = ui::modal(
                layered,
                ui::photos::upload_card(self, form),
                Message::CloseModals,
            );
        }
        if let Some(form) = &self.batch_form {
            layered = ui::modal(
                layered,
                ui::photos::batch_card(self, form),
                Message::CloseModals,
            );
        }
        if let Some(form) = &self.search_form {
            layered = ui::modal(
                layered,
                ui::photos::search_card(self, form),
                Message::CloseModals,
            );
        }
        if let Some(form) = &self.album_form {
            layered = ui::modal(layered, ui::photos::album_card(form), Message::CloseModals);
        }
        if let Some(editor) = &self.carousel_editor {
            layered = ui::modal(
                layered,
                ui::settings::editor_card(editor),
                Message::CancelCarouselEditor,
            );
        }
        if self.gallery.viewer_open() {
            layered = ui::modal(layered, ui::photos::viewer_card(self), Message::CloseViewer);
        }
        if self.busy {
            layered = stack![layered, ui::busy_overlay()].into();
        }
        if let Some(notification) = &self.notification {
            layered = stack![layered, ui::notification_banner(notification)].into();
        }
        layered
    }

    fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = vec![keyboard::on_key_press(handle_key)];
        if self.page == Page::Home && self.carousel.len() > 1 {
            subscriptions.push(iced::time::every(CAROUSEL_PERIOD).map(|_| Message::CarouselTick));
        }
        Subscription::batch(subscriptions)
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Kick off the fetches the current page needs
    fn load_page_data(&mut self) -> Task<Message> {
        match self.page {
            Page::Home => {
                let api = self.api.clone();
                let configs = Task::perform(
                    async move { api.list_configs().await },
                    Message::ConfigsLoaded,
                );
                let api = self.api.clone();
                let events = Task::perform(
                    async move {
                        api.list_events("", EventFilter::All, Some(RECENT_EVENT_COUNT))
                            .await
                    },
                    Message::RecentEventsLoaded,
                );
                let api = self.api.clone();
                let photos = Task::perform(
                    async move {
                        api.list_photos(AlbumFilter::All, "", Some(FEATURED_PHOTO_COUNT))
                            .await
                    },
                    Message::FeaturedPhotosLoaded,
                );
                Task::batch([configs, events, photos])
            }
            Page::Events => self.reload_events_task(),
            Page::Photos => {
                let api = self.api.clone();
                let albums = Task::perform(
                    async move { api.list_albums().await },
                    Message::AlbumsLoaded,
                );
                Task::batch([albums, self.reload_photos_task(String::new())])
            }
            Page::Settings => {
                let api = self.api.clone();
                let configs = Task::perform(
                    async move { api.list_configs().await },
                    Message::ConfigsLoaded,
                );
                Task::batch([configs, self.reload_backups_task()])
            }
        }
    }

    fn reload_events_task(&self) -> Task<Message> {
        let api = self.api.clone();
        let search = self.event_search.trim().to_string();
        let filter = self.event_filter;
        Task::perform(
            async move { api.list_events(&search, filter, None).await },
            Message::EventsLoaded,
        )
    }

    /// Fetch the photo list for the active album scope, tagging the
    /// request so a slower, superseded response cannot clobber a newer
    /// one.
    fn reload_photos_task(&mut self, search: String) -> Task<Message> {
        self.busy = true;
        self.photo_request_seq += 1;
        let seq = self.photo_request_seq;
        let api = self.api.clone();
        let album = self.active_album;
        Task::perform(
            async move { api.list_photos(album, &search, None).await },
            move |result| Message::PhotosLoaded { seq, result },
        )
    }

    fn reload_backups_task(&self) -> Task<Message> {
        let api = self.api.clone();
        Task::perform(
            async move { api.list_backups().await },
            Message::BackupsLoaded,
        )
    }

    /// Album and event options for the upload/search dropdowns
    fn load_choices(&self) -> Task<Message> {
        let api = self.api.clone();
        let albums = Task::perform(
            async move { api.list_albums().await },
            Message::AlbumsLoaded,
        );
        let api = self.api.clone();
        let events = Task::perform(
            async move { api.list_events("", EventFilter::All, None).await },
            Message::EventChoicesLoaded,
        );
        Task::batch([albums, events])
    }

    fn refresh_after_event_change(&mut self) -> Task<Message> {
        match self.page {
            Page::Events => self.reload_events_task(),
            Page::Home => self.load_page_data(),
            _ => Task::none(),
        }
    }

    /// Download any image bytes we have not seen yet; completed fetches
    /// land in the URL-keyed cache via `ImageFetched`.
    fn fetch_images(&mut self, urls: Vec<String>) -> Task<Message> {
        let mut tasks = Vec::new();
        for url in urls {
            if url.is_empty() {
                continue;
            }
            let key = self.api.absolute_url(&url);
            if self.images.contains_key(&key) || self.images_pending.contains(&key) {
                continue;
            }
            self.images_pending.insert(key.clone());
            let api = self.api.clone();
            tasks.push(Task::perform(
                async move {
                    let result = api.fetch_image(&key).await;
                    (key, result)
                },
                |(url, result)| Message::ImageFetched { url, result },
            ));
        }
        Task::batch(tasks)
    }

    fn fetch_carousel_images(&mut self) -> Task<Message> {
        let urls: Vec<String> = self
            .carousel
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| CarouselModel::resolve_display_url(item, index))
            .collect();
        self.fetch_images(urls)
    }

    fn fetch_viewer_image(&mut self) -> Task<Message> {
        match self.gallery.current() {
            Some(photo) => {
                let url = photo.display_url();
                self.fetch_images(vec![url])
            }
            None => Task::none(),
        }
    }

    /// Show a toast and schedule its dismissal. A newer toast bumps the
    /// sequence so the older dismissal fizzles.
    fn notify(&mut self, level: Level, message: impl Into<String>) -> Task<Message> {
        self.notification = Some(Notification {
            message: message.into(),
            level,
        });
        self.notification_seq += 1;
        let seq = self.notification_seq;
        Task::perform(tokio::time::sleep(NOTIFICATION_TTL), move |_| {
            Message::DismissNotification(seq)
        })
    }

    /// Validation failures are warnings without the context prefix;
    /// everything else is an error carrying the server's message.
    fn notify_api_error(&mut self, context: &str, error: &ApiError) -> Task<Message> {
        match error {
            ApiError::Validation(message) => {
                let message = message.clone();
                self.notify(Level::Warning, message)
            }
            _ => self.notify(Level::Error, format!("{context}: {error}")),
        }
    }
}

fn handle_key(key: keyboard::Key, _modifiers: keyboard::Modifiers) -> Option<Message> {
    match key {
        keyboard::Key::Named(keyboard::key::Named::ArrowLeft) => Some(Message::ViewerPrevious),
        keyboard::Key::Named(keyboard::key::Named::ArrowRight) => Some(Message::ViewerNext),
        keyboard::Key::Named(keyboard::key::Named::Escape) => Some(Message::CloseModals),
        _ => None,
    }
}

/// Blocking yes/no dialog, the same way folder picks already block
fn confirm(title: &str, description: &str) -> bool {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .set_buttons(rfd::MessageButtons::YesNo)
        .show()
        == rfd::MessageDialogResult::Yes
}

/// `Some` for non-blank strings, trimmed
fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn main() -> iced::Result {
    env_logger::init();

    iced::application("Keepsake", Keepsake::update, Keepsake::view)
        .subscription(Keepsake::subscription)
        .theme(Keepsake::theme)
        .window_size(iced::Size::new(1120.0, 780.0))
        .centered()
        .run_with(Keepsake::new)
}
