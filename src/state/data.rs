/// Shared data structures for the application state
///
/// These structs mirror the JSON the backend serves and flow between
/// the gateway layer and the UI layer. Deserialization ignores fields
/// we do not display, so the client stays tolerant of server additions.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One slide of the home-page carousel.
///
/// The whole slide list is stored server-side as a JSON array under the
/// `carousel_items` config key, so this struct round-trips through
/// serde with the service's snake_case field names.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CarouselItem {
    /// Stable identifier minted at creation time, never reused
    #[serde(default)]
    pub id: String,
    /// Remote URL, empty placeholder, or a stray local filesystem path
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
}

/// A dated occurrence photos may be linked to
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
}

impl fmt::Display for Event {
    /// Dropdown label: "title (date)"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.date)
    }
}

/// Sort newest-first. `sort_by` is stable, so events sharing a date
/// keep the order the server returned them in.
pub fn sort_by_date_desc(events: &mut [Event]) {
    events.sort_by(|a, b| b.date.cmp(&a.date));
}

/// A named grouping of photos, independent of chronological event
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Album {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub photo_count: i64,
}

impl fmt::Display for Album {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Album annotation carried inside a photo response
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AlbumRef {
    pub id: i64,
    pub name: String,
}

/// Event annotation carried inside a photo response
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct EventRef {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// One photo as served by the backend. The album/event annotations are
/// resolved server-side and are display-only; the client never mutates
/// them.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Photo {
    pub id: i64,
    pub filename: String,
    pub original_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date_taken: Option<NaiveDate>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub album_info: Option<AlbumRef>,
    #[serde(default)]
    pub event_info: Option<EventRef>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Photo {
    /// Full-size URL, falling back to the service's conventional upload path
    pub fn display_url(&self) -> String {
        match &self.url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => format!("/api/uploads/{}", self.filename),
        }
    }

    /// Thumbnail URL, same fallback convention
    pub fn thumbnail(&self) -> String {
        match &self.thumbnail_url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => format!("/api/uploads/thumbnails/{}", self.filename),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// One key/value row of the backend's flat settings table
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
}

/// The settings table flattened into a map, the shape every consumer
/// actually wants.
#[derive(Debug, Clone, Default)]
pub struct ConfigMap(HashMap<String, String>);

impl ConfigMap {
    pub fn from_entries(entries: Vec<ConfigEntry>) -> Self {
        Self(entries.into_iter().map(|e| (e.key, e.value)).collect())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value for `key`, or `fallback` when the key is absent or empty
    pub fn get_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        match self.0.get(key) {
            Some(value) if !value.is_empty() => value,
            _ => fallback,
        }
    }
}

impl FromIterator<(String, String)> for ConfigMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Server-side filter accepted by the events listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventFilter {
    #[default]
    All,
    Recent,
    Future,
}

impl EventFilter {
    pub const ALL: [EventFilter; 3] = [EventFilter::All, EventFilter::Recent, EventFilter::Future];

    /// Query-string value, `None` for the default (unfiltered) listing
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            EventFilter::All => None,
            EventFilter::Recent => Some("recent"),
            EventFilter::Future => Some("future"),
        }
    }
}

impl fmt::Display for EventFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventFilter::All => "All events",
            EventFilter::Recent => "Recently added",
            EventFilter::Future => "Upcoming",
        };
        write!(f, "{label}")
    }
}

/// Which album the photo grid is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlbumFilter {
    #[default]
    All,
    Album(i64),
}

impl AlbumFilter {
    pub fn album_id(self) -> Option<i64> {
        match self {
            AlbumFilter::All => None,
            AlbumFilter::Album(id) => Some(id),
        }
    }
}

/// One backup file known to the server
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BackupEntry {
    pub filename: String,
    pub size: u64,
    pub created_at: String,
}

/// `GET /api/backups` wraps the list in an object
#[derive(Deserialize, Debug, Clone, Default)]
pub struct BackupListing {
    #[serde(default)]
    pub backups: Vec<BackupEntry>,
}

/// Per-file failure inside a batch upload response
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BatchUploadError {
    pub filename: String,
    pub error: String,
}

/// Outcome of a multi-file upload. Successes and failures are reported
/// side by side; the `errors` key is absent when everything went through.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct BatchUploadReport {
    #[serde(default)]
    pub success_count: u32,
    #[serde(default)]
    pub error_count: u32,
    #[serde(default)]
    pub errors: Vec<BatchUploadError>,
}

impl BatchUploadReport {
    /// Single aggregated message naming each failed file and the reason,
    /// or `None` when nothing failed.
    pub fn error_summary(&self) -> Option<String> {
        if self.error_count == 0 {
            return None;
        }
        let mut message = format!("{} photo(s) failed to upload", self.error_count);
        if !self.errors.is_empty() {
            let details: Vec<String> = self
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.filename, e.error))
                .collect();
            message.push_str(": ");
            message.push_str(&details.join("; "));
        }
        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_map_flattening() {
        let entries = vec![
            ConfigEntry {
                key: "motto".into(),
                value: "forever".into(),
            },
            ConfigEntry {
                key: "rules".into(),
                value: String::new(),
            },
        ];
        let map = ConfigMap::from_entries(entries);

        assert_eq!(map.get("motto"), Some("forever"));
        assert_eq!(map.get_or("rules", "fallback"), "fallback");
        assert_eq!(map.get_or("missing", "fallback"), "fallback");
    }

    #[test]
    fn test_photo_deserializes_with_annotations() {
        let json = r#"{
            "id": 7,
            "filename": "abc123.jpg",
            "original_name": "beach.jpg",
            "description": "sunset",
            "date_taken": "2024-06-01",
            "url": "/api/uploads/abc123.jpg",
            "thumbnail_url": "/api/uploads/thumbnails/abc123.jpg",
            "album_info": {"id": 2, "name": "Summer"},
            "event_info": {"id": 5, "title": "Trip", "date": "2024-06-01"},
            "tags": ["sea"]
        }"#;
        let photo: Photo = serde_json::from_str(json).unwrap();

        assert_eq!(photo.id, 7);
        assert_eq!(photo.album_info.as_ref().unwrap().name, "Summer");
        assert_eq!(photo.event_info.as_ref().unwrap().title, "Trip");
        assert_eq!(photo.display_url(), "/api/uploads/abc123.jpg");
    }

    #[test]
    fn test_photo_url_fallbacks() {
        let json = r#"{"id": 1, "filename": "x.jpg", "original_name": "x.jpg"}"#;
        let photo: Photo = serde_json::from_str(json).unwrap();

        assert_eq!(photo.display_url(), "/api/uploads/x.jpg");
        assert_eq!(photo.thumbnail(), "/api/uploads/thumbnails/x.jpg");
    }

    #[test]
    fn test_event_sort_is_descending_and_stable() {
        let date = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        let event = |id, d: &str| Event {
            id,
            title: format!("event {id}"),
            date: date(d),
            description: None,
        };
        let mut events = vec![
            event(1, "2024-01-01"),
            event(2, "2024-05-01"),
            event(3, "2024-01-01"),
        ];

        sort_by_date_desc(&mut events);

        let ids: Vec<i64> = events.iter().map(|e| e.id).collect();
        // 1 and 3 share a date and must keep their relative order
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_batch_report_error_summary() {
        let report: BatchUploadReport = serde_json::from_str(
            r#"{"success_count": 2, "error_count": 1,
                "errors": [{"filename": "a.jpg", "error": "too large"}]}"#,
        )
        .unwrap();

        let summary = report.error_summary().unwrap();
        assert!(summary.contains("a.jpg"));
        assert!(summary.contains("too large"));

        let clean = BatchUploadReport {
            success_count: 3,
            ..Default::default()
        };
        assert!(clean.error_summary().is_none());
    }
}
