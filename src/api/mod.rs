/// Remote data gateway
///
/// Thin typed wrapper around the backend's REST API: one operation per
/// resource per verb, each a single request with no caching and no
/// retries. Callers own loading state and user notifications; this
/// module owns request plumbing and error decoding only.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::data::{
    Album, AlbumFilter, BackupEntry, BackupListing, BatchUploadReport, ConfigEntry, Event,
    EventFilter, Photo, Tag,
};

/// Largest file the client will offer the server (pre-check only; the
/// server is the authority)
pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

/// Errors surfaced by gateway operations.
///
/// `Clone` because results travel inside UI messages. The underlying
/// reqwest errors are not cloneable, so they are flattened to strings
/// at the boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced a usable response
    #[error("request failed: {0}")]
    Transport(String),
    /// Non-2xx status, with the server's message when it sent one
    #[error("{0}")]
    Server(String),
    /// 2xx response whose body did not match the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),
    /// Client-side pre-check failed; no request was made
    #[error("{0}")]
    Validation(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Error body the backend sends alongside non-2xx statuses
#[derive(Deserialize)]
struct ServerError {
    error: String,
}

/// Body for creating or updating an event
#[derive(Serialize, Debug, Clone)]
pub struct EventPayload {
    pub title: String,
    pub date: String,
    pub description: String,
}

/// Optional metadata accompanying a single photo upload
#[derive(Debug, Clone, Default)]
pub struct PhotoUploadMeta {
    pub description: String,
    pub date_taken: Option<String>,
    pub album_id: Option<i64>,
    pub event_id: Option<i64>,
    pub tags: Option<String>,
}

/// Parameters of the advanced photo search
#[derive(Debug, Clone, Default)]
pub struct PhotoSearchQuery {
    pub q: String,
    pub date_from: String,
    pub date_to: String,
    pub album_id: Option<i64>,
    pub event_id: Option<i64>,
    pub tags: Vec<i64>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Resolve a possibly-relative media URL against the server address
    pub fn absolute_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }

    /// Turn a response into the expected type, or into the server's own
    /// error message when the status says it failed.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let message = response
                .json::<ServerError>()
                .await
                .ok()
                .map(|body| body.error)
                .unwrap_or_else(|| format!("HTTP {status}"));
            Err(ApiError::Server(message))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.http.get(self.url(path)).send().await?;
        Self::decode(response).await
    }

    // --- events ---

    pub async fn list_events(
        &self,
        search: &str,
        filter: EventFilter,
        limit: Option<u32>,
    ) -> Result<Vec<Event>, ApiError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if !search.is_empty() {
            params.push(("search", search.to_string()));
        }
        if let Some(value) = filter.query_value() {
            params.push(("filter", value.to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }
        let response = self
            .http
            .get(self.url("/api/events"))
            .query(&params)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn create_event(&self, payload: EventPayload) -> Result<Event, ApiError> {
        let response = self
            .http
            .post(self.url("/api/events"))
            .json(&payload)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn update_event(&self, id: i64, payload: EventPayload) -> Result<Event, ApiError> {
        let response = self
            .http
            .put(self.url(&format!("/api/events/{id}")))
            .json(&payload)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn delete_event(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url(&format!("/api/events/{id}")))
            .send()
            .await?;
        Self::decode::<serde_json::Value>(response).await?;
        Ok(())
    }

    // --- photos ---

    pub async fn list_photos(
        &self,
        album: AlbumFilter,
        search: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Photo>, ApiError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(id) = album.album_id() {
            params.push(("album_id", id.to_string()));
        }
        if !search.is_empty() {
            params.push(("search", search.to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }
        let response = self
            .http
            .get(self.url("/api/photos"))
            .query(&params)
            .send()
            .await?;
        let photos: Vec<Photo> = Self::decode(response).await?;
        log::info!("fetched {} photos", photos.len());
        Ok(photos)
    }

    pub async fn search_photos(&self, query: PhotoSearchQuery) -> Result<Vec<Photo>, ApiError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if !query.q.is_empty() {
            params.push(("q", query.q.clone()));
        }
        if !query.date_from.is_empty() {
            params.push(("date_from", query.date_from.clone()));
        }
        if !query.date_to.is_empty() {
            params.push(("date_to", query.date_to.clone()));
        }
        if let Some(id) = query.album_id {
            params.push(("album_id", id.to_string()));
        }
        if let Some(id) = query.event_id {
            params.push(("event_id", id.to_string()));
        }
        for tag in &query.tags {
            params.push(("tag", tag.to_string()));
        }
        let response = self
            .http
            .get(self.url("/api/photos/search"))
            .query(&params)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Upload one photo with optional metadata. The file is pre-checked
    /// client-side (image type, size cap) before any bytes are read.
    pub async fn upload_photo(
        &self,
        file: PathBuf,
        meta: PhotoUploadMeta,
    ) -> Result<Photo, ApiError> {
        let mime = precheck_upload(&file).await?;
        let part = file_part(&file, mime).await?;

        let mut form = Form::new()
            .part("file", part)
            .text("description", meta.description);
        if let Some(date) = meta.date_taken {
            form = form.text("date_taken", date);
        }
        if let Some(id) = meta.album_id {
            form = form.text("album_id", id.to_string());
        }
        if let Some(id) = meta.event_id {
            form = form.text("event_id", id.to_string());
        }
        if let Some(tags) = meta.tags {
            form = form.text("tags", tags);
        }

        log::info!("uploading {}", file.display());
        let response = self
            .http
            .post(self.url("/api/photos"))
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Upload several photos at once. No client-side pre-check here:
    /// the server validates each file individually and reports per-file
    /// failures in the response.
    pub async fn upload_photos_batch(
        &self,
        files: Vec<PathBuf>,
        album_id: Option<i64>,
        event_id: Option<i64>,
    ) -> Result<BatchUploadReport, ApiError> {
        let mut form = Form::new();
        for file in &files {
            let mime = mime_for_extension(file).unwrap_or("application/octet-stream");
            form = form.part("files", file_part(file, mime).await?);
        }
        if let Some(id) = album_id {
            form = form.text("album_id", id.to_string());
        }
        if let Some(id) = event_id {
            form = form.text("event_id", id.to_string());
        }

        log::info!("batch uploading {} files", files.len());
        let response = self
            .http
            .post(self.url("/api/photos/batch"))
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn delete_photo(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url(&format!("/api/photos/{id}")))
            .send()
            .await?;
        Self::decode::<serde_json::Value>(response).await?;
        Ok(())
    }

    /// Fetch raw image bytes for display (slides, thumbnails, viewer)
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let absolute = self.absolute_url(url);
        let response = self.http.get(&absolute).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Server(format!("HTTP {status} fetching {absolute}")));
        }
        Ok(response.bytes().await?.to_vec())
    }

    // --- albums and tags ---

    pub async fn list_albums(&self) -> Result<Vec<Album>, ApiError> {
        self.get_json("/api/albums").await
    }

    pub async fn create_album(&self, name: &str, description: &str) -> Result<Album, ApiError> {
        let response = self
            .http
            .post(self.url("/api/albums"))
            .json(&serde_json::json!({ "name": name, "description": description }))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        self.get_json("/api/tags").await
    }

    // --- configs ---

    pub async fn list_configs(&self) -> Result<Vec<ConfigEntry>, ApiError> {
        self.get_json("/api/configs").await
    }

    pub async fn put_config(&self, key: &str, value: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .put(self.url(&format!("/api/configs/{key}")))
            .json(&serde_json::json!({ "value": value }))
            .send()
            .await?;
        Self::decode::<serde_json::Value>(response).await?;
        Ok(())
    }

    // --- backups ---

    pub async fn list_backups(&self) -> Result<BackupListing, ApiError> {
        self.get_json("/api/backups").await
    }

    pub async fn create_backup(&self) -> Result<BackupEntry, ApiError> {
        /// Creation wraps the new entry in an envelope
        #[derive(Deserialize)]
        struct Created {
            backup_file: BackupEntry,
        }

        let response = self.http.post(self.url("/api/backup")).send().await?;
        let created: Created = Self::decode(response).await?;
        Ok(created.backup_file)
    }

    pub async fn restore_backup(&self, filename: &str) -> Result<(), ApiError> {
        log::info!("restoring backup {filename}");
        let response = self
            .http
            .post(self.url(&format!("/api/restore/{filename}")))
            .send()
            .await?;
        Self::decode::<serde_json::Value>(response).await?;
        Ok(())
    }

    pub async fn delete_backup(&self, filename: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url(&format!("/api/backup/{filename}")))
            .send()
            .await?;
        Self::decode::<serde_json::Value>(response).await?;
        Ok(())
    }
}

/// Build a multipart file part from a path on disk
async fn file_part(path: &Path, mime: &str) -> Result<Part, ApiError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| ApiError::Validation(format!("Cannot read {}: {err}", path.display())))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Part::bytes(bytes)
        .file_name(filename)
        .mime_str(mime)
        .map_err(|err| ApiError::Validation(err.to_string()))
}

/// Reject a single upload before any bytes leave the machine: the file
/// must look like an image we accept and fit under the size cap.
async fn precheck_upload(path: &Path) -> Result<&'static str, ApiError> {
    let mime = mime_for_extension(path).ok_or_else(|| {
        ApiError::Validation("Unsupported file type, please choose an image".to_string())
    })?;
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|err| ApiError::Validation(format!("Cannot read {}: {err}", path.display())))?;
    if metadata.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError::Validation(
            "File is too large, photos must be under 16 MB".to_string(),
        ));
    }
    Ok(mime)
}

/// MIME type for the allow-listed image extensions, `None` otherwise
fn mime_for_extension(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_string_lossy().to_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_allow_list() {
        let mime = |name: &str| mime_for_extension(Path::new(name));

        assert_eq!(mime("a.jpg"), Some("image/jpeg"));
        assert_eq!(mime("a.JPEG"), Some("image/jpeg"));
        assert_eq!(mime("a.png"), Some("image/png"));
        assert_eq!(mime("a.webp"), Some("image/webp"));
        assert_eq!(mime("a.bmp"), None);
        assert_eq!(mime("archive.tar.gz"), None);
        assert_eq!(mime("noextension"), None);
    }

    #[test]
    fn test_absolute_url_joins_relative_paths() {
        let api = ApiClient::new("http://localhost:5000/");

        assert_eq!(
            api.absolute_url("/api/uploads/a.jpg"),
            "http://localhost:5000/api/uploads/a.jpg"
        );
        assert_eq!(
            api.absolute_url("https://picsum.photos/1200/600"),
            "https://picsum.photos/1200/600"
        );
        assert_eq!(
            api.absolute_url("api/uploads/a.jpg"),
            "http://localhost:5000/api/uploads/a.jpg"
        );
    }
}
