/// Photo list and full-screen viewer state
///
/// `photos` is whatever list was last handed over (an album-scoped
/// fetch, the six featured photos, or a search result); the viewer
/// navigates that exact list and nothing else.

use crate::state::data::Photo;

#[derive(Debug, Clone, Default)]
pub struct GalleryState {
    photos: Vec<Photo>,
    current: usize,
    viewer_open: bool,
}

impl GalleryState {
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn viewer_open(&self) -> bool {
        self.viewer_open
    }

    /// Index of the photo under inspection. Only meaningful while the
    /// viewer is open.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The photo under inspection, when the viewer is open
    pub fn current(&self) -> Option<&Photo> {
        if self.viewer_open {
            self.photos.get(self.current)
        } else {
            None
        }
    }

    /// Replace the photo list after a fetch. Deliberately leaves the
    /// viewer flag and index alone; the viewer is only consistent with
    /// the list again once `open_viewer` is called.
    pub fn set_photos(&mut self, photos: Vec<Photo>) {
        self.photos = photos;
    }

    /// Open the viewer on `index` within `photos`, which becomes the
    /// authoritative list for subsequent navigation. Opening on an
    /// empty list is a no-op.
    pub fn open_viewer(&mut self, photos: Vec<Photo>, index: usize) {
        if photos.is_empty() {
            return;
        }
        self.current = index.min(photos.len() - 1);
        self.photos = photos;
        self.viewer_open = true;
    }

    pub fn close_viewer(&mut self) {
        self.viewer_open = false;
    }

    /// Step forward, wrapping past the end. No-op on an empty list.
    pub fn next(&mut self) {
        if !self.photos.is_empty() {
            self.current = (self.current + 1) % self.photos.len();
        }
    }

    /// Step backward, wrapping past the start. No-op on an empty list.
    pub fn previous(&mut self) {
        if !self.photos.is_empty() {
            self.current = (self.current + self.photos.len() - 1) % self.photos.len();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(id: i64) -> Photo {
        serde_json::from_str(&format!(
            r#"{{"id": {id}, "filename": "{id}.jpg", "original_name": "{id}.jpg"}}"#
        ))
        .unwrap()
    }

    fn photos(n: i64) -> Vec<Photo> {
        (1..=n).map(photo).collect()
    }

    #[test]
    fn test_next_cycles_back_to_start() {
        for n in 1usize..=4 {
            for start in 0..n {
                let mut gallery = GalleryState::default();
                gallery.open_viewer(photos(n as i64), start);

                for _ in 0..n {
                    gallery.next();
                }
                assert_eq!(gallery.current_index(), start);
            }
        }
    }

    #[test]
    fn test_previous_cycles_back_to_start() {
        for n in 1usize..=4 {
            for start in 0..n {
                let mut gallery = GalleryState::default();
                gallery.open_viewer(photos(n as i64), start);

                for _ in 0..n {
                    gallery.previous();
                }
                assert_eq!(gallery.current_index(), start);
            }
        }
    }

    #[test]
    fn test_navigation_on_empty_list_is_noop() {
        let mut gallery = GalleryState::default();
        gallery.next();
        gallery.previous();
        assert_eq!(gallery.current_index(), 0);
        assert!(!gallery.viewer_open());
    }

    #[test]
    fn test_open_viewer_replaces_list_wholesale() {
        let mut gallery = GalleryState::default();
        gallery.set_photos(photos(5));

        // Opening from a filtered subset scopes navigation to the subset
        gallery.open_viewer(photos(2), 1);
        assert_eq!(gallery.photos().len(), 2);
        assert_eq!(gallery.current().unwrap().id, 2);

        gallery.next();
        assert_eq!(gallery.current().unwrap().id, 1);
    }

    #[test]
    fn test_open_viewer_on_empty_list_does_not_open() {
        let mut gallery = GalleryState::default();
        gallery.open_viewer(Vec::new(), 0);
        assert!(!gallery.viewer_open());
    }

    #[test]
    fn test_set_photos_leaves_viewer_state_alone() {
        let mut gallery = GalleryState::default();
        gallery.open_viewer(photos(3), 2);

        gallery.set_photos(photos(1));

        // Index and flag untouched until open_viewer runs again
        assert!(gallery.viewer_open());
        assert_eq!(gallery.current_index(), 2);
    }

    #[test]
    fn test_current_is_none_when_closed() {
        let mut gallery = GalleryState::default();
        gallery.open_viewer(photos(2), 0);
        gallery.close_viewer();
        assert!(gallery.current().is_none());
    }
}
