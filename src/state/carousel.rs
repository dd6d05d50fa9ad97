/// Home-page carousel model
///
/// The slide list is parsed from the `carousel_items` config value when
/// a page loads, edited purely in memory from the settings page, and
/// written back wholesale (one JSON string) on an explicit save. Leaving
/// the settings page without saving discards the edits, because the next
/// visit re-reads the server copy.

use crate::state::data::{CarouselItem, ConfigMap};

/// Image shown on the injected default slide
pub const DEFAULT_IMAGE_URL: &str = "https://picsum.photos/1200/600?random=1";
/// Caption of the injected default slide
pub const DEFAULT_TITLE: &str = "Our Story";
pub const DEFAULT_SUBTITLE: &str = "Treasure every beautiful moment";

/// Field values a freshly added slide starts with. `cancel_edit` uses
/// them to recognize an untouched add and roll it back.
pub const NEW_SLIDE_TITLE: &str = "New Slide";
pub const NEW_SLIDE_SUBTITLE: &str = "Edit this slide's title and subtitle";

/// Config key the slide list is persisted under
pub const CAROUSEL_ITEMS_KEY: &str = "carousel_items";

// Single-slide keys from before the list format existed
const LEGACY_IMAGE_KEY: &str = "carousel_image_url";
const LEGACY_TITLE_KEY: &str = "carousel_title";
const LEGACY_SUBTITLE_KEY: &str = "carousel_subtitle";

/// Ordered slide list plus the index the home carousel is resting on.
///
/// Order is insertion order; there is no separate sort key.
#[derive(Debug, Clone, Default)]
pub struct CarouselModel {
    items: Vec<CarouselItem>,
    active: usize,
}

impl CarouselModel {
    /// Build the slide list from the server's config map.
    ///
    /// Never fails: a malformed or missing `carousel_items` value falls
    /// back to the legacy single-slide keys when those are present, and
    /// to an empty list otherwise. The fallback is logged so silent data
    /// corruption stays visible to operators.
    pub fn load(configs: &ConfigMap) -> Self {
        Self {
            items: parse_items(configs),
            active: 0,
        }
    }

    pub fn items(&self) -> &[CarouselItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the slide currently shown
    pub fn active(&self) -> usize {
        self.active
    }

    pub fn get(&self, index: usize) -> Option<&CarouselItem> {
        self.items.get(index)
    }

    /// Guarantee at least one slide before rendering by injecting the
    /// default slide into an empty list.
    pub fn ensure_non_empty(&mut self) {
        if self.items.is_empty() {
            self.items.push(CarouselItem {
                id: mint_id(),
                image_url: DEFAULT_IMAGE_URL.to_string(),
                title: DEFAULT_TITLE.to_string(),
                subtitle: DEFAULT_SUBTITLE.to_string(),
            });
            self.active = 0;
        }
    }

    /// URL actually rendered for a slide.
    ///
    /// Windows drive-letter paths and anything containing a backslash
    /// cannot be displayed, so they are swapped for a deterministic
    /// placeholder parameterized by position (distinct slides get
    /// visibly distinct placeholders). Everything else passes through
    /// unchanged, empty strings included.
    pub fn resolve_display_url(item: &CarouselItem, position: usize) -> String {
        if looks_like_local_path(&item.image_url) {
            format!("https://picsum.photos/1200/600?random={}", position + 1)
        } else {
            item.image_url.clone()
        }
    }

    /// Append a new placeholder slide and return its index. The caller
    /// is expected to open the editor on it right away.
    pub fn add(&mut self) -> usize {
        self.items.push(CarouselItem {
            id: mint_id(),
            image_url: String::new(),
            title: NEW_SLIDE_TITLE.to_string(),
            subtitle: NEW_SLIDE_SUBTITLE.to_string(),
        });
        self.items.len() - 1
    }

    /// Replace the editable fields in place, preserving the id
    pub fn edit(&mut self, index: usize, image_url: String, title: String, subtitle: String) {
        if let Some(item) = self.items.get_mut(index) {
            item.image_url = image_url;
            item.title = title;
            item.subtitle = subtitle;
        }
    }

    /// Roll back an abandoned `add`: if the slide at `index` still holds
    /// every just-added placeholder value it is removed. Returns whether
    /// a slide was removed.
    pub fn cancel_edit(&mut self, index: usize) -> bool {
        let pristine = matches!(
            self.items.get(index),
            Some(item)
                if item.image_url.is_empty()
                    && item.title == NEW_SLIDE_TITLE
                    && item.subtitle == NEW_SLIDE_SUBTITLE
        );
        if pristine {
            self.items.remove(index);
            if self.active >= self.items.len() {
                self.active = 0;
            }
        }
        pristine
    }

    /// Remove the slide at `index`, closing the gap. Deleting the last
    /// remaining slide is rejected; returns whether a slide was removed
    /// so the caller can warn the user.
    pub fn delete(&mut self, index: usize) -> bool {
        if self.items.len() <= 1 || index >= self.items.len() {
            return false;
        }
        self.items.remove(index);
        if self.active >= self.items.len() {
            self.active = 0;
        }
        true
    }

    /// Advance the active slide one step, wrapping around (autoplay tick)
    pub fn advance(&mut self) {
        if !self.items.is_empty() {
            self.active = (self.active + 1) % self.items.len();
        }
    }

    /// Jump straight to a slide (indicator click). Does not restart the
    /// autoplay timer; only a full reload does that.
    pub fn go_to(&mut self, index: usize) {
        if index < self.items.len() {
            self.active = index;
        }
    }

    /// JSON-encode the whole slide list for the `carousel_items` config key
    pub fn serialize(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.items)
    }
}

/// Opaque, monotonic-ish slide id derived from the creation timestamp
fn mint_id() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

fn parse_items(configs: &ConfigMap) -> Vec<CarouselItem> {
    if let Some(raw) = configs.get(CAROUSEL_ITEMS_KEY) {
        if !raw.trim().is_empty() {
            match serde_json::from_str::<Vec<CarouselItem>>(raw) {
                Ok(items) => return items,
                Err(err) => {
                    log::warn!("ignoring malformed {CAROUSEL_ITEMS_KEY} config: {err}");
                }
            }
        }
    }
    legacy_items(configs)
}

/// Migrate the pre-list single-slide config shape
fn legacy_items(configs: &ConfigMap) -> Vec<CarouselItem> {
    match configs.get(LEGACY_IMAGE_KEY) {
        Some(url) if !url.is_empty() => vec![CarouselItem {
            id: mint_id(),
            image_url: url.to_string(),
            title: configs.get_or(LEGACY_TITLE_KEY, DEFAULT_TITLE).to_string(),
            subtitle: configs
                .get_or(LEGACY_SUBTITLE_KEY, DEFAULT_SUBTITLE)
                .to_string(),
        }],
        _ => Vec::new(),
    }
}

/// `C:\...` style paths, or anything with a backslash in it
fn looks_like_local_path(url: &str) -> bool {
    let bytes = url.as_bytes();
    let drive_prefix =
        bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'\\';
    drive_prefix || url.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configs(pairs: &[(&str, &str)]) -> ConfigMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn item(id: &str, url: &str, title: &str, subtitle: &str) -> CarouselItem {
        CarouselItem {
            id: id.to_string(),
            image_url: url.to_string(),
            title: title.to_string(),
            subtitle: subtitle.to_string(),
        }
    }

    #[test]
    fn test_default_slide_for_degenerate_configs() {
        // Absent, empty, unparseable and empty-array values all settle
        // on exactly one default slide after ensure_non_empty
        let cases = [
            configs(&[]),
            configs(&[(CAROUSEL_ITEMS_KEY, "")]),
            configs(&[(CAROUSEL_ITEMS_KEY, "   ")]),
            configs(&[(CAROUSEL_ITEMS_KEY, "{not json")]),
            configs(&[(CAROUSEL_ITEMS_KEY, "[]")]),
        ];

        for case in cases {
            let mut model = CarouselModel::load(&case);
            model.ensure_non_empty();

            assert_eq!(model.len(), 1);
            let slide = model.get(0).unwrap();
            assert_eq!(slide.image_url, DEFAULT_IMAGE_URL);
            assert_eq!(slide.title, DEFAULT_TITLE);
            assert_eq!(slide.subtitle, DEFAULT_SUBTITLE);
        }
    }

    #[test]
    fn test_legacy_single_slide_migration() {
        let model = CarouselModel::load(&configs(&[
            ("carousel_image_url", "https://example.com/a.png"),
            ("carousel_title", "T"),
        ]));

        assert_eq!(model.len(), 1);
        let slide = model.get(0).unwrap();
        assert_eq!(slide.image_url, "https://example.com/a.png");
        assert_eq!(slide.title, "T");
        // Missing legacy subtitle falls back to the default caption
        assert_eq!(slide.subtitle, DEFAULT_SUBTITLE);
    }

    #[test]
    fn test_malformed_items_fall_back_to_legacy() {
        let model = CarouselModel::load(&configs(&[
            (CAROUSEL_ITEMS_KEY, "{broken"),
            ("carousel_image_url", "https://example.com/old.png"),
        ]));

        assert_eq!(model.len(), 1);
        assert_eq!(model.get(0).unwrap().image_url, "https://example.com/old.png");
    }

    #[test]
    fn test_serialize_load_round_trip() {
        let items = vec![
            item("1", "https://example.com/a.png", "First", "one"),
            item("2", "", "Second", "two"),
            item("3", "https://example.com/c.png", "Third", ""),
        ];
        let model = CarouselModel {
            items: items.clone(),
            active: 0,
        };

        let json = model.serialize().unwrap();
        let reloaded = CarouselModel::load(&configs(&[(CAROUSEL_ITEMS_KEY, &json)]));

        assert_eq!(reloaded.items(), items.as_slice());
    }

    #[test]
    fn test_delete_floor() {
        let mut model = CarouselModel {
            items: vec![item("1", "u", "t", "s")],
            active: 0,
        };

        // Singleton: rejected, unchanged
        assert!(!model.delete(0));
        assert_eq!(model.len(), 1);

        model.items.push(item("2", "u2", "t2", "s2"));
        model.items.push(item("3", "u3", "t3", "s3"));

        assert!(model.delete(1));
        assert_eq!(model.len(), 2);
        // Remaining items keep their relative order
        assert_eq!(model.get(0).unwrap().id, "1");
        assert_eq!(model.get(1).unwrap().id, "3");
    }

    #[test]
    fn test_abandoned_add_rolls_back() {
        let mut model = CarouselModel {
            items: vec![item("1", "u", "t", "s")],
            active: 0,
        };
        let before = model.items().to_vec();

        let index = model.add();
        assert_eq!(model.len(), 2);
        assert!(model.cancel_edit(index));

        assert_eq!(model.items(), before.as_slice());
    }

    #[test]
    fn test_cancel_after_edit_keeps_slide() {
        let mut model = CarouselModel::default();
        let index = model.add();
        model.edit(
            index,
            "https://example.com/new.png".into(),
            "Edited".into(),
            NEW_SLIDE_SUBTITLE.into(),
        );

        assert!(!model.cancel_edit(index));
        assert_eq!(model.len(), 1);
        assert_eq!(model.get(0).unwrap().title, "Edited");
    }

    #[test]
    fn test_edit_preserves_id() {
        let mut model = CarouselModel::default();
        let index = model.add();
        let id = model.get(index).unwrap().id.clone();

        model.edit(index, "u".into(), "t".into(), "s".into());

        assert_eq!(model.get(index).unwrap().id, id);
    }

    #[test]
    fn test_local_paths_get_positional_placeholders() {
        let windows = item("1", "C:\\Users\\x\\img.png", "t", "s");
        let remote = item("2", "https://example.com/a.png", "t", "s");
        let empty = item("3", "", "t", "s");

        let resolved = CarouselModel::resolve_display_url(&windows, 2);
        assert_ne!(resolved, windows.image_url);
        assert!(resolved.ends_with("random=3"));

        assert_eq!(
            CarouselModel::resolve_display_url(&remote, 0),
            "https://example.com/a.png"
        );
        // Empty URLs pass through untouched
        assert_eq!(CarouselModel::resolve_display_url(&empty, 0), "");
    }

    #[test]
    fn test_autoplay_wraps_and_go_to_sets_directly() {
        let mut model = CarouselModel {
            items: vec![
                item("1", "a", "t", "s"),
                item("2", "b", "t", "s"),
                item("3", "c", "t", "s"),
            ],
            active: 0,
        };

        model.advance();
        model.advance();
        assert_eq!(model.active(), 2);
        model.advance();
        assert_eq!(model.active(), 0);

        model.go_to(1);
        assert_eq!(model.active(), 1);
        // Out-of-range jumps are ignored
        model.go_to(9);
        assert_eq!(model.active(), 1);
    }

    #[test]
    fn test_delete_clamps_active_slide() {
        let mut model = CarouselModel {
            items: vec![item("1", "a", "t", "s"), item("2", "b", "t", "s")],
            active: 1,
        };

        assert!(model.delete(1));
        assert_eq!(model.active(), 0);
    }
}
