/// Settings form model and config bookkeeping
///
/// The settings page edits five scalar config values plus the carousel
/// slide list. Saving writes each key through the gateway individually;
/// the user sees one success only if every write lands.

use chrono::{NaiveDate, NaiveDateTime};

use crate::state::carousel::CAROUSEL_ITEMS_KEY;
use crate::state::data::ConfigMap;

pub const MOTTO_KEY: &str = "motto";
pub const VALUES_KEY: &str = "values";
pub const RULES_KEY: &str = "rules";
pub const RELATIONSHIP_DATE_KEY: &str = "relationship_date";
pub const FIRST_MEETING_DATE_KEY: &str = "first_meeting_date";

/// Home-page fallbacks when the service has nothing stored
pub const DEFAULT_MOTTO: &str = "Love is eternal";
pub const DEFAULT_VALUES: &str = "Honesty\nAcceptance\nGrowth";
pub const DEFAULT_RULES: &str = "Understand each other\nRespect each other\nTrust each other";

/// Editable scalar settings, mirrored from the config table
#[derive(Debug, Clone, Default)]
pub struct SettingsForm {
    pub relationship_date: String,
    pub first_meeting_date: String,
    pub motto: String,
    pub values: String,
    pub rules: String,
}

impl SettingsForm {
    /// Populate the form from a freshly fetched config map. Raw values,
    /// no defaults: the form shows exactly what is stored.
    pub fn from_configs(configs: &ConfigMap) -> Self {
        let field = |key| configs.get(key).unwrap_or_default().to_string();
        Self {
            relationship_date: field(RELATIONSHIP_DATE_KEY),
            first_meeting_date: field(FIRST_MEETING_DATE_KEY),
            motto: field(MOTTO_KEY),
            values: field(VALUES_KEY),
            rules: field(RULES_KEY),
        }
    }

    /// The six key/value writes a save consists of: the five scalar
    /// settings (text fields trimmed) plus the serialized slide list.
    pub fn entries(&self, carousel_json: String) -> Vec<(String, String)> {
        vec![
            (
                RELATIONSHIP_DATE_KEY.to_string(),
                self.relationship_date.trim().to_string(),
            ),
            (
                FIRST_MEETING_DATE_KEY.to_string(),
                self.first_meeting_date.trim().to_string(),
            ),
            (MOTTO_KEY.to_string(), self.motto.trim().to_string()),
            (VALUES_KEY.to_string(), self.values.trim().to_string()),
            (RULES_KEY.to_string(), self.rules.trim().to_string()),
            (CAROUSEL_ITEMS_KEY.to_string(), carousel_json),
        ]
    }
}

/// Whole days between a stored `YYYY-MM-DD` config value and `now`,
/// rounded up so any elapsed part of a day counts. Used by the home
/// page day counters. `None` when the value is absent or unparseable.
pub fn days_since(date_str: &str, now: NaiveDateTime) -> Option<i64> {
    let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    let seconds = (now - midnight).num_seconds().abs();
    Some((seconds + 86_399) / 86_400)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_days_since_rounds_partial_days_up() {
        // Exactly midnight of the stored day: zero days
        assert_eq!(days_since("2024-01-01", at("2024-01-01", "00:00:00")), Some(0));
        // Noon the same day already counts as one
        assert_eq!(days_since("2024-01-01", at("2024-01-01", "12:00:00")), Some(1));
        // A day and a half later rounds up to two
        assert_eq!(days_since("2024-01-01", at("2024-01-02", "12:00:00")), Some(2));
    }

    #[test]
    fn test_days_since_rejects_garbage() {
        let now = at("2024-01-01", "10:00:00");
        assert_eq!(days_since("", now), None);
        assert_eq!(days_since("not a date", now), None);
    }

    #[test]
    fn test_entries_trim_and_cover_every_key() {
        let form = SettingsForm {
            relationship_date: " 2020-02-14 ".into(),
            first_meeting_date: "2019-12-24".into(),
            motto: "  us  ".into(),
            values: "a\nb".into(),
            rules: "c".into(),
        };

        let entries = form.entries("[]".into());
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();

        assert_eq!(
            keys,
            vec![
                RELATIONSHIP_DATE_KEY,
                FIRST_MEETING_DATE_KEY,
                MOTTO_KEY,
                VALUES_KEY,
                RULES_KEY,
                CAROUSEL_ITEMS_KEY,
            ]
        );
        assert_eq!(entries[0].1, "2020-02-14");
        assert_eq!(entries[2].1, "us");
        assert_eq!(entries[5].1, "[]");
    }

    #[test]
    fn test_form_mirrors_configs_without_defaults() {
        let configs: ConfigMap = [(MOTTO_KEY.to_string(), "always".to_string())]
            .into_iter()
            .collect();

        let form = SettingsForm::from_configs(&configs);

        assert_eq!(form.motto, "always");
        // Missing keys stay empty in the form; defaults are a render
        // concern of the home page only
        assert_eq!(form.values, "");
    }
}
