//! Manifests: the list of content units a page renders.
//!
//! A manifest is either a plain newline-separated list of slugs/folders, or
//! JSON:
//!
//! ```json
//! [
//!   { "slug": "hello-world", "title": "Hello", "date": "2024-03-01",
//!     "tags": ["rust"], "thumbnail": "Articles/hello-world/thumb.jpg" },
//!   "bare-slug"
//! ]
//! ```
//!
//! The array may also be wrapped in an object under `items`, `articles` or
//! `projects`.

use super::document::parse_list;
use crate::utils::date::DateTimeUtc;
use serde::Deserialize;
use serde_json::Value;
use std::cmp::Ordering;

/// One content unit listed by a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestEntry {
    #[serde(alias = "folder")]
    pub slug: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl ManifestEntry {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: None,
            date: None,
            tags: Vec::new(),
            thumbnail: None,
        }
    }

    pub fn with_date(mut self, date: &str) -> Self {
        self.date = Some(date.to_owned());
        self
    }

    pub fn parsed_date(&self) -> Option<DateTimeUtc> {
        self.date.as_deref().and_then(DateTimeUtc::parse)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Slug(String),
    Entry(ManifestEntry),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawManifest {
    List(Vec<RawEntry>),
    Wrapped {
        #[serde(alias = "articles", alias = "projects")]
        items: Vec<RawEntry>,
    },
}

/// Entries from a decoded JSON manifest. Unrecognized shapes yield nothing.
pub fn from_json(value: Value) -> Vec<ManifestEntry> {
    let raw = match serde_json::from_value::<RawManifest>(value) {
        Ok(RawManifest::List(items) | RawManifest::Wrapped { items }) => items,
        Err(_) => return Vec::new(),
    };
    raw.into_iter()
        .map(|entry| match entry {
            RawEntry::Slug(slug) => ManifestEntry::new(slug.trim()),
            RawEntry::Entry(entry) => entry,
        })
        .filter(|entry| !entry.slug.trim().is_empty())
        .collect()
}

/// Entries from a plain slug list.
pub fn from_text(raw: &str) -> Vec<ManifestEntry> {
    parse_list(raw).into_iter().map(ManifestEntry::new).collect()
}

/// Sort newest first when any entry carries a date.
///
/// The sort is stable: entries sharing a date keep manifest order. Entries
/// without a parseable date go after every dated entry, in manifest order.
pub fn sort_by_date(entries: &mut [ManifestEntry]) {
    if entries.iter().all(|e| e.date.is_none()) {
        return;
    }
    entries.sort_by(|a, b| compare_newest_first(a.parsed_date(), b.parsed_date()));
}

fn compare_newest_first(a: Option<DateTimeUtc>, b: Option<DateTimeUtc>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn slugs(entries: &[ManifestEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.slug.as_str()).collect()
    }

    #[test]
    fn test_from_json_array() {
        let entries = from_json(json!([
            {"slug": "a", "title": "A", "date": "2024-01-01", "tags": ["x", "y"]},
            "b",
            {"folder": "c", "thumbnail": "c.png"}
        ]));
        assert_eq!(slugs(&entries), vec!["a", "b", "c"]);
        assert_eq!(entries[0].tags, vec!["x", "y"]);
        assert_eq!(entries[2].thumbnail.as_deref(), Some("c.png"));
    }

    #[test]
    fn test_from_json_wrapped() {
        let entries = from_json(json!({"articles": [{"slug": "a"}]}));
        assert_eq!(slugs(&entries), vec!["a"]);
    }

    #[test]
    fn test_from_json_unrecognized() {
        assert!(from_json(json!({"unexpected": true})).is_empty());
        assert!(from_json(json!(42)).is_empty());
        assert!(from_json(json!(["", "  "])).is_empty());
    }

    #[test]
    fn test_from_text() {
        let entries = from_text("robot\n\nship\n");
        assert_eq!(slugs(&entries), vec!["robot", "ship"]);
    }

    #[test]
    fn test_sort_descending() {
        let mut entries = vec![
            ManifestEntry::new("jan").with_date("2024-01-01"),
            ManifestEntry::new("mar").with_date("2024-03-01"),
            ManifestEntry::new("feb").with_date("2024-02-01"),
        ];
        sort_by_date(&mut entries);
        assert_eq!(slugs(&entries), vec!["mar", "feb", "jan"]);
    }

    #[test]
    fn test_sort_stable_for_equal_dates() {
        let mut entries = vec![
            ManifestEntry::new("first").with_date("2024-02-01"),
            ManifestEntry::new("newest").with_date("2024-05-01"),
            ManifestEntry::new("second").with_date("2024-02-01"),
            ManifestEntry::new("third").with_date("2024-02-01"),
        ];
        sort_by_date(&mut entries);
        assert_eq!(slugs(&entries), vec!["newest", "first", "second", "third"]);
    }

    #[test]
    fn test_sort_undated_last_in_order() {
        let mut entries = vec![
            ManifestEntry::new("undated-1"),
            ManifestEntry::new("old").with_date("2020-01-01"),
            ManifestEntry::new("bad").with_date("someday"),
            ManifestEntry::new("new").with_date("2024-01-01"),
        ];
        sort_by_date(&mut entries);
        assert_eq!(slugs(&entries), vec!["new", "old", "undated-1", "bad"]);
    }

    #[test]
    fn test_sort_without_dates_keeps_order() {
        let mut entries = vec![ManifestEntry::new("b"), ManifestEntry::new("a")];
        sort_by_date(&mut entries);
        assert_eq!(slugs(&entries), vec!["b", "a"]);
    }
}
