//! Project descriptors: `description.txt` and `stats.txt`.
//!
//! # Description format
//!
//! ```text
//! Title
//! ---
//! Free text, URLs become hostname buttons.
//! ---
//! Blender, Substance Painter
//! ---
//! thumbnail.jpg
//! ---
//! page.html
//! ```
//!
//! Every part is optional. A JSON descriptor
//! `{ "title", "description", "tags", "media" }` is accepted too.

use super::document::{DEFAULT_TITLE, SEPARATOR};
use super::media::{MediaEntry, MediaRecord, URL_PATTERN, parse_media_records};
use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_DESCRIPTION: &str = "No description";
pub const DEFAULT_PAGE: &str = "index.html";

/// Parsed `description.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescription {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub thumbnail: Option<String>,
    /// Page file inside the project folder.
    pub page: String,
}

impl Default for ProjectDescription {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            description: DEFAULT_DESCRIPTION.to_owned(),
            tags: Vec::new(),
            thumbnail: None,
            page: DEFAULT_PAGE.to_owned(),
        }
    }
}

impl ProjectDescription {
    /// Parse `title---description---tags---thumbnail---page`.
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.split(SEPARATOR).map(str::trim);
        let mut next = || parts.next().filter(|part| !part.is_empty());
        let defaults = Self::default();

        Self {
            title: next().map_or(defaults.title, str::to_owned),
            description: next().map_or(defaults.description, str::to_owned),
            tags: next().map(split_tags).unwrap_or_default(),
            thumbnail: next().map(str::to_owned),
            page: next().map_or(defaults.page, str::to_owned),
        }
    }

    /// Parse the JSON form, returning its embedded media list as well.
    pub fn from_json(value: Value) -> (Self, Vec<MediaEntry>) {
        let Ok(raw) = serde_json::from_value::<JsonProject>(value) else {
            return (Self::default(), Vec::new());
        };
        let defaults = Self::default();
        let non_empty = |s: Option<String>| s.filter(|s| !s.trim().is_empty());

        let description = Self {
            title: non_empty(raw.title).unwrap_or(defaults.title),
            description: non_empty(raw.description).unwrap_or(defaults.description),
            tags: raw.tags.into_iter().filter(|t| !t.trim().is_empty()).collect(),
            thumbnail: non_empty(raw.thumbnail),
            page: non_empty(raw.page).unwrap_or(defaults.page),
        };
        (description, parse_media_records(raw.media))
    }

    /// Description cut at `limit` characters, or `None` when it fits.
    ///
    /// The cut never splits a URL: a cut inside one moves to its end.
    pub fn split_description(&self, limit: usize) -> Option<(&str, &str)> {
        let text = self.description.as_str();
        let (mut cut, _) = text.char_indices().nth(limit)?;
        if let Some(url) = URL_PATTERN
            .find_iter(text)
            .find(|url| url.start() < cut && cut < url.end())
        {
            cut = url.end();
        }
        (cut < text.len()).then(|| text.split_at(cut))
    }
}

#[derive(Deserialize)]
struct JsonProject {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    page: Option<String>,
    #[serde(default)]
    media: Vec<MediaRecord>,
}

fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
        .collect()
}

// ============================================================================
// Description text
// ============================================================================

/// A run of description text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    /// A URL shown as a button labelled with its hostname.
    Link { url: &'a str, host: String },
}

/// Split text into plain runs and hostname links.
pub fn link_segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for found in URL_PATTERN.find_iter(text) {
        let url = found.as_str();
        let Some(host) = hostname(url) else { continue };
        if found.start() > last {
            out.push(Segment::Text(&text[last..found.start()]));
        }
        out.push(Segment::Link { url, host });
        last = found.end();
    }
    if last < text.len() {
        out.push(Segment::Text(&text[last..]));
    }
    out
}

/// Host part of an absolute URL.
pub fn hostname(url: &str) -> Option<String> {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))
}

// ============================================================================
// Stats
// ============================================================================

/// Material icon for a known stat key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatIcon {
    pub name: &'static str,
    pub class: &'static str,
}

const STAT_ICONS: &[(&str, StatIcon)] = &[
    ("Triangles", StatIcon { name: "change_history", class: "triangle-icon" }),
    ("Materials", StatIcon { name: "texture", class: "material-icon" }),
    ("Texture Size", StatIcon { name: "straighten", class: "size-icon" }),
    ("Texel Density", StatIcon { name: "square_foot", class: "td-icon" }),
    ("Target Engine", StatIcon { name: "gamepad", class: "engine-icon" }),
    ("Workflow", StatIcon { name: "brush", class: "workflow-icon" }),
    ("Collaborators", StatIcon { name: "groups", class: "collab-icon" }),
];

/// One `Key: value (info)` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub key: String,
    pub value: String,
    pub info: Option<String>,
}

impl Stat {
    pub fn icon(&self) -> Option<StatIcon> {
        STAT_ICONS
            .iter()
            .find(|(key, _)| *key == self.key)
            .map(|(_, icon)| *icon)
    }
}

/// Parse `stats.txt`. Lines without a value are dropped.
pub fn parse_stats(raw: &str) -> Vec<Stat> {
    raw.lines()
        .map(str::trim)
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            let mut value = value.trim();
            let mut info = None;

            if let (Some(open), Some(close)) = (value.find('('), value.find(')'))
                && open < close
            {
                info = Some(value[open + 1..close].trim().to_owned());
                value = value[..open].trim();
            }

            (!value.is_empty()).then(|| Stat {
                key: key.trim().to_owned(),
                value: value.to_owned(),
                info: info.filter(|i| !i.is_empty()),
            })
        })
        .collect()
}
