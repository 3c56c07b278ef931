//! Media references: sniffing, manifests and rendering.
//!
//! A media reference is either an inline URL whose kind is sniffed from its
//! suffix or domain, or a structured record from a media manifest.
//!
//! | Kind              | Recognized by                                   |
//! |-------------------|-------------------------------------------------|
//! | `Image`           | `.jpeg .jpg .gif .png .webp`                    |
//! | `ImageComparison` | two image URLs joined by ` // `                 |
//! | `Video`           | `.mp4 .webm`                                    |
//! | `YouTube`         | `youtube.com/watch?v=ID`, `youtu.be/ID`         |
//! | `Sketchfab`       | `sketchfab.com/...-ID`                          |
//! | `ModelViewer`     | `.mview`                                        |

use crate::dom::{Element, Node};
use crate::log;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

/// HTTP(S) URLs inside free text.
pub static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"']+"#).unwrap());

const IMAGE_EXTS: &[&str] = &["jpeg", "jpg", "gif", "png", "webp"];
const VIDEO_EXTS: &[&str] = &["mp4", "webm"];
const MVIEW_EXT: &str = "mview";

/// Separator between the two halves of an image comparison line.
pub const PAIR_SEPARATOR: &str = " // ";
/// Description marker that turns a URL into a Marmoset viewer scene.
const MARMOSET_MARKER: &str = "(marmoset viewer)";

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaItem {
    Image { url: String },
    ImageComparison { before: String, after: String },
    Video { url: String },
    YouTube { id: String },
    Sketchfab { id: String },
    ModelViewer { url: String },
    Unsupported { url: String },
}

/// A media item with its optional caption, as listed in a media manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaEntry {
    pub item: MediaItem,
    pub description: Option<String>,
    /// Marked with a trailing `*`: the preferred banner image.
    pub banner: bool,
}

// ============================================================================
// Sniffing
// ============================================================================

/// Lowercased extension of a URL's path, query and fragment ignored.
fn extension(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let last = path.rsplit('/').next().unwrap_or(path);
    last.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())
}

fn has_ext(url: &str, exts: &[&str]) -> bool {
    extension(url).is_some_and(|ext| exts.contains(&ext.as_str()))
}

pub fn is_image_url(url: &str) -> bool {
    has_ext(url, IMAGE_EXTS)
}

pub fn is_video_url(url: &str) -> bool {
    has_ext(url, VIDEO_EXTS)
}

pub fn is_youtube_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.contains("youtube.com") || lower.contains("youtu.be")
}

pub fn is_sketchfab_url(url: &str) -> bool {
    url.to_ascii_lowercase().contains("sketchfab.com")
}

/// Whether a manifest line names media rather than describing it.
pub fn looks_like_media(line: &str) -> bool {
    is_image_url(line)
        || is_video_url(line)
        || has_ext(line, &[MVIEW_EXT])
        || is_youtube_url(line)
        || is_sketchfab_url(line)
}

/// Video id of a YouTube URL: the `v` query parameter, or the path of a
/// `youtu.be` short link.
pub fn youtube_id(url: &str) -> Option<String> {
    let (before_query, query) = url.split_once('?').unwrap_or((url, ""));
    let query = query.split('#').next().unwrap_or(query);

    let from_query = query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == "v" && !v.is_empty()).then(|| {
            urlencoding::decode(v)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| v.to_owned())
        })
    });
    if from_query.is_some() {
        return from_query;
    }

    let (_, rest) = before_query.split_once("youtu.be/")?;
    let id = rest.split('/').next().unwrap_or(rest);
    (!id.is_empty()).then(|| id.to_owned())
}

/// Model id of a Sketchfab URL: the last `-`-separated part of the last
/// path segment.
pub fn sketchfab_id(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path.trim_end_matches('/').rsplit('/').next()?;
    let id = segment.rsplit('-').next().unwrap_or(segment);
    (!id.is_empty()).then(|| id.to_owned())
}

impl MediaItem {
    /// Classify a single URL.
    pub fn sniff(url: &str) -> Self {
        let url = url.trim();
        let unsupported = || Self::Unsupported {
            url: url.to_owned(),
        };

        if is_image_url(url) {
            Self::Image { url: url.to_owned() }
        } else if is_video_url(url) {
            Self::Video { url: url.to_owned() }
        } else if is_youtube_url(url) {
            youtube_id(url).map_or_else(unsupported, |id| Self::YouTube { id })
        } else if is_sketchfab_url(url) {
            sketchfab_id(url).map_or_else(unsupported, |id| Self::Sketchfab { id })
        } else if has_ext(url, &[MVIEW_EXT]) {
            Self::ModelViewer { url: url.to_owned() }
        } else {
            unsupported()
        }
    }

    /// Classify a set of URLs; two URLs whose first is an image form a
    /// comparison.
    pub fn sniff_many(urls: &[String]) -> Self {
        match urls {
            [before, after, ..] if is_image_url(before) => Self::ImageComparison {
                before: before.clone(),
                after: after.clone(),
            },
            [first, ..] => Self::sniff(first),
            [] => Self::Unsupported { url: String::new() },
        }
    }

    pub const fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported { .. })
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Image { .. } => "image",
            Self::ImageComparison { .. } => "image-comparison",
            Self::Video { .. } => "video",
            Self::YouTube { .. } => "youtube",
            Self::Sketchfab { .. } => "sketchfab",
            Self::ModelViewer { .. } => "mview",
            Self::Unsupported { .. } => "unsupported",
        }
    }
}

// ============================================================================
// Manifests
// ============================================================================

/// Structured record from a JSON media manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl MediaRecord {
    pub fn into_entry(self) -> MediaEntry {
        let mut urls = self.urls;
        if let Some(url) = self.url {
            urls.insert(0, url);
        }
        let first = urls.first().cloned().unwrap_or_default();

        let item = match self.kind.as_str() {
            "image" => MediaItem::Image { url: first },
            "image-comparison" if urls.len() >= 2 => MediaItem::ImageComparison {
                before: urls[0].clone(),
                after: urls[1].clone(),
            },
            "video" => MediaItem::Video { url: first },
            "youtube" => youtube_id(&first)
                .map_or(MediaItem::Unsupported { url: first.clone() }, |id| {
                    MediaItem::YouTube { id }
                }),
            "sketchfab" => sketchfab_id(&first)
                .map_or(MediaItem::Unsupported { url: first.clone() }, |id| {
                    MediaItem::Sketchfab { id }
                }),
            "mview" => MediaItem::ModelViewer { url: first },
            _ => MediaItem::Unsupported { url: first },
        };

        MediaEntry {
            item,
            description: self.description.filter(|d| !d.trim().is_empty()),
            banner: false,
        }
    }
}

/// Parse a line-oriented media manifest.
///
/// - blank lines and `#` comments are skipped;
/// - a line followed by a line that is not media becomes captioned by it;
/// - `a // b` lists two URLs (an image comparison);
/// - a trailing `*` marks the banner image;
/// - relative URLs are prefixed with `base_path`;
/// - a caption containing `(marmoset viewer)` turns the URL into `<url>.mview`.
pub fn parse_media_list(raw: &str, base_path: &str) -> Vec<MediaEntry> {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    let mut entries = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let description = match lines.get(i + 1) {
            Some(next) if !looks_like_media(next.trim_end_matches('*').trim())
                && !next.contains(PAIR_SEPARATOR) =>
            {
                i += 1;
                Some((*next).to_owned())
            }
            _ => None,
        };
        i += 1;

        let (line, banner) = match line.strip_suffix('*') {
            Some(stripped) => (stripped.trim(), true),
            None => (line, false),
        };

        let mut urls: Vec<String> = line
            .split(PAIR_SEPARATOR)
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| absolutize(url, base_path))
            .collect();

        if description
            .as_deref()
            .is_some_and(|d| d.contains(MARMOSET_MARKER))
            && let Some(first) = urls.first()
        {
            urls = vec![format!("{first}.{MVIEW_EXT}")];
        }

        let item = MediaItem::sniff_many(&urls);
        if !item.is_supported() {
            log!("warn"; "skipping unsupported media `{line}`");
            continue;
        }
        entries.push(MediaEntry {
            item,
            description,
            banner,
        });
    }
    entries
}

/// Parse a JSON media manifest (array of records); unsupported records are
/// dropped.
pub fn parse_media_records(records: Vec<MediaRecord>) -> Vec<MediaEntry> {
    records
        .into_iter()
        .map(MediaRecord::into_entry)
        .filter(|entry| {
            let keep = entry.item.is_supported();
            if !keep {
                log!("warn"; "skipping unsupported {} media record", entry.item.kind());
            }
            keep
        })
        .collect()
}

fn absolutize(url: &str, base_path: &str) -> String {
    if url.starts_with("http") || base_path.is_empty() {
        url.to_owned()
    } else {
        format!("{}/{}", base_path.trim_end_matches('/'), url.trim_start_matches('/'))
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Embed for an item used inline in formatted text.
pub fn render_inline(item: &MediaItem) -> Node {
    match item {
        MediaItem::Image { url } => Element::new("img")
            .attr("src", url.as_str())
            .attr("alt", "Embedded image")
            .attr("loading", "lazy")
            .into(),
        MediaItem::Video { url } => video(url).into(),
        MediaItem::YouTube { id } => youtube(id).into(),
        MediaItem::Sketchfab { id } => sketchfab(id).into(),
        MediaItem::ModelViewer { url } => model_viewer(url).into(),
        MediaItem::ImageComparison { before, after } => comparison(before, after).into(),
        MediaItem::Unsupported { url } => external_link(url, url).into(),
    }
}

/// Figure for a media manifest entry.
pub fn render_entry(entry: &MediaEntry) -> Option<Node> {
    let figure = match &entry.item {
        MediaItem::Image { url } => figure("media-item").child(
            Element::new("div")
                .class("img-container")
                .child(image(url, "image-1", "Primary image")),
        ),
        MediaItem::ImageComparison { before, after } => {
            figure("media-item").child(comparison(before, after))
        }
        MediaItem::Video { url } => figure("media-item").child(video(url)),
        MediaItem::YouTube { id } => {
            figure("media-item responsive-iframe-container").child(youtube(id))
        }
        MediaItem::Sketchfab { id } => {
            figure("media-item responsive-iframe-container").child(sketchfab(id))
        }
        MediaItem::ModelViewer { url } => {
            figure("media-item marmoset-item").child(model_viewer(url))
        }
        MediaItem::Unsupported { .. } => return None,
    };

    let figure = match &entry.description {
        Some(description) => figure.child(
            Element::new("p")
                .class("media-description")
                .text(description.as_str()),
        ),
        None => figure,
    };
    Some(figure.into())
}

/// Anchor opening `url` in a new browsing context without leaking the opener
/// or referrer.
pub fn external_link(url: &str, label: &str) -> Element {
    Element::new("a")
        .attr("href", url)
        .attr("target", "_blank")
        .attr("rel", "noopener noreferrer")
        .text(label)
}

fn figure(class: &str) -> Element {
    Element::new("div").class(class).attr("role", "figure")
}

fn image(url: &str, class: &str, alt: &str) -> Element {
    Element::new("img")
        .attr("src", url)
        .class(class)
        .attr("alt", alt)
        .attr("loading", "lazy")
}

fn comparison(before: &str, after: &str) -> Element {
    Element::new("div")
        .class("image-comparison")
        .child(
            Element::new("div")
                .class("img-container")
                .child(image(before, "image-1", "Primary image"))
                .child(image(after, "image-2", "Secondary image").attr("style", "clip-path: inset(0 0 0 50%)")),
        )
        .child(
            Element::new("div")
                .class("slider-container")
                .child(
                    Element::new("div")
                        .class("slider-line")
                        .attr("style", "left: calc(50% - 1px)"),
                )
                .child(
                    Element::new("input")
                        .attr("type", "range")
                        .attr("min", "0")
                        .attr("max", "100")
                        .attr("value", "50")
                        .class("image-slider")
                        .attr("aria-label", "Image comparison slider"),
                ),
        )
}

fn video(url: &str) -> Element {
    Element::new("video")
        .attr("src", url)
        .flag("controls")
        .flag("muted")
        .attr("title", "Video content")
}

fn iframe(src: String, allow: &str, title: &str) -> Element {
    Element::new("iframe")
        .attr("src", src)
        .attr("allow", allow)
        .flag("allowfullscreen")
        .attr("loading", "lazy")
        .attr("title", title)
}

fn youtube(id: &str) -> Element {
    iframe(
        format!("https://www.youtube.com/embed/{}", urlencoding::encode(id)),
        "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture",
        "YouTube video",
    )
}

fn sketchfab(id: &str) -> Element {
    iframe(
        format!("https://sketchfab.com/models/{}/embed", urlencoding::encode(id)),
        "autoplay; fullscreen; vr",
        "Sketchfab model",
    )
}

fn model_viewer(url: &str) -> Element {
    iframe(url.to_owned(), "autoplay; fullscreen", "Marmoset Viewer")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_image_case_insensitive() {
        assert_eq!(
            MediaItem::sniff("https://x.com/a/B.PNG"),
            MediaItem::Image { url: "https://x.com/a/B.PNG".into() }
        );
        assert!(matches!(
            MediaItem::sniff("https://x.com/a.jpg?raw=1"),
            MediaItem::Image { .. }
        ));
    }

    #[test]
    fn test_sniff_video() {
        assert!(matches!(MediaItem::sniff("clip.webm"), MediaItem::Video { .. }));
        assert!(matches!(MediaItem::sniff("https://a.b/c.mp4"), MediaItem::Video { .. }));
    }

    #[test]
    fn test_youtube_id_exact() {
        assert_eq!(
            MediaItem::sniff("https://www.youtube.com/watch?v=XYZ"),
            MediaItem::YouTube { id: "XYZ".into() }
        );
        assert_eq!(
            youtube_id("https://www.youtube.com/watch?feature=share&v=abc_123#t=10"),
            Some("abc_123".into())
        );
        assert_eq!(youtube_id("https://youtu.be/dQw4w9WgXcQ"), Some("dQw4w9WgXcQ".into()));
        assert_eq!(youtube_id("https://www.youtube.com/channel/x"), None);
    }

    #[test]
    fn test_sketchfab_id() {
        assert_eq!(
            sketchfab_id("https://sketchfab.com/3d-models/old-robot-0a1b2c3d"),
            Some("0a1b2c3d".into())
        );
        assert_eq!(
            sketchfab_id("https://sketchfab.com/models/abc123/"),
            Some("abc123".into())
        );
    }

    #[test]
    fn test_sniff_mview_and_unknown() {
        assert!(matches!(MediaItem::sniff("scene.mview"), MediaItem::ModelViewer { .. }));
        assert_eq!(
            MediaItem::sniff("https://example.com/page"),
            MediaItem::Unsupported { url: "https://example.com/page".into() }
        );
    }

    #[test]
    fn test_sniff_many_comparison() {
        let urls = vec!["a.png".to_owned(), "b.png".to_owned()];
        assert_eq!(
            MediaItem::sniff_many(&urls),
            MediaItem::ImageComparison { before: "a.png".into(), after: "b.png".into() }
        );
    }

    #[test]
    fn test_parse_media_list() {
        let raw = "\
# comment
render.png*
The final render
before.jpg // after.jpg
https://www.youtube.com/watch?v=abc
Trailer
scene
Interactive (marmoset viewer)
notes.pdf
";
        let entries = parse_media_list(raw, "/Projects/robot");
        assert_eq!(entries.len(), 4);

        assert_eq!(
            entries[0].item,
            MediaItem::Image { url: "/Projects/robot/render.png".into() }
        );
        assert!(entries[0].banner);
        assert_eq!(entries[0].description.as_deref(), Some("The final render"));

        assert_eq!(
            entries[1].item,
            MediaItem::ImageComparison {
                before: "/Projects/robot/before.jpg".into(),
                after: "/Projects/robot/after.jpg".into(),
            }
        );
        assert_eq!(entries[2].item, MediaItem::YouTube { id: "abc".into() });
        assert_eq!(entries[2].description.as_deref(), Some("Trailer"));
        assert_eq!(
            entries[3].item,
            MediaItem::ModelViewer { url: "/Projects/robot/scene.mview".into() }
        );
    }

    #[test]
    fn test_parse_media_records() {
        let records: Vec<MediaRecord> = serde_json::from_str(
            r#"[
                {"type": "image", "url": "a.png", "description": "A"},
                {"type": "image-comparison", "urls": ["b.png", "c.png"]},
                {"type": "sketchfab", "url": "https://sketchfab.com/3d-models/x-99"},
                {"type": "hologram", "url": "h.holo"}
            ]"#,
        )
        .unwrap();
        let entries = parse_media_records(records);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].description.as_deref(), Some("A"));
        assert_eq!(entries[1].item.kind(), "image-comparison");
        assert_eq!(entries[2].item, MediaItem::Sketchfab { id: "99".into() });
    }

    #[test]
    fn test_render_entry_youtube() {
        let entry = MediaEntry {
            item: MediaItem::YouTube { id: "XYZ".into() },
            description: Some("Trailer".into()),
            banner: false,
        };
        let html = render_entry(&entry).unwrap().to_html();
        assert!(html.contains(r#"src="https://www.youtube.com/embed/XYZ""#));
        assert!(html.contains("allowfullscreen"));
        assert!(html.contains(r#"<p class="media-description">Trailer</p>"#));
    }

    #[test]
    fn test_render_comparison_has_slider() {
        let node = render_inline(&MediaItem::ImageComparison {
            before: "a.png".into(),
            after: "b.png".into(),
        });
        assert_eq!(node.find_by_tag("img").len(), 2);
        assert_eq!(node.find_by_class("image-slider").len(), 1);
    }

    #[test]
    fn test_external_link_policy() {
        let html = Node::from(external_link("https://a.b/c", "c")).to_html();
        assert_eq!(
            html,
            r#"<a href="https://a.b/c" target="_blank" rel="noopener noreferrer">c</a>"#
        );
    }
}
