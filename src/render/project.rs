//! Projects: gallery thumbnails on the list page, the project page as detail
//! view.
//!
//! Each project folder holds a descriptor, a media list and optional stats:
//!
//! ```text
//! Projects/<folder>/
//!     description.txt   title---description---tags---thumbnail---page
//!     media.txt         one media line per item
//!     stats.txt         Key: value (info)
//! ```

use super::gallery::{self, Overlays, ThumbnailSizer};
use super::list::{Catalog, Siblings};
use crate::config::SiteConfig;
use crate::content::media::{MediaEntry, external_link, parse_media_list, render_entry};
use crate::content::project::{
    DEFAULT_PAGE, ProjectDescription, Segment, Stat, link_segments, parse_stats,
};
use crate::content::{ManifestEntry, manifest_from_payload};
use crate::dom::{Action, Element, Key, Node, Trigger};
use crate::error::FetchError;
use crate::fetch::{CacheFetch, CacheKey, Payload, Source};
use crate::log;
use crate::store::KvStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Everything a project page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPage {
    pub description: ProjectDescription,
    pub media: Vec<MediaEntry>,
    /// `None` when `stats.txt` could not be loaded.
    pub stats: Option<Vec<Stat>>,
    /// Thumbnail resolved against the project folder.
    pub thumbnail: Option<String>,
}

pub struct Projects<'a, S, K> {
    fetch: &'a CacheFetch<S, K>,
    manifest: String,
    dir: String,
    descriptor: String,
    media: String,
    stats: String,
    description_truncate: usize,
    default_thumbnail: String,
    default_banner: String,
    version: String,
    retries: u32,
    backoff: Duration,
    expanded: AtomicBool,
}

impl<'a, S: Source, K: KvStore> Projects<'a, S, K> {
    pub fn new(fetch: &'a CacheFetch<S, K>, config: &SiteConfig) -> Self {
        let content = &config.content;
        Self {
            fetch,
            manifest: content.projects_manifest.clone(),
            dir: content.projects_dir.clone(),
            descriptor: content.project_descriptor.clone(),
            media: content.project_media.clone(),
            stats: content.project_stats.clone(),
            description_truncate: content.description_truncate,
            default_thumbnail: content.default_thumbnail.clone(),
            default_banner: content.default_banner.clone(),
            version: config.cache.version.clone(),
            retries: config.fetch.retries,
            backoff: config.fetch.backoff(),
            expanded: AtomicBool::new(false),
        }
    }

    /// Store backing the fetch cache, also holding UI preferences.
    pub fn store(&self) -> &K {
        self.fetch.store()
    }

    /// Flip the description between truncated and full.
    pub fn toggle_description(&self) {
        self.expanded.fetch_xor(true, Ordering::Relaxed);
    }

    pub fn collapse_description(&self) {
        self.expanded.store(false, Ordering::Relaxed);
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded.load(Ordering::Relaxed)
    }

    fn base(&self, folder: &str) -> String {
        format!("{}/{folder}", self.dir)
    }

    fn key(&self, kind: &str, folder: &str) -> CacheKey {
        CacheKey::new(kind, folder, &self.version)
    }

    fn manifest_key(&self) -> CacheKey {
        CacheKey::new("projects", "manifest", &self.version)
    }

    fn fetch_retrying(&self, url: &str, key: &CacheKey) -> Result<Payload, FetchError> {
        self.fetch
            .fetch_with_retry(url, key, self.retries, self.backoff)
            .ok_or_else(|| FetchError::Exhausted {
                url: url.to_owned(),
                attempts: self.retries.max(1),
            })
    }

    fn resolve(&self, folder: &str, url: &str) -> String {
        if url.starts_with("http") || url.starts_with('/') {
            url.to_owned()
        } else {
            format!("{}/{url}", self.base(folder))
        }
    }
}

impl<S: Source, K: KvStore> Catalog for Projects<'_, S, K> {
    type Item = ProjectPage;

    const PARAM: &'static str = "item";
    const EMPTY_MESSAGE: &'static str = "No projects found.";
    const FAILED_MESSAGE: &'static str = "Failed to load projects. Please try again later.";
    const FAILED_DETAIL_MESSAGE: &'static str = "Error loading project.";
    const BACK_LABEL: &'static str = "Back to Gallery";
    const DETAIL_CLASS: &'static str = "project-full-view";

    fn manifest(&self) -> Result<Vec<ManifestEntry>, FetchError> {
        let payload = self.fetch.fetch(&self.manifest, &self.manifest_key())?;
        Ok(manifest_from_payload(&self.manifest, payload))
    }

    fn invalidate(&self) {
        self.fetch.invalidate(&self.manifest_key());
    }

    fn load(&self, entry: &ManifestEntry) -> Result<ProjectPage, FetchError> {
        let folder = entry.slug.as_str();
        let base = self.base(folder);
        let descriptor_url = format!("{base}/{}", self.descriptor);

        let descriptor = self.fetch_retrying(&descriptor_url, &self.key("desc", folder))?;
        let (description, media) = match descriptor {
            Payload::Json(value) => ProjectDescription::from_json(value),
            Payload::Text(text) => {
                let media_url = format!("{base}/{}", self.media);
                let media = match self.fetch_retrying(&media_url, &self.key("media", folder))? {
                    Payload::Text(text) => parse_media_list(&text, &base),
                    Payload::Json(_) => Vec::new(),
                };
                (ProjectDescription::parse(&text), media)
            }
        };

        let stats_url = format!("{base}/{}", self.stats);
        let stats = match self.fetch.fetch_text(&stats_url, &self.key("stats", folder)) {
            Ok(text) => Some(parse_stats(&text)),
            Err(err) => {
                log!("render"; "no stats for {folder}: {err}");
                None
            }
        };

        let thumbnail = description
            .thumbnail
            .as_deref()
            .map(|thumb| self.resolve(folder, thumb));
        Ok(ProjectPage {
            description,
            media,
            stats,
            thumbnail,
        })
    }

    fn card(&self, entry: &ManifestEntry, page: &ProjectPage) -> Element {
        let title = page.description.title.as_str();
        let src = page
            .thumbnail
            .as_deref()
            .unwrap_or(self.default_thumbnail.as_str());

        let thumbnail = Element::new("div")
            .class("thumbnail")
            .children(Overlays::of(&page.media).icons())
            .child(
                Element::new("img")
                    .attr("src", src)
                    .attr("alt", title)
                    .attr("loading", "lazy"),
            )
            .child(Element::new("div").class("thumbnail-title").text(title));

        Element::new("a")
            .attr("href", self.href(entry, Some(page)))
            .attr("role", "link")
            .child(thumbnail)
    }

    fn list(&self, cards: Vec<Element>, loaded: &[(ManifestEntry, ProjectPage)]) -> Node {
        let banner = gallery::banner(loaded.iter().map(|(_, page)| page.media.as_slice()))
            .unwrap_or(self.default_banner.as_str());
        let sizer = ThumbnailSizer::load(self.fetch.store());
        gallery::layout(cards, banner, &sizer)
    }

    fn detail(&self, _entry: &ManifestEntry, page: &ProjectPage, siblings: &Siblings) -> Node {
        project_page(page, self.description_truncate, self.is_expanded(), siblings)
    }

    fn href(&self, entry: &ManifestEntry, page: Option<&ProjectPage>) -> String {
        let file = page.map_or(DEFAULT_PAGE, |page| page.description.page.as_str());
        format!("{}/{file}", self.base(&entry.slug))
    }
}

// ============================================================================
// Page
// ============================================================================

/// Full project page. Arrow keys step through projects.
pub fn project_page(
    page: &ProjectPage,
    truncate: usize,
    expanded: bool,
    siblings: &Siblings,
) -> Node {
    let desc = &page.description;

    let media = Element::new("div")
        .attr("id", "project-media")
        .class("media-container")
        .children(page.media.iter().filter_map(render_entry));

    Element::new("div")
        .class("project-page")
        .on(Trigger::Key(Key::ArrowLeft), Action::Step(-1))
        .on(Trigger::Key(Key::ArrowRight), Action::Step(1))
        .child(Element::new("h1").attr("id", "project-title").text(desc.title.as_str()))
        .child(description(desc, truncate, expanded))
        .child(
            Element::new("div").attr("id", "project-tags").children(
                desc.tags
                    .iter()
                    .map(|tag| Element::new("div").class("software-tag").text(tag.as_str())),
            ),
        )
        .child(media)
        .child(stats(page.stats.as_deref()))
        .child(navigation(siblings))
        .into()
}

fn description(desc: &ProjectDescription, truncate: usize, expanded: bool) -> Element {
    let container = Element::new("div").attr("id", "project-description");
    let Some((head, tail)) = desc.split_description(truncate) else {
        return container.children(linked(&desc.description));
    };

    let mut ellipsis = Element::new("span").attr("id", "ellipsis").text("...");
    let mut full = Element::new("span")
        .attr("id", "full-description")
        .class("full-description")
        .children(linked(tail));
    if expanded {
        ellipsis = ellipsis.attr("style", "display: none");
        full = full.class("visible");
    }

    container
        .children(linked(head))
        .child(ellipsis)
        .child(full)
        .child(Element::new("br"))
        .child(
            Element::new("span")
                .attr("id", "toggle-description")
                .attr("tabindex", "0")
                .text(if expanded { "Read Less" } else { "Read More" })
                .activatable(Action::ToggleDescription),
        )
}

/// Text with URLs as hostname buttons.
fn linked(text: &str) -> Vec<Node> {
    link_segments(text)
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) => Node::Text(text.to_owned()),
            Segment::Link { url, host } => external_link(url, &host).class("link-button").into(),
        })
        .collect()
}

fn stats(stats: Option<&[Stat]>) -> Element {
    let container = Element::new("div")
        .attr("id", "project-stats")
        .attr("role", "list");
    let Some(stats) = stats else {
        return container.child(Element::new("p").text("Error loading stats."));
    };

    container.children(stats.iter().map(|stat| {
        let mut el = Element::new("div").class("stat").attr("role", "listitem");
        if let Some(icon) = stat.icon() {
            el = el.child(
                Element::new("span")
                    .class("material-icons")
                    .class("stat-icon")
                    .class(icon.class)
                    .text(icon.name),
            );
        }
        el = el.child(
            Element::new("span")
                .child(Element::new("strong").text(format!("{}:", stat.key)))
                .text(format!(" {}", stat.value)),
        );
        if let Some(info) = &stat.info {
            el = el
                .child(
                    Element::new("i")
                        .class("fa-solid")
                        .class("fa-circle-info")
                        .class("stat-info-icon")
                        .attr("aria-label", format!("More info: {info}")),
                )
                .child(Element::new("div").class("tooltip").text(info.as_str()));
        }
        el
    }))
}

fn navigation(siblings: &Siblings) -> Element {
    let link = |id: &str, label: &str, href: Option<&str>, step: i32| {
        let el = Element::new("a")
            .attr("id", id)
            .attr("tabindex", "0")
            .text(label)
            .activatable(Action::Step(step));
        match href {
            Some(href) => el.attr("href", href),
            None => el.attr("aria-disabled", "true"),
        }
    };
    Element::new("nav")
        .class("project-nav")
        .child(link(
            "prev-project",
            "Previous",
            siblings.prev.as_ref().map(|s| s.href.as_str()),
            -1,
        ))
        .child(link(
            "next-project",
            "Next",
            siblings.next.as_ref().map(|s| s.href.as_str()),
            1,
        ))
}
