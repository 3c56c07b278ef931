//! Project gallery: banner, size controls and the thumbnail grid.
//!
//! The grid is the list view of [`Projects`]; [`Gallery`] adds the
//! thumbnail-size preference and the description toggle of the project page
//! on top of the shared list controller.

use super::project::Projects;
use super::{ListRenderer, Location, Surface};
use crate::content::media::{MediaEntry, MediaItem};
use crate::dom::{Action, Element, Key, Node, ResizeStep, Trigger};
use crate::fetch::Source;
use crate::log;
use crate::store::KvStore;

/// Store key of the thumbnail width preference.
pub const SIZE_KEY: &str = "thumbnailMinWidth";
pub const MIN_WIDTH: u32 = 100;
pub const MAX_WIDTH: u32 = 500;
pub const WIDTH_STEP: u32 = 50;
pub const DEFAULT_WIDTH: u32 = 250;

// ============================================================================
// Overlay icons
// ============================================================================

/// Which media kinds a project shows, as thumbnail overlay icons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overlays {
    pub images: bool,
    pub video: bool,
    pub youtube: bool,
    pub sketchfab: bool,
}

impl Overlays {
    pub fn of(media: &[MediaEntry]) -> Self {
        let images = media
            .iter()
            .filter(|entry| {
                matches!(
                    entry.item,
                    MediaItem::Image { .. } | MediaItem::ImageComparison { .. }
                )
            })
            .count();
        Self {
            images: images > 1,
            video: media.iter().any(|entry| {
                matches!(&entry.item, MediaItem::Video { url } if url.to_ascii_lowercase().ends_with(".mp4"))
            }),
            youtube: media
                .iter()
                .any(|entry| matches!(entry.item, MediaItem::YouTube { .. })),
            sketchfab: media
                .iter()
                .any(|entry| matches!(entry.item, MediaItem::Sketchfab { .. })),
        }
    }

    /// Icon classes in display order.
    pub fn classes(&self) -> Vec<&'static str> {
        [
            (self.images, "fa-solid fa-layer-group"),
            (self.video, "fa-solid fa-video"),
            (self.youtube, "fa-brands fa-youtube"),
            (self.sketchfab, "fa-solid fa-cube"),
        ]
        .into_iter()
        .filter_map(|(shown, class)| shown.then_some(class))
        .collect()
    }

    /// Icons laid out left to right over the thumbnail.
    pub fn icons(&self) -> Vec<Element> {
        self.classes()
            .into_iter()
            .enumerate()
            .map(|(i, class)| {
                Element::new("i")
                    .class(class)
                    .class("overlay-icon")
                    .attr("style", format!("left: {}px", 10 + i * 25))
                    .attr("aria-hidden", "true")
            })
            .collect()
    }
}

/// Banner image: the first media entry marked with `*` across projects.
pub fn banner<'a>(projects: impl IntoIterator<Item = &'a [MediaEntry]>) -> Option<&'a str> {
    projects
        .into_iter()
        .flatten()
        .filter(|entry| entry.banner)
        .find_map(|entry| match &entry.item {
            MediaItem::Image { url } => Some(url.as_str()),
            _ => None,
        })
}

// ============================================================================
// Thumbnail size
// ============================================================================

/// Persisted minimum thumbnail width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSizer {
    width: u32,
}

impl Default for ThumbnailSizer {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
        }
    }
}

impl ThumbnailSizer {
    /// Read the stored width. Missing, unparsable or out-of-range values give
    /// the default.
    pub fn load(store: &impl KvStore) -> Self {
        let width = store
            .get(SIZE_KEY)
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|width| (MIN_WIDTH..=MAX_WIDTH).contains(width))
            .unwrap_or(DEFAULT_WIDTH);
        Self { width }
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Apply `step` and persist the result. Returns whether the width changed.
    pub fn apply(&mut self, step: ResizeStep, store: &impl KvStore) -> bool {
        let width = match step {
            ResizeStep::Grow => (self.width + WIDTH_STEP).min(MAX_WIDTH),
            ResizeStep::Shrink => self.width.saturating_sub(WIDTH_STEP).max(MIN_WIDTH),
            ResizeStep::Reset => DEFAULT_WIDTH,
        };
        if width == self.width {
            return false;
        }
        self.width = width;
        store.set(SIZE_KEY, &width.to_string());
        true
    }

    pub fn grid_style(&self) -> String {
        format!(
            "grid-template-columns: repeat(auto-fill, minmax({}px, 1fr))",
            self.width
        )
    }
}

// ============================================================================
// Layout
// ============================================================================

/// Banner, size controls, then the thumbnail grid.
pub fn layout(cards: Vec<Element>, banner: &str, sizer: &ThumbnailSizer) -> Node {
    let resize = |id: &str, label: &str, text: &str, step: ResizeStep| {
        Element::new("button")
            .attr("id", id)
            .attr("aria-label", label)
            .text(text)
            .activatable(Action::ResizeThumbnails(step))
    };

    let top = Element::new("div")
        .class("top-container")
        .attr("style", format!("background-image: url('{banner}')"));

    let controls = Element::new("div")
        .class("thumbnail-controls")
        .child(resize("minus-button", "Smaller thumbnails", "-", ResizeStep::Shrink))
        .child(resize("plus-button", "Larger thumbnails", "+", ResizeStep::Grow));

    let grid = Element::new("div")
        .attr("id", "thumbnail-container")
        .attr("style", sizer.grid_style())
        .on(Trigger::Key(Key::Char('+')), Action::ResizeThumbnails(ResizeStep::Grow))
        .on(Trigger::Key(Key::Char('=')), Action::ResizeThumbnails(ResizeStep::Grow))
        .on(Trigger::Key(Key::Char('-')), Action::ResizeThumbnails(ResizeStep::Shrink))
        .on(Trigger::Key(Key::Char('r')), Action::ResizeThumbnails(ResizeStep::Reset))
        .children(cards);

    Node::Fragment(vec![top.into(), controls.into(), grid.into()])
}

// ============================================================================
// Controller
// ============================================================================

/// Home page controller: project list and project pages.
pub struct Gallery<'a, S: Source, K: KvStore> {
    list: ListRenderer<Projects<'a, S, K>>,
}

impl<'a, S: Source, K: KvStore> Gallery<'a, S, K> {
    pub fn new(projects: Projects<'a, S, K>, base: Location) -> Self {
        Self {
            list: ListRenderer::new(projects, base),
        }
    }

    pub const fn list(&self) -> &ListRenderer<Projects<'a, S, K>> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListRenderer<Projects<'a, S, K>> {
        &mut self.list
    }

    pub fn open_location(&mut self, surface: &mut impl Surface, location: &Location) {
        self.list.catalog().collapse_description();
        self.list.open_location(surface, location);
    }

    /// Apply an action. Returns whether it was handled.
    pub fn dispatch(&mut self, surface: &mut impl Surface, action: &Action) -> bool {
        match action {
            Action::ResizeThumbnails(step) => {
                let store = self.list.catalog().store();
                let mut sizer = ThumbnailSizer::load(store);
                if sizer.apply(*step, store) {
                    log!("render"; "thumbnail width {}px", sizer.width());
                    if self.list.current().is_none() {
                        self.list.rebuild(surface);
                    }
                }
                true
            }
            Action::ToggleDescription => {
                self.list.catalog().toggle_description();
                if let Some(slug) = self.list.current().map(str::to_owned) {
                    self.list.render_detail(surface, &slug);
                }
                true
            }
            Action::Open(_) | Action::Step(_) => {
                self.list.catalog().collapse_description();
                self.list.dispatch(surface, action)
            }
            _ => self.list.dispatch(surface, action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::fetch::CacheFetch;
    use crate::render::Capture;
    use crate::render::project::tests::site;
    use crate::store::MemoryStore;

    fn entry(item: MediaItem) -> MediaEntry {
        MediaEntry {
            item,
            description: None,
            banner: false,
        }
    }

    fn image(url: &str) -> MediaEntry {
        entry(MediaItem::Image { url: url.into() })
    }

    fn config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.fetch.retries = 1;
        config.fetch.backoff_ms = 0;
        config
    }

    #[test]
    fn test_overlay_flags() {
        let one = Overlays::of(&[image("a.png")]);
        assert_eq!(one, Overlays::default());

        let media = vec![
            image("a.png"),
            entry(MediaItem::ImageComparison {
                before: "b.png".into(),
                after: "c.png".into(),
            }),
            entry(MediaItem::Video { url: "clip.MP4".into() }),
            entry(MediaItem::Sketchfab { id: "abc".into() }),
        ];
        let overlays = Overlays::of(&media);
        assert!(overlays.images && overlays.video && overlays.sketchfab);
        assert!(!overlays.youtube);

        let webm = Overlays::of(&[entry(MediaItem::Video { url: "clip.webm".into() })]);
        assert!(!webm.video);
    }

    #[test]
    fn test_overlay_icon_positions() {
        let icons = Overlays {
            youtube: true,
            sketchfab: true,
            ..Overlays::default()
        }
        .icons();
        assert_eq!(icons.len(), 2);
        assert!(icons[0].has_class("fa-youtube"));
        assert_eq!(icons[0].get_attr("style"), Some("left: 10px"));
        assert!(icons[1].has_class("fa-cube"));
        assert_eq!(icons[1].get_attr("style"), Some("left: 35px"));
    }

    #[test]
    fn test_banner_first_marked() {
        let mut marked = image("Projects/b/hero.png");
        marked.banner = true;
        let mut later = image("Projects/c/other.png");
        later.banner = true;
        let first = vec![image("Projects/a/x.png")];
        let second = vec![marked];
        let third = vec![later];
        let projects = [first.as_slice(), second.as_slice(), third.as_slice()];
        assert_eq!(banner(projects), Some("Projects/b/hero.png"));
        assert_eq!(banner([first.as_slice()]), None);
    }

    #[test]
    fn test_sizer_bounds_and_persistence() {
        let store = MemoryStore::new();
        let mut sizer = ThumbnailSizer::load(&store);
        assert_eq!(sizer.width(), DEFAULT_WIDTH);

        for _ in 0..10 {
            sizer.apply(ResizeStep::Grow, &store);
        }
        assert_eq!(sizer.width(), MAX_WIDTH);
        assert!(!sizer.apply(ResizeStep::Grow, &store));
        assert_eq!(store.get(SIZE_KEY).as_deref(), Some("500"));

        for _ in 0..10 {
            sizer.apply(ResizeStep::Shrink, &store);
        }
        assert_eq!(sizer.width(), MIN_WIDTH);
        assert_eq!(ThumbnailSizer::load(&store).width(), MIN_WIDTH);

        assert!(sizer.apply(ResizeStep::Reset, &store));
        assert_eq!(sizer.width(), DEFAULT_WIDTH);
    }

    #[test]
    fn test_sizer_rejects_bad_stored_values() {
        let store = MemoryStore::new();
        store.set(SIZE_KEY, "huge");
        assert_eq!(ThumbnailSizer::load(&store).width(), DEFAULT_WIDTH);
        store.set(SIZE_KEY, "900");
        assert_eq!(ThumbnailSizer::load(&store).width(), DEFAULT_WIDTH);
        store.set(SIZE_KEY, "300");
        assert_eq!(ThumbnailSizer::load(&store).width(), 300);
    }

    #[test]
    fn test_gallery_grid() {
        let fetch = CacheFetch::new(site(), MemoryStore::new());
        let config = config();
        let mut gallery = Gallery::new(Projects::new(&fetch, &config), Location::new("/index.html"));
        let mut surface = Capture::new();
        gallery.open_location(&mut surface, &Location::parse("/index.html"));

        let node = surface.current.clone().unwrap();
        let html = surface.html();
        // robot has a banner-marked image, ghost failed and is skipped
        assert!(html.contains(r#"background-image: url('Projects/robot/front.png')"#));
        assert_eq!(node.find_by_class("thumbnail").len(), 2);
        assert!(html.contains(r#"<a href="Projects/robot/robot.html" role="link""#));
        assert!(html.contains(r#"<div class="thumbnail-title">Robot</div>"#));
        assert!(html.contains(r#"src="Resources/default-video-thumbnail.jpg""#));
        assert!(html.contains("minmax(250px, 1fr)"));

        let robot = &node.find_by_class("thumbnail")[0];
        let icons: Vec<_> = robot
            .children
            .iter()
            .filter_map(|child| match child {
                Node::Element(el) if el.has_class("overlay-icon") => Some(el),
                _ => None,
            })
            .collect();
        // two images and a YouTube link
        assert_eq!(icons.len(), 2);

        let grid = node
            .elements()
            .into_iter()
            .find(|e| e.get_attr("id") == Some("thumbnail-container"))
            .unwrap();
        assert_eq!(
            grid.action_for(&Trigger::Key(Key::Char('r'))),
            Some(&Action::ResizeThumbnails(ResizeStep::Reset))
        );
    }

    #[test]
    fn test_resize_rebuilds_without_fetching() {
        let fetch = CacheFetch::new(site(), MemoryStore::new());
        let config = config();
        let mut gallery = Gallery::new(Projects::new(&fetch, &config), Location::new("/index.html"));
        let mut surface = Capture::new();
        gallery.open_location(&mut surface, &Location::parse("/index.html"));
        let requests = fetch.source().request_count();

        assert!(gallery.dispatch(&mut surface, &Action::ResizeThumbnails(ResizeStep::Grow)));
        assert!(surface.html().contains("minmax(300px, 1fr)"));
        assert_eq!(fetch.store().get(SIZE_KEY).as_deref(), Some("300"));
        assert_eq!(fetch.source().request_count(), requests);
    }

    #[test]
    fn test_toggle_description_and_collapse_on_navigation() {
        let fetch = CacheFetch::new(site(), MemoryStore::new());
        let mut config = config();
        config.content.description_truncate = 5;
        let mut gallery = Gallery::new(Projects::new(&fetch, &config), Location::new("/index.html"));
        let mut surface = Capture::new();
        gallery.open_location(&mut surface, &Location::parse("/index.html?item=robot"));
        assert!(surface.html().contains("Read More"));

        gallery.dispatch(&mut surface, &Action::ToggleDescription);
        assert!(surface.html().contains("Read Less"));
        assert_eq!(gallery.list().current(), Some("robot"));

        gallery.dispatch(&mut surface, &Action::Step(1));
        assert_eq!(gallery.list().current(), Some("ship"));
        assert!(!gallery.list().catalog().is_expanded());
    }
}
