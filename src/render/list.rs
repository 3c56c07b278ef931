//! List/detail controller shared by every manifest-driven page.
//!
//! ```text
//! render_list(force)
//!     │
//!     ├── cached fragment && !force ──► show
//!     │
//!     ├── manifest ──► sort by date ──► load entries (rayon, joined)
//!     │
//!     └── cards ──► cache fragment ──► show
//!
//! open(slug) ──► push ?param=slug ──► render_detail(slug)
//! back()     ──► replace without param ──► cached list
//! ```

use super::{Location, Surface, loading, message};
use crate::content::{ManifestEntry, manifest::sort_by_date};
use crate::dom::{Action, Element, Key, Node, Trigger};
use crate::error::FetchError;
use crate::log;
use rayon::prelude::*;

/// One kind of listed content (articles, projects).
pub trait Catalog: Sync {
    /// Loaded content of one entry.
    type Item: Send;

    /// Query parameter selecting an entry (`?article=<slug>`).
    const PARAM: &'static str;
    const EMPTY_MESSAGE: &'static str;
    const FAILED_MESSAGE: &'static str;
    const FAILED_DETAIL_MESSAGE: &'static str;
    const BACK_LABEL: &'static str;
    /// Class of the detail view wrapper.
    const DETAIL_CLASS: &'static str;

    fn manifest(&self) -> Result<Vec<ManifestEntry>, FetchError>;

    /// Forget the cached manifest so the next call re-fetches it.
    fn invalidate(&self) {}

    fn load(&self, entry: &ManifestEntry) -> Result<Self::Item, FetchError>;

    /// Stand-in for an entry that failed to load. `None` drops the entry.
    fn fallback(&self, _entry: &ManifestEntry) -> Option<Self::Item> {
        None
    }

    fn card(&self, entry: &ManifestEntry, item: &Self::Item) -> Element;

    /// Container around the cards.
    fn list(&self, cards: Vec<Element>, loaded: &[(ManifestEntry, Self::Item)]) -> Node;

    fn detail(&self, entry: &ManifestEntry, item: &Self::Item, siblings: &Siblings) -> Node;

    /// Address of an entry's own page.
    fn href(&self, entry: &ManifestEntry, item: Option<&Self::Item>) -> String;
}

/// Neighbours of an open entry, wrapping at both ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Siblings {
    pub prev: Option<Sibling>,
    pub next: Option<Sibling>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sibling {
    pub slug: String,
    pub href: String,
}

pub struct ListRenderer<C: Catalog> {
    catalog: C,
    /// Location of the list, without the selection parameter.
    base: Location,
    entries: Vec<ManifestEntry>,
    loaded: Vec<(ManifestEntry, C::Item)>,
    cached: Option<Node>,
    current: Option<String>,
}

impl<C: Catalog> ListRenderer<C> {
    pub fn new(catalog: C, base: Location) -> Self {
        Self {
            catalog,
            base: base.without_param(C::PARAM),
            entries: Vec::new(),
            loaded: Vec::new(),
            cached: None,
            current: None,
        }
    }

    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Manifest entries in display order.
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Entries that rendered a card, with their content.
    pub fn loaded(&self) -> &[(ManifestEntry, C::Item)] {
        &self.loaded
    }

    /// Slug of the open detail view.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    // ========================================================================
    // List
    // ========================================================================

    /// Show the list, reusing the built fragment unless `force`.
    pub fn render_list(&mut self, surface: &mut impl Surface, force: bool) {
        self.current = None;
        if !force && let Some(cached) = &self.cached {
            surface.show(cached.clone());
            return;
        }

        surface.show(loading());
        if force {
            self.catalog.invalidate();
        }
        if let Err(err) = self.fetch_entries() {
            log!("error"; "cannot load {} list: {err}", C::PARAM);
            surface.show(message(C::FAILED_MESSAGE));
            return;
        }
        if self.entries.is_empty() {
            self.loaded.clear();
            self.cache_and_show(surface, message(C::EMPTY_MESSAGE));
            return;
        }

        let catalog = &self.catalog;
        let results: Vec<_> = self
            .entries
            .par_iter()
            .map(|entry| (entry, catalog.load(entry)))
            .collect();

        self.loaded = results
            .into_iter()
            .filter_map(|(entry, result)| match result {
                Ok(item) => Some((entry.clone(), item)),
                Err(err) => {
                    log!("render"; "{}: {err}", entry.slug);
                    catalog.fallback(entry).map(|item| (entry.clone(), item))
                }
            })
            .collect();
        log!("render"; "{} {} cards", self.loaded.len(), C::PARAM);

        let node = if self.loaded.is_empty() {
            message(C::EMPTY_MESSAGE)
        } else {
            self.build_list()
        };
        self.cache_and_show(surface, node);
    }

    /// Rebuild the list from already loaded content, without fetching.
    pub fn rebuild(&mut self, surface: &mut impl Surface) {
        if self.loaded.is_empty() {
            self.render_list(surface, false);
            return;
        }
        let node = self.build_list();
        self.cache_and_show(surface, node);
    }

    fn cache_and_show(&mut self, surface: &mut impl Surface, node: Node) {
        self.cached = Some(node.clone());
        surface.show(node);
    }

    fn fetch_entries(&mut self) -> Result<(), FetchError> {
        let mut entries = self.catalog.manifest()?;
        sort_by_date(&mut entries);
        self.entries = entries;
        Ok(())
    }

    fn build_list(&self) -> Node {
        let cards = self
            .loaded
            .iter()
            .map(|(entry, item)| {
                self.catalog
                    .card(entry, item)
                    .attr("data-slug", entry.slug.as_str())
                    .attr("tabindex", "0")
                    .activatable(Action::Open(entry.slug.clone()))
            })
            .collect();
        self.catalog.list(cards, &self.loaded)
    }

    // ========================================================================
    // Detail
    // ========================================================================

    /// Select `slug`: record it in the address bar, then show it.
    pub fn open(&mut self, surface: &mut impl Surface, slug: &str) {
        surface.push_url(&self.base.with_param(C::PARAM, slug));
        self.render_detail(surface, slug);
    }

    /// Show the full view of `slug`.
    pub fn render_detail(&mut self, surface: &mut impl Surface, slug: &str) {
        surface.show(loading());
        if self.entries.is_empty()
            && let Err(err) = self.fetch_entries()
        {
            log!("render"; "no manifest for {slug}: {err}");
        }

        let entry = self
            .entries
            .iter()
            .find(|entry| entry.slug == slug)
            .cloned()
            .unwrap_or_else(|| ManifestEntry::new(slug));

        match self.catalog.load(&entry) {
            Ok(item) => {
                let siblings = self.siblings(slug);
                let back = Element::new("button")
                    .class("back-button")
                    .text(C::BACK_LABEL)
                    .activatable(Action::Back);
                let view = Element::new("div")
                    .class(C::DETAIL_CLASS)
                    .on(Trigger::Key(Key::Escape), Action::Back)
                    .child(back)
                    .child(self.catalog.detail(&entry, &item, &siblings));
                surface.show(view.into());
            }
            Err(err) => {
                log!("error"; "cannot load {slug}: {err}");
                surface.show(message(C::FAILED_DETAIL_MESSAGE));
            }
        }
        self.current = Some(slug.to_owned());
        surface.scroll_to_top();
    }

    /// Leave the detail view for the cached list.
    pub fn back(&mut self, surface: &mut impl Surface) {
        surface.replace_url(&self.base.without_param(C::PARAM));
        self.render_list(surface, false);
    }

    /// Open the previous (`delta < 0`) or next entry, wrapping.
    pub fn step(&mut self, surface: &mut impl Surface, delta: i32) {
        let Some(current) = self.current.clone() else {
            return;
        };
        let siblings = self.siblings(&current);
        let target = if delta < 0 { siblings.prev } else { siblings.next };
        if let Some(target) = target {
            self.open(surface, &target.slug);
        }
    }

    /// Page address of `entry`, using its loaded content when there is some.
    pub fn href_of(&self, entry: &ManifestEntry) -> String {
        let item = self
            .loaded
            .iter()
            .find(|(loaded, _)| loaded.slug == entry.slug)
            .map(|(_, item)| item);
        self.catalog.href(entry, item)
    }

    pub fn siblings(&self, slug: &str) -> Siblings {
        let len = self.entries.len();
        let Some(index) = self.entries.iter().position(|entry| entry.slug == slug) else {
            return Siblings::default();
        };
        if len < 2 {
            return Siblings::default();
        }
        let sibling = |i: usize| {
            let entry = &self.entries[i];
            Sibling {
                slug: entry.slug.clone(),
                href: self.href_of(entry),
            }
        };
        Siblings {
            prev: Some(sibling((index + len - 1) % len)),
            next: Some(sibling((index + 1) % len)),
        }
    }

    // ========================================================================
    // Routing
    // ========================================================================

    /// Render whatever `location` asks for: a deep-linked detail view when it
    /// carries the selection parameter, the list otherwise.
    pub fn open_location(&mut self, surface: &mut impl Surface, location: &Location) {
        self.base = location.without_param(C::PARAM);
        match location.get(C::PARAM).filter(|slug| !slug.is_empty()) {
            Some(slug) => self.render_detail(surface, slug),
            None => self.render_list(surface, false),
        }
    }

    /// Apply a list/detail action. Returns whether it was handled.
    pub fn dispatch(&mut self, surface: &mut impl Surface, action: &Action) -> bool {
        match action {
            Action::Open(slug) => self.open(surface, slug),
            Action::Back => self.back(surface),
            Action::Step(delta) => self.step(surface, *delta),
            _ => return false,
        }
        true
    }
}
