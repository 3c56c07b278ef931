//! Site building.
//!
//! Renders every page through the same controllers a browser host would
//! drive, captures their output and writes it as static HTML.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── prepare_output() ──► clear when `clean`
//!     │
//!     ├── rayon::join
//!     │       ├── render_projects()  index.html + Projects/<folder>/<page>
//!     │       ├── render_articles()  articles.html + Articles/<slug>/index.html
//!     │       └── render_about()     about.html
//!     │
//!     ├── write pages (rayon) ──► page shell ──► minify
//!     ├── copy_assets()       ──► site files next to the pages
//!     └── DeepLinks::save()   ──► ?item= / ?article= table for `serve`
//! ```

use crate::{
    carousel::Carousel,
    config::SiteConfig,
    dom::{Element, Node},
    fetch::{CacheFetch, FsSource, HttpSource, Source},
    log,
    render::{
        Capture, Catalog, ListRenderer, Location,
        article::Articles,
        gallery::Gallery,
        panels::{productions, recommendations, skills, software},
        project::Projects,
    },
    store::{FileStore, KvStore, MemoryStore},
    utils::minify::minify,
};
use anyhow::{Context, Result};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::{Instant, SystemTime},
};
use walkdir::{DirEntry, WalkDir};

/// Deep-link table written next to the pages.
pub const LINKS_FILE: &str = ".folio-links.json";

pub const INDEX_PAGE: &str = "index.html";
pub const ARTICLES_PAGE: &str = "articles.html";
pub const ABOUT_PAGE: &str = "about.html";

/// Site navigation, in display order.
const NAV: &[(&str, &str)] = &[
    (INDEX_PAGE, "Gallery"),
    (ARTICLES_PAGE, "Articles"),
    (ABOUT_PAGE, "About"),
];

/// Files never copied to the output.
const IGNORED_FILES: &[&str] = &[".DS_Store"];

// ============================================================================
// Types
// ============================================================================

/// A rendered page waiting to be written.
#[derive(Debug)]
pub struct Page {
    /// Output path relative to the output directory.
    pub path: String,
    pub title: String,
    pub body: Node,
}

impl Page {
    /// Page titled after its first `<h1>`, or the site title.
    fn new(path: String, body: Node, site_title: &str) -> Self {
        let title = body
            .find_by_tag("h1")
            .first()
            .map(|h1| Node::Element((*h1).clone()).text_content())
            .filter(|title| !title.trim().is_empty())
            .map_or_else(|| site_title.to_owned(), |title| format!("{title} | {site_title}"));
        Self { path, title, body }
    }
}

/// Maps a selection parameter (`item=robot`) to its pre-rendered page.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DeepLinks {
    links: FxHashMap<String, String>,
}

impl DeepLinks {
    fn key(param: &str, slug: &str) -> String {
        format!("{param}={slug}")
    }

    pub fn insert(&mut self, param: &str, slug: &str, path: String) {
        self.links.insert(Self::key(param, slug), path);
    }

    pub fn extend(&mut self, other: Self) {
        self.links.extend(other.links);
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Page for the first query parameter that selects an entry.
    pub fn resolve(&self, location: &Location) -> Option<&str> {
        location
            .query
            .iter()
            .find_map(|(param, slug)| self.links.get(&Self::key(param, slug)))
            .map(String::as_str)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("Invalid link table {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw).with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// What a build produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    pub pages: usize,
    pub assets: usize,
    pub links: usize,
}

// ============================================================================
// Entry points
// ============================================================================

/// Render the whole site into `config.build.output`.
pub fn build_site(config: &SiteConfig) -> Result<BuildReport> {
    let output = &config.build.output;
    prepare_output(output, config.build.clean)?;

    let fetch = CacheFetch::new(open_source(config)?, open_store(config)?);
    let started = Instant::now();

    let (((projects, project_links), (articles, article_links)), about) = rayon::join(
        || {
            rayon::join(
                || render_projects(&fetch, config),
                || render_articles(&fetch, config),
            )
        },
        || render_about(&fetch, config),
    );

    let mut pages = projects;
    pages.extend(articles);
    pages.push(about);

    pages
        .par_iter()
        .try_for_each(|page| write_page(page, output, config))?;

    let assets = if config.fetch.base_url.is_none() {
        copy_assets(config, &pages)?
    } else {
        log!("build"; "remote source, skipping asset copy");
        0
    };

    let mut links = project_links;
    links.extend(article_links);
    links.save(&output.join(LINKS_FILE))?;

    let report = BuildReport {
        pages: pages.len(),
        assets,
        links: links.len(),
    };
    log!(
        "build";
        "{} pages, {} assets in {:.2?}",
        report.pages,
        report.assets,
        started.elapsed()
    );
    Ok(report)
}

/// Remove every persistent cache entry.
pub fn clean_cache(config: &SiteConfig) -> Result<()> {
    let dir = config.cache_dir();
    let store = FileStore::open(&dir)
        .with_context(|| format!("Failed to open cache {}", dir.display()))?;
    let entries = store.len();
    store.clear();
    log!("cache"; "removed {entries} entries from {}", dir.display());
    Ok(())
}

fn open_source(config: &SiteConfig) -> Result<Box<dyn Source>> {
    Ok(match &config.fetch.base_url {
        Some(base) => {
            log!("build"; "fetching content from {base}");
            Box::new(HttpSource::new(base, config.fetch.timeout())?)
        }
        None => Box::new(FsSource::new(config.get_root())),
    })
}

fn open_store(config: &SiteConfig) -> Result<Box<dyn KvStore>> {
    if !config.cache.enable {
        return Ok(Box::new(MemoryStore::new()));
    }
    let dir = config.cache_dir();
    let store = FileStore::open(&dir)
        .with_context(|| format!("Failed to open cache {}", dir.display()))?;
    Ok(Box::new(store))
}

fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clear output directory: {}", output.display()))?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))
}

// ============================================================================
// Rendering
// ============================================================================

/// List page plus one detail page per manifest entry.
///
/// Entries that fail to load still get a page carrying the failure message,
/// so previous/next links never dangle.
fn render_catalog<C: Catalog>(
    list: &mut ListRenderer<C>,
    list_page: &str,
    site_title: &str,
) -> (Vec<Page>, DeepLinks) {
    let mut surface = Capture::new();
    list.open_location(&mut surface, &Location::new(&format!("/{list_page}")));
    let body = surface.take().unwrap_or_else(|| Node::Fragment(Vec::new()));
    let mut pages = vec![Page::new(list_page.to_owned(), body, site_title)];

    let targets: Vec<(String, String)> = list
        .entries()
        .iter()
        .map(|entry| (entry.slug.clone(), list.href_of(entry)))
        .collect();

    let mut links = DeepLinks::default();
    for (slug, href) in targets {
        list.render_detail(&mut surface, &slug);
        if let Some(body) = surface.take() {
            links.insert(C::PARAM, &slug, href.clone());
            pages.push(Page::new(href, body, site_title));
        }
    }
    (pages, links)
}

fn render_projects<S: Source, K: KvStore>(
    fetch: &CacheFetch<S, K>,
    config: &SiteConfig,
) -> (Vec<Page>, DeepLinks) {
    let mut gallery = Gallery::new(
        Projects::new(fetch, config),
        Location::new(&format!("/{INDEX_PAGE}")),
    );
    let rendered = render_catalog(gallery.list_mut(), INDEX_PAGE, &config.site.title);
    log!("render"; "{} project pages", rendered.1.len());
    rendered
}

fn render_articles<S: Source, K: KvStore>(
    fetch: &CacheFetch<S, K>,
    config: &SiteConfig,
) -> (Vec<Page>, DeepLinks) {
    let mut list = ListRenderer::new(
        Articles::new(fetch, config),
        Location::new(&format!("/{ARTICLES_PAGE}")),
    );
    let rendered = render_catalog(&mut list, ARTICLES_PAGE, &config.site.title);
    log!("render"; "{} article pages", rendered.1.len());
    rendered
}

fn render_about<S: Source, K: KvStore>(fetch: &CacheFetch<S, K>, config: &SiteConfig) -> Page {
    let section = |id: &str, heading: &str| {
        Element::new("section")
            .attr("id", id)
            .child(Element::new("h2").text(heading))
    };
    let carousel = Carousel::new(recommendations(fetch, config), &config.carousel, Instant::now());

    let body = Element::new("div")
        .class("about")
        .child(section("productions-panel", "Productions").child(productions(fetch, config)))
        .child(section("skills-section", "Skills").child(skills(fetch, config)))
        .child(section("software-section", "Software").child(software(fetch, config)))
        .child(section("recommendations-panel", "Recommendations").child(carousel.render()));

    Page {
        path: ABOUT_PAGE.to_owned(),
        title: format!("About | {}", config.site.title),
        body: body.into(),
    }
}

/// Full document around a page body.
pub fn page_shell(page: &Page, config: &SiteConfig) -> String {
    let head = Element::new("head")
        .child(Element::new("meta").attr("charset", "utf-8"))
        .child(
            Element::new("meta")
                .attr("name", "viewport")
                .attr("content", "width=device-width, initial-scale=1"),
        )
        .child(Element::new("base").attr("href", "/"))
        .child(Element::new("title").text(page.title.as_str()))
        .children(config.site.stylesheets.iter().map(|href| {
            Element::new("link")
                .attr("rel", "stylesheet")
                .attr("href", href.as_str())
        }));

    let nav = Element::new("nav").class("site-nav").children(NAV.iter().map(|(href, label)| {
        let link = Element::new("a").attr("href", *href).text(*label);
        if page.path == *href {
            link.class("current").attr("aria-current", "page")
        } else {
            link
        }
    }));

    let body = Element::new("body").child(nav).child(
        Element::new("main")
            .attr("id", "content")
            .child(page.body.clone()),
    );

    let html = Element::new("html")
        .attr("lang", config.site.language.as_str())
        .child(head)
        .child(body);
    format!("<!DOCTYPE html>{}", Node::from(html).to_html())
}

fn write_page(page: &Page, output: &Path, config: &SiteConfig) -> Result<()> {
    let dest = output.join(&page.path);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    let html = page_shell(page, config);
    fs::write(&dest, minify(html.as_bytes(), config))
        .with_context(|| format!("Failed to write {}", dest.display()))
}

// ============================================================================
// Assets
// ============================================================================

/// Copy the site's files (media, stylesheets, descriptors) into the output,
/// skipping the output, the cache and hidden entries.
///
/// Source files at a rendered page's path are never copied over the page.
fn copy_assets(config: &SiteConfig, pages: &[Page]) -> Result<usize> {
    let root = config.get_root();
    let output = &config.build.output;
    let skip = [output.clone(), config.cache_dir(), config.config_path.clone()];
    let rendered: FxHashSet<&Path> = pages.iter().map(|page| Path::new(&page.path)).collect();
    let files: Vec<(PathBuf, PathBuf)> = collect_assets(root, &skip)
        .into_iter()
        .filter_map(|path| {
            let relative = path.strip_prefix(root).ok()?.to_path_buf();
            (!rendered.contains(relative.as_path())).then_some((path, relative))
        })
        .collect();
    let clean = config.build.clean;

    files.par_iter().try_for_each(|(path, relative)| -> Result<()> {
        let dest = output.join(relative);
        if !clean && is_up_to_date(path, &dest) {
            return Ok(());
        }
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &dest)
            .with_context(|| format!("Failed to copy {}", path.display()))?;
        Ok(())
    })?;
    Ok(files.len())
}

fn collect_assets(root: &Path, skip: &[PathBuf]) -> Vec<PathBuf> {
    let keep = |entry: &DirEntry| {
        let name = entry.file_name().to_str().unwrap_or_default();
        let hidden = entry.depth() > 0 && name.starts_with('.');
        !hidden && !skip.iter().any(|skipped| entry.path() == skipped)
    };
    WalkDir::new(root)
        .into_iter()
        .filter_entry(keep)
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(DirEntry::into_path)
        .collect()
}

/// Destination exists and is not older than the source.
fn is_up_to_date(src: &Path, dst: &Path) -> bool {
    let modified = |path: &Path| -> Option<SystemTime> { path.metadata().ok()?.modified().ok() };
    match (modified(src), modified(dst)) {
        (Some(src), Some(dst)) => src <= dst,
        _ => false,
    }
}
