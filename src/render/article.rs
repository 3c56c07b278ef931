//! Articles: cards on the list page, the formatted article as detail view.

use super::list::{Catalog, Siblings};
use crate::config::SiteConfig;
use crate::content::{
    ManifestEntry, document, format::format_nodes, manifest_from_payload,
};
use crate::dom::{Element, Node};
use crate::error::FetchError;
use crate::fetch::{CacheFetch, CacheKey, Source};
use crate::store::KvStore;
use crate::utils::date::DateTimeUtc;

/// Body shown for an article whose file failed to load.
const LOAD_ERROR_BODY: &str = "Error loading content";

/// Loaded article, ready for its card and detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub body: String,
    pub snippet: String,
    pub reading_time: usize,
}

pub struct Articles<'a, S, K> {
    fetch: &'a CacheFetch<S, K>,
    manifest: String,
    dir: String,
    default_thumbnail: String,
    snippet_length: usize,
    words_per_minute: usize,
    version: String,
}

impl<'a, S: Source, K: KvStore> Articles<'a, S, K> {
    pub fn new(fetch: &'a CacheFetch<S, K>, config: &SiteConfig) -> Self {
        let content = &config.content;
        Self {
            fetch,
            manifest: content.articles_manifest.clone(),
            dir: content.articles_dir.clone(),
            default_thumbnail: content.default_thumbnail.clone(),
            snippet_length: content.snippet_length,
            words_per_minute: content.words_per_minute,
            version: config.cache.version.clone(),
        }
    }

    fn manifest_key(&self) -> CacheKey {
        CacheKey::new("articles", "manifest", &self.version)
    }

    fn article(&self, entry: &ManifestEntry, title: String, body: String) -> Article {
        Article {
            title: entry.title.clone().unwrap_or(title),
            snippet: document::snippet(&body, self.snippet_length),
            reading_time: document::reading_time(&body, self.words_per_minute),
            body,
        }
    }
}

impl<S: Source, K: KvStore> Catalog for Articles<'_, S, K> {
    type Item = Article;

    const PARAM: &'static str = "article";
    const EMPTY_MESSAGE: &'static str = "No articles found.";
    const FAILED_MESSAGE: &'static str = "Failed to load articles.";
    const FAILED_DETAIL_MESSAGE: &'static str = "Failed to load article.";
    const BACK_LABEL: &'static str = "Back to Articles";
    const DETAIL_CLASS: &'static str = "article-full-view";

    fn manifest(&self) -> Result<Vec<ManifestEntry>, FetchError> {
        let payload = self.fetch.fetch(&self.manifest, &self.manifest_key())?;
        Ok(manifest_from_payload(&self.manifest, payload))
    }

    fn invalidate(&self) {
        self.fetch.invalidate(&self.manifest_key());
    }

    fn load(&self, entry: &ManifestEntry) -> Result<Article, FetchError> {
        let url = format!("{}/{}/article.txt", self.dir, entry.slug);
        let key = CacheKey::new("article", &entry.slug, &self.version);
        let doc = document::parse(&self.fetch.fetch_text(&url, &key)?);
        Ok(self.article(entry, doc.title, doc.body))
    }

    fn fallback(&self, entry: &ManifestEntry) -> Option<Article> {
        Some(self.article(entry, entry.slug.clone(), LOAD_ERROR_BODY.to_owned()))
    }

    fn card(&self, entry: &ManifestEntry, article: &Article) -> Element {
        let thumbnail = entry
            .thumbnail
            .as_deref()
            .unwrap_or(&self.default_thumbnail);

        let mut info = Element::new("p").class("article-info");
        if let Some(date) = &entry.date {
            let shown = entry
                .parsed_date()
                .map_or_else(|| date.clone(), DateTimeUtc::to_long_date);
            info = info.child(
                Element::new("span")
                    .class("published")
                    .text(format!("Published: {shown}")),
            );
        }
        info = info.child(
            Element::new("span")
                .class("reading-time")
                .text(format!("Reading Time: {} minutes", article.reading_time)),
        );
        if !entry.tags.is_empty() {
            info = info.child(
                Element::new("span").class("tags").text("Tags: ").children(
                    entry
                        .tags
                        .iter()
                        .map(|tag| Element::new("span").text(tag.as_str())),
                ),
            );
        }

        Element::new("article").class("article-card").child(
            Element::new("div")
                .class("article-preview")
                .child(
                    Element::new("img")
                        .attr("src", thumbnail)
                        .attr("alt", format!("{} thumbnail", article.title))
                        .class("article-thumbnail")
                        .attr("loading", "lazy"),
                )
                .child(
                    Element::new("div")
                        .class("article-text")
                        .child(
                            Element::new("h2").class("article-title").child(
                                Element::new("a")
                                    .attr("href", self.href(entry, Some(article)))
                                    .text(article.title.as_str()),
                            ),
                        )
                        .child(
                            Element::new("p")
                                .class("article-snippet")
                                .text(article.snippet.as_str()),
                        )
                        .child(info),
                ),
        )
    }

    fn list(&self, cards: Vec<Element>, _loaded: &[(ManifestEntry, Article)]) -> Node {
        Element::new("div")
            .class("articles-container")
            .class("list-view")
            .children(cards)
            .into()
    }

    fn detail(&self, _entry: &ManifestEntry, article: &Article, _siblings: &Siblings) -> Node {
        Element::new("article")
            .class("article-content")
            .child(Element::new("h1").text(article.title.as_str()))
            .child(format_nodes(&article.body))
            .into()
    }

    fn href(&self, entry: &ManifestEntry, _article: Option<&Article>) -> String {
        format!("{}/{}/index.html", self.dir, entry.slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Action, Trigger};
    use crate::fetch::tests::MapSource;
    use crate::render::{Capture, ListRenderer, Location};
    use crate::store::MemoryStore;

    const MANIFEST: &str = r#"[
        {"slug": "first", "title": "First Post", "date": "2024-01-10", "tags": ["rust", "art"]},
        {"slug": "second", "date": "2024-03-02", "thumbnail": "Articles/second/cover.png"},
        {"slug": "broken", "title": "Broken", "date": "2023-05-05"}
    ]"#;

    fn source() -> MapSource {
        MapSource::new(&[
            ("Config/articles.json", MANIFEST),
            (
                "Articles/first/article.txt",
                "Ignored Title\n---\nIntro paragraph.\n\n# Section\n* one\n* two",
            ),
            ("Articles/second/article.txt", "Second Title---Short body."),
        ])
    }

    fn render(fetch: &CacheFetch<MapSource, MemoryStore>) -> Capture {
        let config = SiteConfig::default();
        let mut list = ListRenderer::new(Articles::new(fetch, &config), Location::new("/articles.html"));
        let mut surface = Capture::new();
        list.render_list(&mut surface, false);
        surface
    }

    #[test]
    fn test_cards_in_date_order_with_fallback() {
        let fetch = CacheFetch::new(source(), MemoryStore::new());
        let surface = render(&fetch);
        let node = surface.current.unwrap();

        let titles: Vec<String> = node
            .find_by_class("article-title")
            .iter()
            .map(|el| Node::Element((*el).clone()).text_content())
            .collect();
        assert_eq!(titles, vec!["Second Title", "First Post", "Broken"]);

        let snippets = node.find_by_class("article-snippet");
        assert_eq!(
            Node::Element(snippets[2].clone()).text_content(),
            "Error loading content"
        );
    }

    #[test]
    fn test_card_contents() {
        let fetch = CacheFetch::new(source(), MemoryStore::new());
        let html = render(&fetch).html();

        assert!(html.contains(r#"<span class="published">Published: January 10, 2024</span>"#));
        assert!(html.contains("Reading Time: 1 minutes"));
        assert!(html.contains(r#"<span class="tags">Tags: <span>rust</span><span>art</span></span>"#));
        assert!(html.contains(r#"src="Articles/second/cover.png""#));
        assert!(html.contains(r#"src="Resources/default-video-thumbnail.jpg""#));
        assert!(html.contains(r#"alt="First Post thumbnail""#));
        assert!(html.contains(r#"href="Articles/first/index.html""#));
        assert!(html.contains("<p class=\"article-snippet\">Intro paragraph.</p>"));
    }

    #[test]
    fn test_each_article_fetched_once() {
        let fetch = CacheFetch::new(source(), MemoryStore::new());
        render(&fetch);
        // manifest + three articles (the broken one is not cached)
        assert_eq!(fetch.source().request_count(), 4);
        render(&fetch);
        assert_eq!(fetch.source().request_count(), 5);
        assert!(fetch.store().get("article_first_v1").is_some());
        assert!(fetch.store().get("articles_manifest_v1").is_some());
    }

    #[test]
    fn test_detail_view() {
        let fetch = CacheFetch::new(source(), MemoryStore::new());
        let config = SiteConfig::default();
        let mut list = ListRenderer::new(Articles::new(&fetch, &config), Location::new("/articles.html"));
        let mut surface = Capture::new();
        list.open_location(&mut surface, &Location::parse("/articles.html?article=first"));

        let node = surface.current.clone().unwrap();
        let back = node.find_by_class("back-button");
        assert_eq!(Node::Element(back[0].clone()).text_content(), "Back to Articles");
        assert_eq!(back[0].action_for(&Trigger::Click), Some(&Action::Back));

        let html = surface.html();
        assert!(html.contains(
            "<article class=\"article-content\"><h1>First Post</h1><p>Intro paragraph.</p><h1>Section</h1><ul><li>one</li><li>two</li></ul></article>"
        ));
        assert_eq!(surface.scrolls, 1);
    }

    #[test]
    fn test_detail_failure() {
        let fetch = CacheFetch::new(source(), MemoryStore::new());
        let config = SiteConfig::default();
        let mut list = ListRenderer::new(Articles::new(&fetch, &config), Location::new("/articles.html"));
        let mut surface = Capture::new();
        list.render_detail(&mut surface, "broken");
        assert_eq!(surface.html(), "<p>Failed to load article.</p>");
    }

    #[test]
    fn test_manifest_failure() {
        let fetch = CacheFetch::new(MapSource::new(&[]), MemoryStore::new());
        assert_eq!(render(&fetch).html(), "<p>Failed to load articles.</p>");
    }

    #[test]
    fn test_empty_manifest() {
        let fetch = CacheFetch::new(
            MapSource::new(&[("Config/articles.json", "[]")]),
            MemoryStore::new(),
        );
        assert_eq!(render(&fetch).html(), "<p>No articles found.</p>");
    }
}
