//! About-page panels: productions, skills, software and the recommendations
//! feeding the carousel.

use super::message;
use crate::config::SiteConfig;
use crate::content::panels::{
    Production, Recommendation, parse_productions, parse_recommendations,
};
use crate::content::parse_list;
use crate::dom::{Element, Node};
use crate::fetch::{CacheFetch, CacheKey, Source};
use crate::log;
use crate::store::KvStore;

const NO_PRODUCTIONS: &str = "No productions available at this time.";
const PRODUCTIONS_FAILED: &str = "Unable to load productions. Please try again later.";

pub fn production_card(production: &Production) -> Element {
    let details = Element::new("div")
        .class("production-details")
        .child(Element::new("h2").text(production.title.as_str()))
        .child(
            Element::new("p")
                .class("production-company")
                .text(production.company.as_str()),
        )
        .child(
            Element::new("p")
                .class("production-time")
                .text(production.time.as_str()),
        );

    Element::new("div")
        .class("production-subpanel")
        .child(
            Element::new("img")
                .attr("src", production.thumbnail.as_str())
                .attr("alt", format!("{} thumbnail", production.title))
                .attr("loading", "lazy"),
        )
        .child(
            Element::new("div")
                .class("production-content")
                .child(details)
                .child(
                    Element::new("div")
                        .class("production-description")
                        .child(Element::new("p").text(production.description.as_str())),
                ),
        )
}

/// Production cards, or a message when there are none.
pub fn productions<S: Source, K: KvStore>(fetch: &CacheFetch<S, K>, config: &SiteConfig) -> Node {
    let key = CacheKey::new("config", "productions", &config.cache.version);
    let container = Element::new("div").class("productions-subpanels");

    let raw = match fetch.fetch_text(&config.content.productions, &key) {
        Ok(raw) if !raw.trim().is_empty() => raw,
        Ok(_) => {
            log!("error"; "productions file is empty");
            return container.child(message(PRODUCTIONS_FAILED)).into();
        }
        Err(err) => {
            log!("error"; "cannot load productions: {err}");
            return container.child(message(PRODUCTIONS_FAILED)).into();
        }
    };

    let cards = parse_productions(&raw);
    if cards.is_empty() {
        return container.child(message(NO_PRODUCTIONS)).into();
    }
    container.children(cards.iter().map(production_card)).into()
}

/// `span.software-tag` per item.
pub fn tag_cloud(items: &[String]) -> Element {
    Element::new("div")
        .class("software-tag-container")
        .children(
            items
                .iter()
                .map(|item| Element::new("span").class("software-tag").text(item.as_str())),
        )
}

/// Panel `#<id>` with the tags listed at `url`. A failed load leaves the
/// cloud empty.
pub fn tag_panel<S: Source, K: KvStore>(
    fetch: &CacheFetch<S, K>,
    config: &SiteConfig,
    id: &str,
    url: &str,
) -> Element {
    let key = CacheKey::new("config", id, &config.cache.version);
    let items = match fetch.fetch_text(url, &key) {
        Ok(raw) => parse_list(&raw),
        Err(err) => {
            log!("error"; "cannot load {url}: {err}");
            Vec::new()
        }
    };
    Element::new("div")
        .attr("id", format!("{id}-panel"))
        .child(tag_cloud(&items))
}

pub fn skills<S: Source, K: KvStore>(fetch: &CacheFetch<S, K>, config: &SiteConfig) -> Element {
    tag_panel(fetch, config, "skills", &config.content.skills)
}

pub fn software<S: Source, K: KvStore>(fetch: &CacheFetch<S, K>, config: &SiteConfig) -> Element {
    tag_panel(fetch, config, "software", &config.content.software)
}

/// Recommendations for the carousel. A failed load gives none.
pub fn recommendations<S: Source, K: KvStore>(
    fetch: &CacheFetch<S, K>,
    config: &SiteConfig,
) -> Vec<Recommendation> {
    let key = CacheKey::new("config", "recommendations", &config.cache.version);
    match fetch.fetch_text(&config.content.recommendations, &key) {
        Ok(raw) => parse_recommendations(&raw),
        Err(err) => {
            log!("error"; "cannot load recommendations: {err}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::tests::MapSource;
    use crate::store::MemoryStore;

    const PRODUCTIONS: &str = "\
Skyline
Northwind Games
2021 - 2023
Resources/skyline.jpg
Environment art for an open world.
---
Broken entry
only two lines
---
Harbor
Tidal Studio
2019
Resources/harbor.png
Props and vehicles.";

    fn fetch(files: &[(&str, &str)]) -> CacheFetch<MapSource, MemoryStore> {
        CacheFetch::new(MapSource::new(files), MemoryStore::new())
    }

    #[test]
    fn test_production_cards_skip_malformed() {
        let fetch = fetch(&[("Config/productions.txt", PRODUCTIONS)]);
        let node = productions(&fetch, &SiteConfig::default());
        assert_eq!(node.find_by_class("production-subpanel").len(), 2);

        let html = node.to_html();
        assert!(html.contains(
            r#"<img src="Resources/skyline.jpg" alt="Skyline thumbnail" loading="lazy">"#
        ));
        assert!(html.contains(r#"<p class="production-company">Northwind Games</p>"#));
        assert!(html.contains(r#"<p class="production-time">2021 - 2023</p>"#));
        assert!(html.contains(
            r#"<div class="production-description"><p>Props and vehicles.</p></div>"#
        ));
    }

    #[test]
    fn test_production_messages() {
        let config = SiteConfig::default();
        let none = fetch(&[("Config/productions.txt", "just\none\nblock")]);
        assert!(productions(&none, &config).to_html().contains(NO_PRODUCTIONS));

        let empty = fetch(&[("Config/productions.txt", "  \n")]);
        assert!(productions(&empty, &config).to_html().contains(PRODUCTIONS_FAILED));

        let missing = fetch(&[]);
        assert!(productions(&missing, &config).to_html().contains(PRODUCTIONS_FAILED));
    }

    #[test]
    fn test_tag_panels() {
        let fetch = fetch(&[
            ("Config/skills.txt", "Hard surface\n\n  Sculpting  \n"),
            ("Config/software.txt", "Blender\nHoudini"),
        ]);
        let config = SiteConfig::default();
        let html = Node::from(skills(&fetch, &config)).to_html();
        assert_eq!(
            html,
            r#"<div id="skills-panel"><div class="software-tag-container"><span class="software-tag">Hard surface</span><span class="software-tag">Sculpting</span></div></div>"#
        );
        let software = Node::from(software(&fetch, &config));
        assert_eq!(software.find_by_class("software-tag").len(), 2);
    }

    #[test]
    fn test_tag_panel_failure_is_empty() {
        let fetch = fetch(&[]);
        let node = Node::from(skills(&fetch, &SiteConfig::default()));
        assert!(node.find_by_class("software-tag").is_empty());
        assert_eq!(node.find_by_class("software-tag-container").len(), 1);
    }

    #[test]
    fn test_recommendations() {
        let site = fetch(&[(
            "Config/recommendations.txt",
            "Ada\nhttps://example.com/ada.png\nLead Artist\n2023\nA joy to work with.\n---\nBob\nProducer",
        )]);
        let recs = recommendations(&site, &SiteConfig::default());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].avatar.as_deref(), Some("https://example.com/ada.png"));

        assert!(recommendations(&fetch(&[]), &SiteConfig::default()).is_empty());
    }
}
