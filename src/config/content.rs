//! `[content]` section configuration.
//!
//! Every path is relative to the content source: the site directory, or
//! `[fetch].base_url` when content is served remotely.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[content]` section in folio.toml - where descriptors live and how they
/// are presented.
///
/// # Example
/// ```toml
/// [content]
/// articles_manifest = "Config/articles.json"
/// projects_manifest = "Config/projects.txt"
/// snippet_length = 150
/// description_truncate = 420
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ContentSection {
    /// Article manifest (JSON or plain slug list).
    #[serde(default = "defaults::content::articles_manifest")]
    #[educe(Default = defaults::content::articles_manifest())]
    pub articles_manifest: String,

    /// Folder of `<slug>/article.txt` files.
    #[serde(default = "defaults::content::articles_dir")]
    #[educe(Default = defaults::content::articles_dir())]
    pub articles_dir: String,

    /// Project manifest (plain folder list or JSON).
    #[serde(default = "defaults::content::projects_manifest")]
    #[educe(Default = defaults::content::projects_manifest())]
    pub projects_manifest: String,

    /// Folder of `<folder>/` project directories.
    #[serde(default = "defaults::content::projects_dir")]
    #[educe(Default = defaults::content::projects_dir())]
    pub projects_dir: String,

    /// Descriptor file inside each project folder. A `.json` name switches to
    /// the JSON form carrying its own media list.
    #[serde(default = "defaults::content::project_descriptor")]
    #[educe(Default = defaults::content::project_descriptor())]
    pub project_descriptor: String,

    #[serde(default = "defaults::content::project_media")]
    #[educe(Default = defaults::content::project_media())]
    pub project_media: String,

    #[serde(default = "defaults::content::project_stats")]
    #[educe(Default = defaults::content::project_stats())]
    pub project_stats: String,

    #[serde(default = "defaults::content::recommendations")]
    #[educe(Default = defaults::content::recommendations())]
    pub recommendations: String,

    #[serde(default = "defaults::content::productions")]
    #[educe(Default = defaults::content::productions())]
    pub productions: String,

    #[serde(default = "defaults::content::skills")]
    #[educe(Default = defaults::content::skills())]
    pub skills: String,

    #[serde(default = "defaults::content::software")]
    #[educe(Default = defaults::content::software())]
    pub software: String,

    /// Characters of the first paragraph shown on an article card.
    #[serde(default = "defaults::content::snippet_length")]
    #[educe(Default = defaults::content::snippet_length())]
    pub snippet_length: usize,

    /// Reading speed for the reading time estimate.
    #[serde(default = "defaults::content::words_per_minute")]
    #[educe(Default = defaults::content::words_per_minute())]
    pub words_per_minute: usize,

    /// Characters of a project description shown before "Read More".
    #[serde(default = "defaults::content::description_truncate")]
    #[educe(Default = defaults::content::description_truncate())]
    pub description_truncate: usize,

    /// Card image for articles without a thumbnail.
    #[serde(default = "defaults::content::default_thumbnail")]
    #[educe(Default = defaults::content::default_thumbnail())]
    pub default_thumbnail: String,

    /// Gallery banner when no project marks one.
    #[serde(default = "defaults::content::default_banner")]
    #[educe(Default = defaults::content::default_banner())]
    pub default_banner: String,
}

impl ContentSection {
    /// `Articles/<slug>/article.txt`
    pub fn article_url(&self, slug: &str) -> String {
        format!("{}/{slug}/article.txt", self.articles_dir)
    }

    /// `Projects/<folder>`
    pub fn project_base(&self, folder: &str) -> String {
        format!("{}/{folder}", self.projects_dir)
    }

    /// `Projects/<folder>/<file>`
    pub fn project_file(&self, folder: &str, file: &str) -> String {
        format!("{}/{file}", self.project_base(folder))
    }
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use super::*;

    #[test]
    fn test_content_section_defaults() {
        let content = ContentSection::default();
        assert_eq!(content.articles_manifest, "Config/articles.json");
        assert_eq!(content.snippet_length, 150);
        assert_eq!(content.words_per_minute, 200);
        assert_eq!(content.description_truncate, 420);
        assert_eq!(content.default_banner, "default-banner.jpg");
    }

    #[test]
    fn test_content_paths() {
        let content = ContentSection::default();
        assert_eq!(content.article_url("hello"), "Articles/hello/article.txt");
        assert_eq!(
            content.project_file("robot", "media.txt"),
            "Projects/robot/media.txt"
        );
    }

    #[test]
    fn test_content_section_override() {
        let config: SiteConfig = toml::from_str(
            r#"
            [content]
            articles_dir = "Posts"
            snippet_length = 80
        "#,
        )
        .unwrap();
        assert_eq!(config.content.article_url("a"), "Posts/a/article.txt");
        assert_eq!(config.content.snippet_length, 80);
        assert_eq!(config.content.projects_dir, "Projects");
    }
}
