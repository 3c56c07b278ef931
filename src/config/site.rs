//! `[site]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[site]` section in folio.toml - page metadata.
///
/// # Example
/// ```toml
/// [site]
/// title = "Jane Doe - 3D Artist"
/// stylesheets = ["style.css"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteSection {
    /// Title of every generated page.
    #[serde(default = "defaults::site::title")]
    #[educe(Default = defaults::site::title())]
    pub title: String,

    /// `lang` attribute of the generated pages.
    #[serde(default = "defaults::site::language")]
    #[educe(Default = defaults::site::language())]
    pub language: String,

    /// Stylesheets linked from every page, relative to the site root.
    #[serde(default)]
    pub stylesheets: Vec<String>,
}
