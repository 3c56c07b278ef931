//! `[cache]`, `[fetch]` and `[carousel]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// `[cache]` section in folio.toml - persistent fetch cache.
///
/// # Example
/// ```toml
/// [cache]
/// enable = true
/// dir = ".folio-cache"
/// version = "v2"   # bump to invalidate every entry
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct CacheSection {
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub enable: bool,

    /// Entry directory, relative to the site root.
    #[serde(default = "defaults::cache::dir")]
    #[educe(Default = defaults::cache::dir())]
    pub dir: PathBuf,

    /// Suffix of every cache key.
    #[serde(default = "defaults::cache::version")]
    #[educe(Default = defaults::cache::version())]
    pub version: String,
}

/// `[fetch]` section in folio.toml - where content comes from.
///
/// # Example
/// ```toml
/// [fetch]
/// base_url = "https://cdn.example.com/site"
/// retries = 3
/// backoff_ms = 500
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct FetchSection {
    /// Remote content root. Content is read from the site directory when unset.
    #[serde(default = "defaults::fetch::base_url")]
    #[educe(Default = defaults::fetch::base_url())]
    pub base_url: Option<String>,

    /// Attempts of the retrying fetch.
    #[serde(default = "defaults::fetch::retries")]
    #[educe(Default = defaults::fetch::retries())]
    pub retries: u32,

    /// Base delay of the linear backoff.
    #[serde(default = "defaults::fetch::backoff_ms")]
    #[educe(Default = defaults::fetch::backoff_ms())]
    pub backoff_ms: u64,

    /// Per-request timeout for remote content.
    #[serde(default = "defaults::fetch::timeout_secs")]
    #[educe(Default = defaults::fetch::timeout_secs())]
    pub timeout_secs: u64,
}

impl FetchSection {
    pub const fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `[carousel]` section in folio.toml - recommendation carousel timing.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct CarouselSection {
    /// Delay between automatic advances.
    #[serde(default = "defaults::carousel::autoplay_ms")]
    #[educe(Default = defaults::carousel::autoplay_ms())]
    pub autoplay_ms: u64,

    /// Upper bound of one slide transition.
    #[serde(default = "defaults::carousel::watchdog_ms")]
    #[educe(Default = defaults::carousel::watchdog_ms())]
    pub watchdog_ms: u64,

    /// Horizontal drag distance, in pixels, that counts as a swipe.
    #[serde(default = "defaults::carousel::swipe_threshold")]
    #[educe(Default = defaults::carousel::swipe_threshold())]
    pub swipe_threshold: f32,
}

impl CarouselSection {
    pub const fn autoplay(&self) -> Duration {
        Duration::from_millis(self.autoplay_ms)
    }

    pub const fn watchdog(&self) -> Duration {
        Duration::from_millis(self.watchdog_ms)
    }
}
