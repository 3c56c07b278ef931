//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [site] Section Defaults
// ============================================================================

pub mod site {
    pub fn title() -> String {
        "Portfolio".into()
    }

    pub fn language() -> String {
        "en".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn output() -> PathBuf {
        "public".into()
    }
}

// ============================================================================
// [content] Section Defaults
// ============================================================================

pub mod content {
    pub fn articles_manifest() -> String {
        "Config/articles.json".into()
    }

    pub fn articles_dir() -> String {
        "Articles".into()
    }

    pub fn projects_manifest() -> String {
        "Config/projects.txt".into()
    }

    pub fn projects_dir() -> String {
        "Projects".into()
    }

    pub fn project_descriptor() -> String {
        "description.txt".into()
    }

    pub fn project_media() -> String {
        "media.txt".into()
    }

    pub fn project_stats() -> String {
        "stats.txt".into()
    }

    pub fn recommendations() -> String {
        "Config/recommendations.txt".into()
    }

    pub fn productions() -> String {
        "Config/productions.txt".into()
    }

    pub fn skills() -> String {
        "Config/skills.txt".into()
    }

    pub fn software() -> String {
        "Config/software.txt".into()
    }

    pub fn snippet_length() -> usize {
        150
    }

    pub fn words_per_minute() -> usize {
        200
    }

    pub fn description_truncate() -> usize {
        420
    }

    pub fn default_thumbnail() -> String {
        "Resources/default-video-thumbnail.jpg".into()
    }

    pub fn default_banner() -> String {
        "default-banner.jpg".into()
    }
}

// ============================================================================
// [cache] / [fetch] Section Defaults
// ============================================================================

pub mod cache {
    use std::path::PathBuf;

    pub fn dir() -> PathBuf {
        ".folio-cache".into()
    }

    pub fn version() -> String {
        "v1".into()
    }
}

pub mod fetch {
    pub fn base_url() -> Option<String> {
        None
    }

    pub fn retries() -> u32 {
        3
    }

    pub fn backoff_ms() -> u64 {
        500
    }

    pub fn timeout_secs() -> u64 {
        10
    }
}

// ============================================================================
// [carousel] Section Defaults
// ============================================================================

pub mod carousel {
    pub fn autoplay_ms() -> u64 {
        5000
    }

    pub fn watchdog_ms() -> u64 {
        600
    }

    pub fn swipe_threshold() -> f32 {
        50.0
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        5277
    }
}
