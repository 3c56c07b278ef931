//! Site configuration management for `folio.toml`.
//!
//! # Sections
//!
//! | Section      | Purpose                                          |
//! |--------------|--------------------------------------------------|
//! | `[site]`     | Page title, language, stylesheets                |
//! | `[build]`    | Output directory, minification, clean builds     |
//! | `[content]`  | Descriptor locations and presentation knobs      |
//! | `[cache]`    | Persistent fetch cache and its key version       |
//! | `[fetch]`    | Remote content root, retry policy                |
//! | `[carousel]` | Recommendation carousel timing                   |
//! | `[serve]`    | Development server (interface, port)             |
//!
//! # Example
//!
//! ```toml
//! [site]
//! title = "Jane Doe - 3D Artist"
//!
//! [build]
//! output = "public"
//! minify = true
//!
//! [content]
//! snippet_length = 150
//!
//! [cache]
//! version = "v2"
//! ```

mod build;
mod cache;
mod content;
pub mod defaults;
mod error;
mod handle;
mod serve;
mod site;

pub use build::BuildSection;
pub use cache::{CacheSection, CarouselSection, FetchSection};
pub use content::ContentSection;
pub use error::ConfigError;
pub use handle::{cfg, init_config};
pub use serve::ServeSection;
pub use site::SiteSection;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing folio.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub site: SiteSection,

    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub content: ContentSection,

    #[serde(default)]
    pub cache: CacheSection,

    #[serde(default)]
    pub fetch: FetchSection,

    #[serde(default)]
    pub carousel: CarouselSection,

    #[serde(default)]
    pub serve: ServeSection,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load `folio.toml` (defaults when absent), apply CLI overrides, validate.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            crate::log!("config"; "{} not found, using defaults", config_path.display());
            Self::default()
        };
        config.update_with_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Absolute cache directory.
    pub fn cache_dir(&self) -> PathBuf {
        self.get_root().join(&self.cache.dir)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli
            .root
            .clone()
            .unwrap_or_else(|| self.get_root().to_owned());
        Self::update_option(&mut self.build.output, cli.output.as_ref());

        let root = Self::normalize_path(&root);
        self.config_path = Self::normalize_path(&root.join(&cli.config));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));
        self.set_root(&root);

        if let Some(args) = cli.build_args() {
            Self::update_option(&mut self.build.minify, args.minify.as_ref());
            self.build.clean |= args.clean;
            if args.no_cache {
                self.cache.enable = false;
            }
        }

        if let Commands::Serve {
            interface, port, ..
        } = &cli.command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.fetch.base_url
            && !base_url.starts_with("http")
        {
            bail!(ConfigError::invalid(
                "[fetch.base_url]",
                "must start with http:// or https://"
            ));
        }
        if self.cache.version.trim().is_empty() {
            bail!(ConfigError::invalid("[cache.version]", "must not be empty"));
        }
        if self.content.words_per_minute == 0 {
            bail!(ConfigError::invalid(
                "[content.words_per_minute]",
                "must be positive"
            ));
        }
        if self.fetch.retries == 0 {
            bail!(ConfigError::invalid("[fetch.retries]", "must be at least 1"));
        }
        if self.build.root.as_deref().is_some_and(|root| !root.is_dir()) {
            bail!(ConfigError::invalid("[build.root]", "is not a directory"));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
