//! Site configuration.
//!
//! Configuration is a TOML file with four sections. Every key is optional and
//! falls back to the built-in default.
//!
//! ```toml
//! [site]
//! title = "XyPriss"
//! description = "Fast and secure web framework"
//! base_url = "https://xypriss.dev"
//! docs_prefix = "/docs"
//!
//! [content]
//! root = "docs"
//! cache_ttl_secs = 0
//! allow_raw_html = false
//!
//! [search]
//! title_weight = 0.7
//! content_weight = 0.3
//! snippet_padding = 60
//! fallback_snippet_len = 150
//! max_score = 0.95
//! limit = 20
//!
//! [server]
//! bind = "127.0.0.1:3000"
//! ```
//!
//! ## Lookup order
//!
//! 1. An explicit path (`--config` / `XYDOCS_CONFIG`)
//! 2. `global.toml` in the platform config directory
//! 3. Built-in defaults
//!
//! `XYDOCS_DOCS_DIR`, `XYDOCS_BIND` and `XYDOCS_BASE_URL` override the file.
//!
//! ```rust
//! use xydocs_core::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.site.docs_prefix, "/docs");
//! assert!(config.validate().is_ok());
//! ```

use crate::render::{DEFAULT_DOCS_PREFIX, RenderOptions};
use crate::search::SearchConfig;
use crate::sitemap::parse_base_url;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "XYDOCS_CONFIG";
/// Environment variable overriding `content.root`.
pub const DOCS_DIR_ENV: &str = "XYDOCS_DOCS_DIR";
/// Environment variable overriding `server.bind`.
pub const BIND_ENV: &str = "XYDOCS_BIND";
/// Environment variable overriding `site.base_url`.
pub const BASE_URL_ENV: &str = "XYDOCS_BASE_URL";

/// Full configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site identity and URLs.
    pub site: SiteConfig,
    /// Where documents come from and how they are treated.
    pub content: ContentConfig,
    /// Search tuning.
    pub search: SearchConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
}

/// `[site]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site name, also the title of an untitled root document.
    pub title: String,
    /// Default meta description.
    pub description: String,
    /// Public origin used for absolute URLs in the sitemap.
    pub base_url: String,
    /// Route prefix of documentation pages.
    pub docs_prefix: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "XyPriss".to_string(),
            description: "Documentation for the XyPriss web framework".to_string(),
            base_url: "http://localhost:3000".to_string(),
            docs_prefix: DEFAULT_DOCS_PREFIX.to_string(),
        }
    }
}

/// `[content]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Documentation root directory.
    pub root: PathBuf,
    /// Seconds a loaded document list stays fresh. `0` reads the disk every time.
    pub cache_ttl_secs: u64,
    /// Emit raw HTML from documents instead of escaping it.
    pub allow_raw_html: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("docs"),
            cache_ttl_secs: 0,
            allow_raw_html: false,
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

impl Config {
    /// Load configuration, apply environment overrides and validate.
    ///
    /// `explicit` wins over the platform config file. A missing file yields
    /// defaults; an unreadable or malformed one is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => {
                if !path.exists() {
                    warn!("Config file {} not found, using defaults", path.display());
                }
                Self::load_from(path)?
            },
            None => match Self::config_path() {
                Some(path) => Self::load_from(&path)?,
                None => Self::default(),
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse the file at `path`, or return defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        debug!("Loading config from {}", path.display());
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Apply `XYDOCS_*` overrides from `lookup`. Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(root) = value(DOCS_DIR_ENV) {
            self.content.root = PathBuf::from(root);
        }
        if let Some(bind) = value(BIND_ENV) {
            self.server.bind = bind;
        }
        if let Some(base_url) = value(BASE_URL_ENV) {
            self.site.base_url = base_url;
        }
    }

    /// Reject values that would make search or URLs misbehave.
    pub fn validate(&self) -> Result<()> {
        let tw = self.search.title_weight;
        let cw = self.search.content_weight;
        if !tw.is_finite() || !cw.is_finite() || tw < 0.0 || cw < 0.0 {
            return Err(Error::Config(format!(
                "Search weights must be finite and non-negative (title_weight = {tw}, content_weight = {cw})"
            )));
        }
        if tw + cw <= 0.0 {
            return Err(Error::Config(
                "title_weight and content_weight cannot both be zero".into(),
            ));
        }
        if !self.search.max_score.is_finite() {
            return Err(Error::Config("max_score must be a finite number".into()));
        }
        if self.site.docs_prefix.trim_matches('/').is_empty() {
            return Err(Error::Config(
                "site.docs_prefix must name a path segment such as \"/docs\"".into(),
            ));
        }
        if self.server.bind.trim().is_empty() {
            return Err(Error::Config("server.bind cannot be empty".into()));
        }
        parse_base_url(&self.site.base_url)?;
        Ok(())
    }

    /// How long a loaded document list stays fresh.
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.content.cache_ttl_secs)
    }

    /// Renderer settings derived from this configuration.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            docs_prefix: self.site.docs_prefix.clone(),
            allow_raw_html: self.content.allow_raw_html,
        }
    }

    /// Platform location of `global.toml`, if the platform has one.
    ///
    /// - Linux: `~/.config/xydocs/global.toml`
    /// - macOS: `~/Library/Application Support/dev.xypriss.xydocs/global.toml`
    /// - Windows: `%APPDATA%\xypriss\xydocs\config\global.toml`
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "xypriss", "xydocs")
            .map(|dirs| dirs.config_dir().join("global.toml"))
    }
}
