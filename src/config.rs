//! Site configuration module.
//!
//! Handles loading and validating `config.toml`. Every key has a stock default
//! except the collection list itself, which must name at least one collection.
//!
//! ## Configuration Options
//!
//! ```toml
//! # Which browse link to use for each collection: "file" or "http"
//! deployment_mode = "file"
//!
//! [site]
//! title = "My Collections"
//! subtitle = "Everything I read, hear, watch and eat"   # optional
//! output_dir = "site"          # index.html is written here
//! show_recent_items = true
//! recent_items_count = 5
//!
//! [[collections]]
//! name = "Books"               # unique, used as the stats key
//! kind = "books"               # books | albums | shows | restaurants
//! db_path = "books/books.db"
//! emoji = "📚"
//! accent_color = "#8b5cf6"
//! site_path_file = "books/site/index.html"
//! site_path_http = "/books/"
//! ```
//!
//! Relative `db_path` and `output_dir` values are resolved against the
//! directory containing the config file, so the generator behaves the same
//! regardless of the working directory it is started from.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Recent items shown per collection unless configured otherwise.
pub const DEFAULT_RECENT_ITEMS: usize = 5;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Selects which of the two link paths each collection card points at.
    pub deployment_mode: DeploymentMode,
    /// Global page settings.
    pub site: SiteSettings,
    /// Tracked collections, in display (and fingerprint) order.
    pub collections: Vec<CollectionConfig>,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collections.is_empty() {
            return Err(ConfigError::Validation(
                "at least one [[collections]] entry is required".into(),
            ));
        }
        if self.site.recent_items_count == 0 {
            return Err(ConfigError::Validation(
                "site.recent_items_count must be at least 1".into(),
            ));
        }
        if self.site.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "site.output_dir must not be empty".into(),
            ));
        }
        let mut seen = HashSet::new();
        for collection in &self.collections {
            if collection.name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "collection names must not be empty".into(),
                ));
            }
            if !seen.insert(collection.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate collection name '{}'",
                    collection.name
                )));
            }
        }
        Ok(())
    }

    /// Resolve relative paths against `base` (the config file's directory).
    fn resolve_paths(&mut self, base: &Path) {
        if self.site.output_dir.is_relative() {
            self.site.output_dir = base.join(&self.site.output_dir);
        }
        for collection in &mut self.collections {
            if collection.db_path.is_relative() {
                collection.db_path = base.join(&collection.db_path);
            }
        }
    }
}

/// How the generated dashboard is served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    /// Opened straight from disk; links use `site_path_file`.
    #[default]
    File,
    /// Served over HTTP; links use `site_path_http`.
    Http,
}

/// Page-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSettings {
    pub title: String,
    pub subtitle: Option<String>,
    /// Directory receiving `index.html`. Created when missing.
    pub output_dir: PathBuf,
    pub show_recent_items: bool,
    /// Upper bound on recent items extracted and shown per collection.
    pub recent_items_count: usize,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: "My Collections".to_string(),
            subtitle: None,
            output_dir: PathBuf::from("site"),
            show_recent_items: true,
            recent_items_count: DEFAULT_RECENT_ITEMS,
        }
    }
}

/// The fixed set of supported collection kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Books,
    Albums,
    Shows,
    Restaurants,
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CollectionKind::Books => "books",
            CollectionKind::Albums => "albums",
            CollectionKind::Shows => "shows",
            CollectionKind::Restaurants => "restaurants",
        };
        f.write_str(s)
    }
}

/// One tracked collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionConfig {
    pub name: String,
    pub kind: CollectionKind,
    /// SQLite database holding the collection.
    pub db_path: PathBuf,
    #[serde(default = "default_emoji")]
    pub emoji: String,
    /// CSS color used for the card's accent.
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
    /// Browse link when the dashboard is opened from disk.
    pub site_path_file: String,
    /// Browse link when the dashboard is served over HTTP.
    pub site_path_http: String,
}

fn default_emoji() -> String {
    "📁".to_string()
}

fn default_accent_color() -> String {
    "#6366f1".to_string()
}

impl CollectionConfig {
    /// The browse link for the given deployment mode.
    pub fn link_path(&self, mode: DeploymentMode) -> &str {
        match mode {
            DeploymentMode::File => &self.site_path_file,
            DeploymentMode::Http => &self.site_path_http,
        }
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Parse and validate config from a TOML string. Paths are left as written.
pub fn parse_config(content: &str) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given `config.toml` path.
///
/// A missing file is an error: without collections there is nothing to
/// generate. Relative paths inside the file are resolved against its parent
/// directory.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let mut config = parse_config(&content)?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    config.resolve_paths(base);
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Collection Hub Configuration
# ============================
# Values shown for [site] are the defaults. The [[collections]] entries are
# examples: keep the ones you track, remove the rest.
#
# Relative paths are resolved against the directory of this file.
# Unknown keys will cause an error.

# Which browse link each collection card uses:
#   "file" -> site_path_file (dashboard opened from disk)
#   "http" -> site_path_http (dashboard served by a web server)
deployment_mode = "file"

# ---------------------------------------------------------------------------
# Page settings
# ---------------------------------------------------------------------------
[site]
title = "My Collections"

# Optional line shown under the title.
# subtitle = "Everything I read, hear, watch and eat"

# Directory receiving index.html (created if missing).
output_dir = "site"

# Show the most recently added items on each collection card.
show_recent_items = true

# How many recent items to show per collection.
recent_items_count = 5

# ---------------------------------------------------------------------------
# Collections, in display order
# ---------------------------------------------------------------------------
# kind is one of: books, albums, shows, restaurants

[[collections]]
name = "Books"
kind = "books"
db_path = "books/books.db"
emoji = "📚"
accent_color = "#8b5cf6"
site_path_file = "books/site/index.html"
site_path_http = "/books/"

[[collections]]
name = "Albums"
kind = "albums"
db_path = "albums/albums.db"
emoji = "💿"
accent_color = "#ec4899"
site_path_file = "albums/site/index.html"
site_path_http = "/albums/"

[[collections]]
name = "Broadway Shows"
kind = "shows"
db_path = "shows/shows.db"
emoji = "🎭"
accent_color = "#f59e0b"
site_path_file = "shows/site/index.html"
site_path_http = "/shows/"

[[collections]]
name = "Restaurants"
kind = "restaurants"
db_path = "restaurants/restaurants.db"
emoji = "🍽️"
accent_color = "#10b981"
site_path_file = "restaurants/site/index.html"
site_path_http = "/restaurants/"
"##
}
