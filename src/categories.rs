//! The fixed set of feed categories the site serves.
//!
//! A [`CategoryRegistry`] is built once at startup, validated, wrapped in an
//! `Arc` and shared read-only by the router and the renderer. It is never
//! mutated afterwards.

use crate::error::{LiteError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, instrument};

/// Path of the front page category.
pub const ROOT_PATH: &str = "/";

const STORY_PREFIX: &str = "/story/";

/// One category: a publisher feed id served at a local path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    /// Publisher's numeric feed identifier, e.g. `"1014"`.
    pub feed_id: String,
    /// Label shown in the navigation bar and page heading.
    pub label: String,
    /// Local path, e.g. `"/politics"`.
    pub path: String,
}

impl Category {
    pub fn new(feed_id: &str, label: &str, path: &str) -> Self {
        Self {
            feed_id: feed_id.to_string(),
            label: label.to_string(),
            path: path.to_string(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.path == ROOT_PATH
    }
}

#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    /// Validate and build a registry. Paths must be unique and exactly one
    /// category must live at [`ROOT_PATH`].
    pub fn new(categories: Vec<Category>) -> Result<Self> {
        if categories.is_empty() {
            return Err(LiteError::Config("category list is empty".to_string()));
        }

        let mut seen = HashSet::new();
        for category in &categories {
            if !category.path.starts_with('/') {
                return Err(LiteError::Config(format!(
                    "category {:?} has path {:?}; paths must start with '/'",
                    category.label, category.path
                )));
            }
            let reserved = category.path.starts_with(STORY_PREFIX) || category.path == STORY_PREFIX.trim_end_matches('/');
            if reserved || category.path.contains(['{', '}', '*']) {
                return Err(LiteError::Config(format!(
                    "category path {:?} is reserved or not a literal path",
                    category.path
                )));
            }
            if category.feed_id.is_empty() || !category.feed_id.bytes().all(|b| b.is_ascii_digit()) {
                return Err(LiteError::Config(format!(
                    "category {:?} has non-numeric feed id {:?}",
                    category.label, category.feed_id
                )));
            }
            if !seen.insert(category.path.as_str()) {
                return Err(LiteError::Config(format!(
                    "duplicate category path {:?}",
                    category.path
                )));
            }
        }

        let roots = categories.iter().filter(|c| c.is_root()).count();
        if roots != 1 {
            return Err(LiteError::Config(format!(
                "expected exactly one category at {ROOT_PATH:?}, found {roots}"
            )));
        }

        Ok(Self { categories })
    }

    /// Load a registry from a YAML list of `{ feed_id, label, path }` entries.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let registry = Self::from_yaml_str(&raw)?;
        info!(count = registry.categories.len(), "Loaded category registry");
        Ok(registry)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let categories: Vec<Category> = serde_yaml::from_str(raw)
            .map_err(|e| LiteError::Config(format!("invalid category file: {e}")))?;
        Self::new(categories)
    }

    /// The category served at `path`, if any.
    pub fn find_by_path(&self, path: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.path == path)
    }

    /// All categories in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    /// Navigation order: the root category first, then the rest in registry order.
    pub fn navigation(&self) -> impl Iterator<Item = &Category> {
        let root = self.categories.iter().filter(|c| c.is_root());
        let rest = self.categories.iter().filter(|c| !c.is_root());
        root.chain(rest)
    }
}

impl Default for CategoryRegistry {
    /// NPR's topic feeds.
    fn default() -> Self {
        Self {
            categories: vec![
                Category::new("1001", "Headlines", "/"),
                Category::new("1014", "Politics", "/politics"),
                Category::new("1003", "National", "/national"),
                Category::new("1013", "Education", "/education"),
                Category::new("1006", "Business", "/business"),
                Category::new("1019", "Technology", "/technology"),
                Category::new("1007", "Science", "/science"),
                Category::new("1128", "Health", "/health"),
            ],
        }
    }
}
