//! Layout selection by path glob.
//!
//! # Responsibilities
//! - Hold the named layout → glob list configuration in file order
//! - Find the layout wrapping a given request path
//!
//! # Design Decisions
//! - Several layouts matching one path is a configuration ambiguity, not an
//!   error: a warning names all of them and the first declared one is used
//! - Globs that fail to compile are logged and dropped from their layout

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::routing::pattern::GlobPattern;

/// A named layout and the globs of the paths it wraps.
#[derive(Debug, Clone)]
pub struct Layout {
    name: String,
    patterns: Vec<GlobPattern>,
}

impl Layout {
    pub fn new(name: impl Into<String>, patterns: &[String]) -> Self {
        let name = name.into();
        let patterns = patterns
            .iter()
            .filter_map(|p| match GlobPattern::compile(p) {
                Ok(glob) => Some(glob),
                Err(e) => {
                    tracing::error!(layout = %name, pattern = %p, error = %e, "Ignoring invalid layout pattern");
                    None
                }
            })
            .collect();
        Self { name, patterns }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }
}

/// Layout configuration, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct LayoutConfig {
    layouts: Vec<Layout>,
}

impl LayoutConfig {
    pub fn new(layouts: Vec<Layout>) -> Self {
        Self { layouts }
    }

    /// Parse a JSON object of `name → [glob, ...]`, keeping key order.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let object: serde_json::Map<String, Value> = serde_json::from_str(content)?;
        let mut layouts = Vec::with_capacity(object.len());
        for (name, value) in object {
            let patterns: Vec<String> = serde_json::from_value(value)?;
            layouts.push(Layout::new(name, &patterns));
        }
        Ok(Self { layouts })
    }

    /// Load the layout index file; absent or unreadable files yield an empty configuration.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Layout configuration not found");
            return Self::default();
        }
        let parsed = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|content| Self::from_json(&content).map_err(|e| e.to_string()));
        match parsed {
            Ok(config) => {
                tracing::info!(path = %path.display(), layouts = config.len(), "Loaded layout configuration");
                config
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to load layout configuration");
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Layout> {
        self.layouts.iter().find(|l| l.name == name)
    }

    /// Name of the first layout matching `path`.
    pub fn find_by_path(&self, path: &str) -> Option<&str> {
        let matches: Vec<&str> = self
            .layouts
            .iter()
            .filter(|l| l.matches(path))
            .map(Layout::name)
            .collect();

        if matches.len() > 1 {
            tracing::warn!(
                path = %path,
                layouts = ?matches,
                selected = %matches[0],
                "Multiple layouts matched path, using first match"
            );
        }
        matches.first().copied()
    }
}
