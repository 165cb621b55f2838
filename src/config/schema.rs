//! Configuration schema definitions.
//!
//! Two documents are modelled here:
//! - [`ServerConfig`]: how the preview server itself runs (TOML, optional).
//! - [`SiteConfig`]: where a project keeps its templates and mock data,
//!   plus the URI mappings (`site.json` at the project root).

use serde::{Deserialize, Serialize};

/// Default query parameter used to pick a model variant.
pub const DEFAULT_MODEL_SELECTOR: &str = "__preview_model";

/// Root configuration for the preview server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Project watching for automatic reloads.
    pub watch: WatchConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8085").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8085".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time to produce a response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Project watcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Rebuild the site snapshot when project files change.
    pub enabled: bool,

    /// Poll interval for the polling watcher fallback, in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_ms: 2000,
        }
    }
}

/// Project configuration, read from `site.json`.
///
/// Every directory is relative to the project root. Unset values fall back
/// to the conventional Maven-style layout.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Starting page template name.
    pub index: Option<String>,

    /// Source root holding `templates/`.
    pub src: Option<String>,

    /// Root of the page templates.
    pub pages: Option<String>,

    /// Location of message bundles, handed to the renderer untouched.
    pub messages: Option<String>,

    /// Root of static assets (css, js, images).
    pub resources: Option<String>,

    /// Root of the mock data (`pages/` and `layouts/` live below it).
    pub test: Option<String>,

    /// URI mappings, tried in declaration order.
    pub mappings: Vec<Mapping>,

    /// Query parameter that selects a model variant.
    pub model_selector: Option<String>,
}

impl SiteConfig {
    pub fn src(&self) -> &str {
        self.src.as_deref().unwrap_or("src/main/resources")
    }

    pub fn templates(&self) -> String {
        format!("{}/templates", self.src())
    }

    pub fn pages(&self) -> String {
        match &self.pages {
            Some(pages) => pages.clone(),
            None => format!("{}/pages", self.templates()),
        }
    }

    pub fn messages(&self) -> &str {
        self.messages.as_deref().unwrap_or("src/main/resources")
    }

    pub fn resources(&self) -> &str {
        self.resources.as_deref().unwrap_or_else(|| self.src())
    }

    pub fn test(&self) -> &str {
        self.test.as_deref().unwrap_or("src/test/resources/templates")
    }

    pub fn model_selector(&self) -> &str {
        self.model_selector
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_MODEL_SELECTOR)
    }
}

/// A URI mapping binding a path pattern to a template.
///
/// `href` may contain `{name}` placeholders when `templated` is set; `model`
/// optionally names the placeholder whose value selects the model variant.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Mapping {
    pub href: String,

    #[serde(default)]
    pub templated: bool,

    pub template: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Mapping {
    /// Variable name used for model selection, ignoring empty values.
    pub fn model_variable(&self) -> Option<&str> {
        self.model.as_deref().filter(|m| !m.is_empty())
    }
}
