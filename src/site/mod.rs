//! Project snapshot and its reload discipline.
//!
//! # Data Flow
//! ```text
//! project dir
//!     → config::loader (site.json)
//!     → discovery (templates + model variants)
//!     → routing (route table, layout config)
//!     → Site (immutable snapshot)
//!     → SiteHandle::replace (atomic swap)
//!     → request handlers load() the current snapshot
//! ```
//!
//! # Design Decisions
//! - A `Site` is never mutated after construction
//! - Reload builds a complete new snapshot, then swaps the reference
//! - Readers hold an `Arc<Site>` for the whole request, so a concurrent
//!   reload never shows them a partially built registry

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::loader::load_site_config;
use crate::config::schema::SiteConfig;
use crate::discovery::{discover_templates, TemplateRecord};
use crate::routing::{LayoutConfig, RouteTable};

/// Directory below the mock root holding page models.
pub const PAGES_NAMESPACE: &str = "pages";

/// Directory below the mock root (and the templates root) holding layouts.
pub const LAYOUTS_NAMESPACE: &str = "layouts";

/// Template name used for the root path.
pub const INDEX_TEMPLATE: &str = "index";

/// Immutable view of a project: configuration, registry and compiled routes.
#[derive(Debug)]
pub struct Site {
    root: PathBuf,
    config: SiteConfig,
    routes: RouteTable,
    templates: BTreeMap<String, TemplateRecord>,
    layouts: LayoutConfig,
}

impl Site {
    /// Analyze the project at `root`.
    pub fn load(root: &Path) -> Self {
        tracing::info!(path = %root.display(), "Analyzing project");
        let config = load_site_config(root);
        Self::from_config(root, config)
    }

    /// Build a snapshot from an already loaded configuration.
    pub fn from_config(root: &Path, config: SiteConfig) -> Self {
        let root = root.to_path_buf();
        let routes = RouteTable::from_mappings(&config.mappings);

        let pages_root = root.join(config.pages());
        let mock_pages_root = root.join(config.test()).join(PAGES_NAMESPACE);
        let templates: BTreeMap<String, TemplateRecord> =
            discover_templates(&pages_root, &mock_pages_root)
                .into_iter()
                .map(|t| (t.name.clone(), t))
                .collect();

        let variant_count: usize = templates.values().map(|t| t.variants.len()).sum();
        tracing::info!(
            templates = templates.len(),
            models = variant_count,
            routes = routes.len(),
            "Templates discovered"
        );

        let layouts = LayoutConfig::load(&Self::layout_index_path(&root, &config));
        if !layouts.is_empty() {
            tracing::info!(layouts = layouts.len(), "Layouts discovered");
        }

        Self {
            root,
            config,
            routes,
            templates,
            layouts,
        }
    }

    fn layout_index_path(root: &Path, config: &SiteConfig) -> PathBuf {
        root.join(config.templates())
            .join(LAYOUTS_NAMESPACE)
            .join("index.json")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn layouts(&self) -> &LayoutConfig {
        &self.layouts
    }

    pub fn templates(&self) -> &BTreeMap<String, TemplateRecord> {
        &self.templates
    }

    pub fn template(&self, name: &str) -> Option<&TemplateRecord> {
        self.templates.get(name)
    }

    /// Whether `template` has a model variant with the given id.
    pub fn model_exists(&self, template: &str, id: &str) -> bool {
        self.template(template).is_some_and(|t| t.has_variant(id))
    }

    /// Root of all renderable templates (pages and layouts).
    pub fn templates_root(&self) -> PathBuf {
        self.root.join(self.config.templates())
    }

    pub fn pages_root(&self) -> PathBuf {
        self.root.join(self.config.pages())
    }

    /// Root of the mock data, holding `pages/` and `layouts/`.
    pub fn mock_root(&self) -> PathBuf {
        self.root.join(self.config.test())
    }

    pub fn resources_root(&self) -> PathBuf {
        self.root.join(self.config.resources())
    }
}

/// Shared handle to the active snapshot.
#[derive(Debug)]
pub struct SiteHandle {
    root: PathBuf,
    current: ArcSwap<Site>,
}

impl SiteHandle {
    pub fn new(site: Site) -> Self {
        Self {
            root: site.root.clone(),
            current: ArcSwap::from_pointee(site),
        }
    }

    /// Load the project at `root` and wrap it.
    pub fn open(root: &Path) -> Self {
        Self::new(Site::load(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The current snapshot. Hold it for the duration of a request.
    pub fn snapshot(&self) -> Arc<Site> {
        self.current.load_full()
    }

    /// Swap in a freshly built snapshot.
    pub fn replace(&self, site: Site) {
        self.current.store(Arc::new(site));
    }

    /// Rebuild from disk and swap.
    pub fn reload(&self) -> Arc<Site> {
        let site = Arc::new(Site::load(&self.root));
        self.current.store(site.clone());
        tracing::info!(templates = site.templates().len(), "Site reloaded");
        site
    }
}
