//! Template discovery.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::discovery::models::{ModelIndex, ModelVariant};

/// File extension of page templates.
pub const TEMPLATE_EXTENSION: &str = "html";

/// A discovered page template and its mock-data variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRecord {
    /// Path relative to the pages root, `/`-separated, without extension.
    pub name: String,
    pub location: PathBuf,
    pub variants: Vec<ModelVariant>,
}

impl TemplateRecord {
    pub fn has_variant(&self, id: &str) -> bool {
        self.variants.iter().any(|v| v.id == id)
    }

    pub fn default_variant(&self) -> Option<&ModelVariant> {
        self.variants.iter().find(|v| v.is_default)
    }
}

/// Template name for a file below `root`, or `None` if it is not a template.
pub fn template_name(root: &Path, path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION) {
        return None;
    }
    let relative = path.strip_prefix(root).ok()?;
    let name = relative
        .with_extension("")
        .to_string_lossy()
        .replace('\\', "/");
    (!name.is_empty()).then_some(name)
}

/// Walk `pages_root` and pair every template with its variants under `mock_pages_root`.
///
/// A missing pages root yields an empty list; a missing mock root leaves
/// every template without variants.
pub fn discover_templates(pages_root: &Path, mock_pages_root: &Path) -> Vec<TemplateRecord> {
    if !pages_root.is_dir() {
        tracing::warn!(path = %pages_root.display(), "Template source directory does not exist");
        return Vec::new();
    }

    let models = ModelIndex::scan(mock_pages_root);
    let mut templates = Vec::new();

    for entry in WalkDir::new(pages_root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::error!(error = %err, "Failed to read template directory entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
    {
        let Some(name) = template_name(pages_root, entry.path()) else {
            continue;
        };
        let variants = models.variants_for(&name);
        tracing::trace!(template = %name, models = variants.len(), "Registering template");
        templates.push(TemplateRecord {
            name,
            location: entry.path().to_path_buf(),
            variants,
        });
    }

    tracing::info!(count = templates.len(), "Discovered templates");
    templates
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_template_name() {
        let root = Path::new("/p/pages");
        assert_eq!(
            template_name(root, Path::new("/p/pages/events/list.html")).as_deref(),
            Some("events/list")
        );
        assert_eq!(template_name(root, Path::new("/p/pages/style.css")), None);
    }

    #[test]
    fn test_discover_with_models() {
        let dir = tempfile::tempdir().unwrap();
        let pages = dir.path().join("pages");
        let mock = dir.path().join("mock/pages");
        fs::create_dir_all(pages.join("events")).unwrap();
        fs::create_dir_all(mock.join("events")).unwrap();
        fs::write(pages.join("index.html"), "").unwrap();
        fs::write(pages.join("events/list.html"), "").unwrap();
        fs::write(pages.join("events/readme.md"), "").unwrap();
        fs::write(mock.join("events/list.json"), "{}").unwrap();
        fs::write(mock.join("events/list.vip.json"), "{}").unwrap();

        let templates = discover_templates(&pages, &mock);
        let names: Vec<&str> = templates.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["events/list", "index"]);

        let list = &templates[0];
        assert!(list.has_variant("vip"));
        assert!(list.has_variant(""));
        assert!(list.default_variant().is_some());
        assert!(templates[1].variants.is_empty());
    }

    #[test]
    fn test_missing_roots() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_templates(&dir.path().join("absent"), dir.path()).is_empty());

        let pages = dir.path().join("pages");
        fs::create_dir_all(&pages).unwrap();
        fs::write(pages.join("home.html"), "").unwrap();
        let templates = discover_templates(&pages, &dir.path().join("no-mock"));
        assert_eq!(templates.len(), 1);
        assert!(templates[0].variants.is_empty());
    }
}
