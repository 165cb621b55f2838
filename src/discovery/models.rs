//! Mock model discovery.
//!
//! Model files mirror the page tree below `<mock>/pages/`:
//!
//! ```text
//! pages/events/list.json          → default variant of "events/list"
//! pages/events/list.empty.json    → variant "empty" of "events/list"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

static VARIANT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("valid variant regex"));

/// File extension of model documents.
pub const MODEL_EXTENSION: &str = "json";

/// One mock-data payload available for a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelVariant {
    /// Variant identifier; empty for the default model.
    pub id: String,
    pub location: PathBuf,
    pub is_default: bool,
}

impl ModelVariant {
    pub fn label(&self) -> &str {
        if self.is_default {
            "(default)"
        } else {
            &self.id
        }
    }
}

/// Whether `id` is an acceptable variant identifier.
pub fn is_variant_id(id: &str) -> bool {
    VARIANT_ID.is_match(id)
}

/// Classify a model file name against a template base name.
///
/// Returns `Some("")` for `<base>.json`, `Some(id)` for `<base>.<id>.json`,
/// `None` when the file does not belong to `base`.
pub fn variant_of<'a>(base: &str, file_name: &'a str) -> Option<&'a str> {
    let stem = file_name
        .strip_suffix(MODEL_EXTENSION)?
        .strip_suffix('.')?;
    let rest = stem.strip_prefix(base)?;
    if rest.is_empty() {
        return Some("");
    }
    let id = rest.strip_prefix('.')?;
    is_variant_id(id).then_some(id)
}

/// Index of every JSON file under a mock root, grouped by directory.
#[derive(Debug, Default)]
pub struct ModelIndex {
    by_dir: HashMap<String, Vec<(String, PathBuf)>>,
}

impl ModelIndex {
    /// Walk `root` once. A missing root gives an empty index.
    pub fn scan(root: &Path) -> Self {
        let mut by_dir: HashMap<String, Vec<(String, PathBuf)>> = HashMap::new();
        if !root.is_dir() {
            tracing::debug!(path = %root.display(), "Mock data directory does not exist");
            return Self { by_dir };
        }

        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(MODEL_EXTENSION) {
                continue;
            }
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let dir = relative
                .parent()
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            let file_name = entry.file_name().to_string_lossy().into_owned();
            by_dir
                .entry(dir)
                .or_default()
                .push((file_name, path.to_path_buf()));
        }

        Self { by_dir }
    }

    /// Variants of a template, default first and then by id.
    pub fn variants_for(&self, template_name: &str) -> Vec<ModelVariant> {
        let (dir, base) = match template_name.rsplit_once('/') {
            Some((dir, base)) => (dir, base),
            None => ("", template_name),
        };
        let Some(files) = self.by_dir.get(dir) else {
            return Vec::new();
        };

        let mut variants: Vec<ModelVariant> = files
            .iter()
            .filter_map(|(file_name, path)| {
                let id = variant_of(base, file_name)?;
                tracing::trace!(template = %template_name, variant = %id, path = %path.display(), "Found model");
                Some(ModelVariant {
                    id: id.to_string(),
                    location: path.clone(),
                    is_default: id.is_empty(),
                })
            })
            .collect();
        variants.sort_by(|a, b| (!a.is_default, &a.id).cmp(&(!b.is_default, &b.id)));
        variants
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_variant_of() {
        assert_eq!(variant_of("list", "list.json"), Some(""));
        assert_eq!(variant_of("list", "list.empty.json"), Some("empty"));
        assert_eq!(variant_of("list", "list.many_items-2.json"), Some("many_items-2"));
        assert_eq!(variant_of("list", "listing.json"), None);
        assert_eq!(variant_of("list", "list.a.b.json"), None);
        assert_eq!(variant_of("list", "list.txt"), None);
        assert_eq!(variant_of("list", "list..json"), None);
    }

    #[test]
    fn test_index_groups_by_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("events")).unwrap();
        fs::write(root.join("events/list.json"), "{}").unwrap();
        fs::write(root.join("events/list.empty.json"), "{}").unwrap();
        fs::write(root.join("events/list.bad id.json"), "{}").unwrap();
        fs::write(root.join("events/detail.json"), "{}").unwrap();
        fs::write(root.join("list.json"), "{}").unwrap();
        fs::write(root.join("events/notes.txt"), "").unwrap();

        let index = ModelIndex::scan(root);
        let variants = index.variants_for("events/list");
        let ids: Vec<&str> = variants.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["", "empty"]);
        assert!(variants[0].is_default);
        assert!(!variants[1].is_default);

        assert_eq!(index.variants_for("list").len(), 1);
        assert!(index.variants_for("events/missing").is_empty());
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let index = ModelIndex::scan(&dir.path().join("absent"));
        assert!(index.variants_for("index").is_empty());
    }
}
