//! Model file loading.
//!
//! Documents are read fresh on every request so that edits show up without
//! a reload. Missing, unreadable or malformed files load as an empty model.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde_json::Value;

use crate::discovery::models::MODEL_EXTENSION;
use crate::model::coerce::ShapeRegistry;
use crate::model::{Diagnostic, Model, ResolveError, Resolved};

/// Key of the wrapper object holding the actual template data.
pub const MODEL_KEY: &str = "model";

/// Join `relative` onto `root` lexically, refusing anything that leaves `root`.
pub fn confine(root: &Path, relative: &str) -> Result<PathBuf, ResolveError> {
    let mut depth = 0usize;
    let mut path = root.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => {
                path.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir if depth > 0 => {
                path.pop();
                depth -= 1;
            }
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ResolveError::PathTraversal(relative.to_string()));
            }
        }
    }
    Ok(path)
}

/// Location of a model document: `<root>/<name>[.<variant>].json`.
pub fn model_path(root: &Path, name: &str, variant: Option<&str>) -> Result<PathBuf, ResolveError> {
    let file = match variant {
        Some(id) => format!("{name}.{id}.{MODEL_EXTENSION}"),
        None => format!("{name}.{MODEL_EXTENSION}"),
    };
    confine(root, &file)
}

/// Read a model document as a JSON object.
pub fn load_document(path: &Path) -> Resolved<Model> {
    if !path.is_file() {
        return Resolved::with(Model::new(), Diagnostic::MissingModel(path.to_path_buf()));
    }
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            return Resolved::with(
                Model::new(),
                Diagnostic::UnreadableModel {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                },
            )
        }
    };
    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(model)) => {
            tracing::debug!(path = %path.display(), keys = model.len(), "Loaded model");
            Resolved::ok(model)
        }
        Ok(_) => Resolved::with(Model::new(), Diagnostic::NotAnObject(path.to_path_buf())),
        Err(e) => Resolved::with(
            Model::new(),
            Diagnostic::MalformedModel {
                path: path.to_path_buf(),
                error: e.to_string(),
            },
        ),
    }
}

/// Template data from a raw document.
///
/// A `"model"` object is unwrapped and its values coerced; otherwise the
/// whole document is used as-is.
pub fn extract_template_model(raw: &Model, shapes: &ShapeRegistry) -> Resolved<Model> {
    match raw.get(MODEL_KEY) {
        Some(Value::Object(model)) => shapes.process_model(model),
        _ => Resolved::ok(raw.clone()),
    }
}
