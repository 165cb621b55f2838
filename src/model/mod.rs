//! Model resolution subsystem.
//!
//! # Data Flow
//! ```text
//! request path + query + intent
//!     → resolve.rs (template name, variant selection)
//!     → loader.rs  (read <mock>/pages/<name>[.<variant>].json)
//!     → coerce.rs  ("class"-tagged values → named shapes)
//!     → resolve.rs (merge: model → path variables → query, then layout)
//!     → Resolution (render plan or redirect) + diagnostics
//! ```
//!
//! # Design Decisions
//! - Expected absence is a value, not an error: every step returns its
//!   result together with the diagnostics explaining any fallback
//! - The only hard failure is a model or layout path escaping its root
//! - Resolution never renders; the caller hands the plan to a renderer

pub mod coerce;
pub mod loader;
pub mod resolve;

use std::path::PathBuf;

use thiserror::Error;

pub use coerce::ShapeRegistry;
pub use resolve::{Intent, PreviewRequest, RenderPlan, Resolution, Resolver, RouteTarget};

/// Template data: a flat JSON object.
pub type Model = serde_json::Map<String, serde_json::Value>;

/// Why a step fell back to a default.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("model file not found: {0}")]
    MissingModel(PathBuf),
    #[error("failed to read model {path}: {error}")]
    UnreadableModel { path: PathBuf, error: String },
    #[error("failed to parse model {path}: {error}")]
    MalformedModel { path: PathBuf, error: String },
    #[error("model {0} is not a JSON object")]
    NotAnObject(PathBuf),
    #[error("requested model '{variant}' does not exist for template '{template}', using default")]
    UnknownVariant { template: String, variant: String },
    #[error("layout '{layout}' has no template at {path}, rendering without layout")]
    MissingLayout { layout: String, path: PathBuf },
    #[error("unknown class '{class}' for property '{key}', keeping it as a map")]
    UnknownClass { key: String, class: String },
    #[error("failed to coerce property '{key}' into {class}: {error}")]
    Coercion {
        key: String,
        class: String,
        error: String,
    },
}

/// A value plus the diagnostics collected while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Resolved<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    pub fn with(value: T, diagnostic: Diagnostic) -> Self {
        Self {
            value,
            diagnostics: vec![diagnostic],
        }
    }

    /// Take the value, moving its diagnostics into `sink`.
    pub fn collect(self, sink: &mut Vec<Diagnostic>) -> T {
        sink.extend(self.diagnostics);
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
        Resolved {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }

    /// Emit every diagnostic as a warning.
    pub fn log(&self) {
        for diagnostic in &self.diagnostics {
            tracing::warn!("{}", diagnostic);
        }
    }
}

/// Hard failure resolving a request.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("path escapes its root directory: {0}")]
    PathTraversal(String),
}
