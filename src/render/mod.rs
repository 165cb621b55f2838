//! Rendering subsystem.
//!
//! # Data Flow
//! ```text
//! RenderPlan (template id + flat model)
//!     → Renderer::render (engine.rs: load project templates, render)
//!     → HTML string
//!
//! Site registry
//!     → index.rs (discovery tree → generated listing page)
//! ```
//!
//! # Design Decisions
//! - `Renderer` is the seam between the resolution core and the engine
//! - Templates are read from disk on every render so edits show immediately
//! - Renderer failures are returned, never panicked; the HTTP layer turns
//!   them into a server error page

pub mod index;
pub mod engine;

use thiserror::Error;

use crate::model::Model;
use crate::site::Site;

pub use engine::TeraRenderer;

/// Error produced by a renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to load templates: {0}")]
    Load(String),
    #[error("render error for '{template}': {message}")]
    Render { template: String, message: String },
}

/// Turns a template identifier and a model into HTML.
pub trait Renderer: Send + Sync {
    fn render(&self, site: &Site, template: &str, model: &Model) -> Result<String, RenderError>;
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// HTML page describing a rendering failure.
pub fn error_page(template: &str, error: &RenderError) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Template Error</title>
    <style>
        body {{ font-family: monospace; margin: 20px; }}
        .error {{ color: red; background: #ffeeee; padding: 10px; border: 1px solid red; }}
    </style>
</head>
<body>
    <h1>Template Rendering Error</h1>
    <p><strong>Template:</strong> {}</p>
    <div class="error"><strong>Error:</strong> {}</div>
</body>
</html>
"#,
        escape(template),
        escape(&error.to_string())
    )
}
