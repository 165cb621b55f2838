//! Tera-based renderer over the project's template tree.
//!
//! Every `.html` file below the templates root is registered by its
//! relative path without extension (`layouts/main`, `fragments/nav`), and
//! every discovered page additionally by its page name (`events/list`)
//! unless that name is already taken by a file below the templates root.
//! Layouts receive the rendered page as `content`, next to `page`.

use std::collections::HashSet;
use std::error::Error as _;
use std::path::PathBuf;

use tera::{Context, Tera};
use walkdir::WalkDir;

use crate::discovery::templates::{template_name, TEMPLATE_EXTENSION};
use crate::model::resolve::PAGE_KEY;
use crate::model::Model;
use crate::render::{RenderError, Renderer};
use crate::site::{Site, LAYOUTS_NAMESPACE};

/// Model key holding the rendered page inside a layout.
pub const CONTENT_KEY: &str = "content";

fn describe(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Renders project templates with Tera.
#[derive(Debug, Default, Clone)]
pub struct TeraRenderer;

impl TeraRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Build a Tera instance from the current files of `site`.
    pub fn load(&self, site: &Site) -> Result<Tera, RenderError> {
        let mut files: Vec<(PathBuf, Option<String>)> = Vec::new();

        let templates_root = site.templates_root();
        if templates_root.is_dir() {
            for entry in WalkDir::new(&templates_root)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                if let Some(name) = template_name(&templates_root, entry.path()) {
                    files.push((entry.path().to_path_buf(), Some(name)));
                }
            }
        }
        let registered: HashSet<String> = files.iter().filter_map(|(_, name)| name.clone()).collect();
        for record in site.templates().values() {
            if registered.contains(&record.name) {
                tracing::warn!(
                    page = %record.name,
                    location = %record.location.display(),
                    "Page name shadows a template below the templates root, keeping the latter"
                );
                continue;
            }
            files.push((record.location.clone(), Some(record.name.clone())));
        }

        let mut tera = Tera::default();
        // names carry no extension, so escape everything
        tera.autoescape_on(vec![""]);
        tera.add_template_files(files)
            .map_err(|e| RenderError::Load(describe(&e)))?;
        tracing::trace!(
            count = tera.get_template_names().count(),
            extension = TEMPLATE_EXTENSION,
            "Loaded templates"
        );
        Ok(tera)
    }

    fn render_with(&self, tera: &Tera, template: &str, model: &Model) -> Result<String, RenderError> {
        let context = Context::from_serialize(model).map_err(|e| RenderError::Render {
            template: template.to_string(),
            message: describe(&e),
        })?;
        tera.render(template, &context)
            .map_err(|e| RenderError::Render {
                template: template.to_string(),
                message: describe(&e),
            })
    }
}

impl Renderer for TeraRenderer {
    fn render(&self, site: &Site, template: &str, model: &Model) -> Result<String, RenderError> {
        let tera = self.load(site)?;

        let is_layout = template
            .strip_prefix(LAYOUTS_NAMESPACE)
            .is_some_and(|rest| rest.starts_with('/'));
        let page = model.get(PAGE_KEY).and_then(|p| p.as_str());

        let html = match page {
            Some(page) if is_layout && !model.contains_key(CONTENT_KEY) => {
                let content = self.render_with(&tera, page, model)?;
                let mut wrapped = model.clone();
                wrapped.insert(CONTENT_KEY.to_string(), content.into());
                self.render_with(&tera, template, &wrapped)?
            }
            _ => self.render_with(&tera, template, model)?,
        };

        tracing::debug!(template = %template, bytes = html.len(), "Rendered template");
        Ok(html)
    }
}
