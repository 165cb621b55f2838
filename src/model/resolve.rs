//! Per-request model resolution.
//!
//! # Responsibilities
//! - Resolve a request path to a template (registry first, then URI mappings)
//! - Pick the model variant: query selector, then URI hint, then default
//! - Merge model, path variables and query parameters, then apply a layout
//! - Turn form submissions into redirects when the model describes one
//!
//! # Design Decisions
//! - Works against one `Site` snapshot; holds no state between requests
//! - Later sources override earlier ones: stored mock data never wins over
//!   explicit request input
//! - Unknown variants, missing files and failed coercions degrade with a
//!   diagnostic; only a path escaping its root is an error

use std::collections::HashMap;

use serde_json::Value;
use url::form_urlencoded;

use crate::model::coerce::ShapeRegistry;
use crate::discovery::templates::TEMPLATE_EXTENSION;
use crate::model::loader::{confine, extract_template_model, load_document, model_path};
use crate::model::{Diagnostic, Model, ResolveError, Resolved};
use crate::routing::MatchResult;
use crate::site::{Site, INDEX_TEMPLATE, LAYOUTS_NAMESPACE, PAGES_NAMESPACE};

/// Key of the form description in a raw model document.
pub const FORM_KEY: &str = "form";

/// Key injected into layout models naming the wrapped page.
pub const PAGE_KEY: &str = "page";

/// What the request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// GET: render the page.
    View,
    /// POST, PUT or PATCH: a form submission.
    Submit,
}

/// The parts of an HTTP request resolution looks at.
#[derive(Debug, Clone)]
pub struct PreviewRequest {
    pub intent: Intent,
    pub path: String,
    /// Decoded query parameters in request order.
    pub query: Vec<(String, String)>,
}

impl PreviewRequest {
    pub fn new(intent: Intent, path: impl Into<String>, raw_query: Option<&str>) -> Self {
        let query = raw_query
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self {
            intent,
            path: path.into(),
            query,
        }
    }

    /// Last value of a query parameter.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A template chosen for a path, with the URI match that chose it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTarget {
    pub template: String,
    pub matched: Option<MatchResult>,
}

impl RouteTarget {
    pub fn variables(&self) -> HashMap<String, String> {
        self.matched
            .as_ref()
            .map(|m| m.variables.clone())
            .unwrap_or_default()
    }

    pub fn model_hint(&self) -> Option<&str> {
        self.matched.as_ref().and_then(MatchResult::model_hint)
    }
}

/// Everything the renderer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    /// Template to render: the page itself or `layouts/<name>`.
    pub template: String,
    /// The resolved page template.
    pub page: String,
    pub layout: Option<String>,
    pub variant: Option<String>,
    pub model: Model,
}

/// Outcome of resolving an accepted request.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Render(RenderPlan),
    Redirect(String),
}

/// Strip the leading and trailing `/`; the root path is `index`.
pub fn normalize_template_name(path: &str) -> String {
    let name = path.strip_prefix('/').unwrap_or(path);
    let name = name.strip_suffix('/').unwrap_or(name);
    if name.is_empty() {
        INDEX_TEMPLATE.to_string()
    } else {
        name.to_string()
    }
}

/// Resolves requests against one site snapshot.
pub struct Resolver<'a> {
    site: &'a Site,
    shapes: &'a ShapeRegistry,
}

impl<'a> Resolver<'a> {
    pub fn new(site: &'a Site, shapes: &'a ShapeRegistry) -> Self {
        Self { site, shapes }
    }

    /// Template for `path`, or `None` when this path is not a page.
    pub fn resolve_template(&self, path: &str) -> Option<RouteTarget> {
        let name = normalize_template_name(path);
        if self.site.template(&name).is_some() {
            return Some(RouteTarget {
                template: name,
                matched: None,
            });
        }

        let matched = self.site.routes().match_path(path)?;
        if self.site.template(matched.template_name()).is_none() {
            tracing::warn!(path = %path, template = %matched.template_name(), "Mapping targets an unknown template");
            return None;
        }
        tracing::debug!(
            path = %path,
            template = %matched.template_name(),
            variables = ?matched.variables,
            "Matched URI mapping"
        );
        Some(RouteTarget {
            template: matched.template_name().to_string(),
            matched: Some(matched),
        })
    }

    /// Variant to load: query selector, then URI hint, then none (default).
    pub fn select_variant(
        &self,
        template: &str,
        request: &PreviewRequest,
        hint: Option<&str>,
    ) -> Resolved<Option<String>> {
        let selector = self.site.config().model_selector();
        let requested = request
            .query_param(selector)
            .filter(|v| !v.is_empty())
            .or(hint.filter(|v| !v.is_empty()));

        match requested {
            None => Resolved::ok(None),
            Some(id) if self.site.model_exists(template, id) => Resolved::ok(Some(id.to_string())),
            Some(id) => Resolved::with(
                None,
                Diagnostic::UnknownVariant {
                    template: template.to_string(),
                    variant: id.to_string(),
                },
            ),
        }
    }

    /// Raw document of `<namespace>/<name>[.<variant>].json`.
    fn load_raw(
        &self,
        namespace: &str,
        name: &str,
        variant: Option<&str>,
    ) -> Result<Resolved<Model>, ResolveError> {
        let path = model_path(
            &self.site.mock_root(),
            &format!("{namespace}/{name}"),
            variant,
        )?;
        Ok(load_document(&path))
    }

    /// Resolve a request. `Ok(None)` means the path is not a page.
    pub fn resolve(
        &self,
        request: &PreviewRequest,
    ) -> Result<Option<Resolved<Resolution>>, ResolveError> {
        let Some(target) = self.resolve_template(&request.path) else {
            return Ok(None);
        };

        let mut diagnostics = Vec::new();
        let variant = self
            .select_variant(&target.template, request, target.model_hint())
            .collect(&mut diagnostics);
        let raw = self
            .load_raw(PAGES_NAMESPACE, &target.template, variant.as_deref())?
            .collect(&mut diagnostics);

        let resolution = match request.intent {
            Intent::Submit => match self.form_redirect(&raw) {
                Some(location) => {
                    tracing::info!(template = %target.template, location = %location, "Form submission redirect");
                    Resolution::Redirect(location)
                }
                None => {
                    tracing::info!(template = %target.template, "Form submission without action, re-rendering page");
                    Resolution::Render(
                        self.render_plan(&target.template, variant, &raw, &HashMap::new(), request)?
                            .collect(&mut diagnostics),
                    )
                }
            },
            Intent::View => Resolution::Render(
                self.render_plan(&target.template, variant, &raw, &target.variables(), request)?
                    .collect(&mut diagnostics),
            ),
        };

        Ok(Some(Resolved {
            value: resolution,
            diagnostics,
        }))
    }

    /// Redirect target from the raw document's `"form"`, if it names an action.
    fn form_redirect(&self, raw: &Model) -> Option<String> {
        let form = raw.get(FORM_KEY)?.as_object()?;
        let action = form.get("action")?.as_str().filter(|a| !a.is_empty())?;

        match form.get("model").and_then(Value::as_str).filter(|m| !m.is_empty()) {
            Some(model) => {
                let separator = if action.contains('?') { '&' } else { '?' };
                // the variant id is percent-encoded, not appended verbatim
                let param: String = form_urlencoded::Serializer::new(String::new())
                    .append_pair(self.site.config().model_selector(), model)
                    .finish();
                Some(format!("{action}{separator}{param}"))
            }
            None => Some(action.to_string()),
        }
    }

    /// Merge the page model with request input and wrap it in a layout.
    pub fn render_plan(
        &self,
        template: &str,
        variant: Option<String>,
        raw: &Model,
        variables: &HashMap<String, String>,
        request: &PreviewRequest,
    ) -> Result<Resolved<RenderPlan>, ResolveError> {
        let mut diagnostics = Vec::new();
        let mut model = extract_template_model(raw, self.shapes).collect(&mut diagnostics);

        for (key, value) in variables {
            model.insert(key.clone(), Value::String(value.clone()));
        }
        for (key, value) in &request.query {
            model.insert(key.clone(), Value::String(value.clone()));
        }

        let plain = |model: Model, diagnostics: Vec<Diagnostic>| Resolved {
            value: RenderPlan {
                template: template.to_string(),
                page: template.to_string(),
                layout: None,
                variant: variant.clone(),
                model,
            },
            diagnostics,
        };

        let Some(layout) = self.site.layouts().find_by_path(&request.path) else {
            return Ok(plain(model, diagnostics));
        };

        let layout_file = confine(
            &self.site.templates_root(),
            &format!("{LAYOUTS_NAMESPACE}/{layout}.{TEMPLATE_EXTENSION}"),
        )?;
        if !layout_file.is_file() {
            diagnostics.push(Diagnostic::MissingLayout {
                layout: layout.to_string(),
                path: layout_file,
            });
            return Ok(plain(model, diagnostics));
        }

        tracing::debug!(path = %request.path, layout = %layout, "Applying layout");
        let layout_raw = self
            .load_raw(LAYOUTS_NAMESPACE, layout, None)?
            .collect(&mut diagnostics);
        let mut merged = extract_template_model(&layout_raw, self.shapes).collect(&mut diagnostics);
        merged.extend(model);
        merged.insert(PAGE_KEY.to_string(), Value::String(template.to_string()));

        Ok(Resolved {
            value: RenderPlan {
                template: format!("{LAYOUTS_NAMESPACE}/{layout}"),
                page: template.to_string(),
                layout: Some(layout.to_string()),
                variant,
                model: merged,
            },
            diagnostics,
        })
    }
}
