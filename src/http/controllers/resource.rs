//! Static resources below the resources root.

use std::fs;

use crate::discovery::templates::TEMPLATE_EXTENSION;
use crate::http::controllers::{Controller, ControllerContext};
use crate::http::response::PreviewResponse;
use crate::model::loader::confine;
use crate::model::{Intent, PreviewRequest};

/// Content type for a file extension.
pub fn content_type(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "json" => "application/json; charset=utf-8",
        "xml" => "application/xml",
        "txt" => "text/plain; charset=utf-8",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        _ => "application/octet-stream",
    }
}

/// Extension of the last path segment, if it has one.
fn extension(path: &str) -> Option<&str> {
    let file = path.rsplit('/').next()?;
    let (stem, ext) = file.rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then_some(ext)
}

pub struct ResourceController;

impl Controller for ResourceController {
    fn name(&self) -> &'static str {
        "resource"
    }

    fn priority(&self) -> u8 {
        5
    }

    fn handle(&self, ctx: &ControllerContext<'_>, request: &PreviewRequest) -> Option<PreviewResponse> {
        if request.intent != Intent::View {
            return None;
        }
        let ext = extension(&request.path)?;
        if ext.eq_ignore_ascii_case(TEMPLATE_EXTENSION) {
            return None;
        }

        let relative = request.path.trim_start_matches('/');
        let location = match confine(&ctx.site.resources_root(), relative) {
            Ok(location) => location,
            Err(error) => {
                tracing::warn!(path = %request.path, error = %error, "Rejected resource path");
                return Some(PreviewResponse::Forbidden(request.path.clone()));
            }
        };
        if !location.is_file() {
            tracing::trace!(location = %location.display(), "Resource does not exist");
            return None;
        }

        match fs::read(&location) {
            Ok(body) => {
                tracing::debug!(path = %request.path, bytes = body.len(), "Serving resource");
                Some(PreviewResponse::Asset {
                    content_type: content_type(ext),
                    body,
                })
            }
            Err(error) => {
                tracing::warn!(location = %location.display(), error = %error, "Failed to read resource");
                None
            }
        }
    }
}
