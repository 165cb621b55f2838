//! Page templates, reached by name or through a URI mapping.

use crate::http::controllers::{Controller, ControllerContext};
use crate::http::response::PreviewResponse;
use crate::model::{PreviewRequest, Resolution, Resolver};

pub struct TemplateController;

impl Controller for TemplateController {
    fn name(&self) -> &'static str {
        "template"
    }

    fn priority(&self) -> u8 {
        0
    }

    fn handle(&self, ctx: &ControllerContext<'_>, request: &PreviewRequest) -> Option<PreviewResponse> {
        let resolver = Resolver::new(ctx.site, ctx.shapes);
        let resolved = match resolver.resolve(request) {
            Ok(Some(resolved)) => resolved,
            Ok(None) => return None,
            Err(error) => {
                tracing::warn!(path = %request.path, error = %error, "Rejected model path");
                return Some(PreviewResponse::Forbidden(request.path.clone()));
            }
        };
        resolved.log();

        Some(match resolved.value {
            Resolution::Redirect(location) => PreviewResponse::Redirect(location),
            Resolution::Render(plan) => {
                tracing::debug!(
                    template = %plan.template,
                    page = %plan.page,
                    variant = ?plan.variant,
                    "Rendering page"
                );
                ctx.render(&plan.template, &plan.model)
            }
        })
    }
}
