//! Generated listing at `/` for projects without an `index` page.

use crate::http::controllers::{Controller, ControllerContext};
use crate::http::response::PreviewResponse;
use crate::model::{Intent, PreviewRequest};
use crate::render::error_page;
use crate::render::index::render_index;
use crate::site::INDEX_TEMPLATE;

pub struct IndexController;

impl Controller for IndexController {
    fn name(&self) -> &'static str {
        "index"
    }

    fn priority(&self) -> u8 {
        10
    }

    fn handle(&self, ctx: &ControllerContext<'_>, request: &PreviewRequest) -> Option<PreviewResponse> {
        if request.intent != Intent::View || request.path != "/" {
            return None;
        }
        if ctx.site.template(INDEX_TEMPLATE).is_some() {
            return None;
        }

        Some(match render_index(ctx.site) {
            Ok(html) => PreviewResponse::Html(html),
            Err(error) => {
                tracing::error!(error = %error, "Failed to render generated index");
                PreviewResponse::RenderFailed(error_page(INDEX_TEMPLATE, &error))
            }
        })
    }
}
