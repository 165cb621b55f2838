//! Request controllers.
//!
//! # Data Flow
//! ```text
//! PreviewRequest
//!     → template.rs (priority 0: pages and URI mappings)
//!     → resource.rs (priority 5: static files under the resources root)
//!     → index.rs    (priority 10: generated listing at `/`)
//!     → first controller that accepts answers, otherwise 404
//! ```
//!
//! # Design Decisions
//! - A controller signals "not my request" by returning `None`; that is
//!   never an error
//! - Controllers see one `Site` snapshot for the whole request

pub mod index;
pub mod resource;
pub mod template;

use crate::http::response::PreviewResponse;
use crate::model::{Model, PreviewRequest, ShapeRegistry};
use crate::render::{error_page, Renderer};
use crate::site::Site;

pub use index::IndexController;
pub use resource::ResourceController;
pub use template::TemplateController;

/// What a controller works against for one request.
pub struct ControllerContext<'a> {
    pub site: &'a Site,
    pub shapes: &'a ShapeRegistry,
    pub renderer: &'a dyn Renderer,
}

impl ControllerContext<'_> {
    /// Render `template`, turning a failure into an error page.
    pub fn render(&self, template: &str, model: &Model) -> PreviewResponse {
        match self.renderer.render(self.site, template, model) {
            Ok(html) => PreviewResponse::Html(html),
            Err(error) => {
                tracing::error!(template = %template, error = %error, "Rendering failed");
                PreviewResponse::RenderFailed(error_page(template, &error))
            }
        }
    }
}

/// Answers the requests it accepts.
pub trait Controller: Send + Sync {
    fn name(&self) -> &'static str;

    /// Lower runs first.
    fn priority(&self) -> u8;

    /// `None` when this controller does not accept the request.
    fn handle(&self, ctx: &ControllerContext<'_>, request: &PreviewRequest) -> Option<PreviewResponse>;
}

/// The built-in controllers in dispatch order.
pub fn default_controllers() -> Vec<Box<dyn Controller>> {
    let mut controllers: Vec<Box<dyn Controller>> = vec![
        Box::new(IndexController),
        Box::new(ResourceController),
        Box::new(TemplateController),
    ];
    controllers.sort_by_key(|c| c.priority());
    controllers
}

/// Offer the request to each controller in turn.
pub fn dispatch(
    controllers: &[Box<dyn Controller>],
    ctx: &ControllerContext<'_>,
    request: &PreviewRequest,
) -> PreviewResponse {
    for controller in controllers {
        if let Some(response) = controller.handle(ctx, request) {
            tracing::debug!(
                controller = controller.name(),
                path = %request.path,
                status = response.status().as_u16(),
                "Request handled"
            );
            return response;
        }
    }
    tracing::debug!(path = %request.path, "No controller accepted request");
    PreviewResponse::NotFound(request.path.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        let names: Vec<&str> = default_controllers().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["template", "resource", "index"]);
    }
}
