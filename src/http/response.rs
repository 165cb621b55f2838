//! Response mapping.
//!
//! # Responsibilities
//! - Represent every outcome a controller can produce
//! - Map outcomes to status codes, content types and bodies
//!
//! # Design Decisions
//! - Controllers return `PreviewResponse` values, never raw axum responses,
//!   so dispatch can be tested without a running server
//! - Failure bodies are short plain text, except render failures which
//!   carry an HTML error page

use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};

/// Outcome of handling one request.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewResponse {
    /// Rendered page.
    Html(String),
    /// Form submission redirect (`302`).
    Redirect(String),
    /// Static resource.
    Asset {
        content_type: &'static str,
        body: Vec<u8>,
    },
    /// Path escapes its root.
    Forbidden(String),
    NotFound(String),
    MethodNotAllowed,
    /// Renderer failure; carries the error page.
    RenderFailed(String),
}

impl PreviewResponse {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Html(_) | Self::Asset { .. } => StatusCode::OK,
            Self::Redirect(_) => StatusCode::FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::RenderFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PreviewResponse {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Html(body) => Html(body).into_response(),
            Self::Redirect(location) => (status, [(header::LOCATION, location)]).into_response(),
            Self::Asset { content_type, body } => {
                (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
            }
            Self::Forbidden(path) => (status, format!("Forbidden: {path}")).into_response(),
            Self::NotFound(path) => (status, format!("No page found for {path}")).into_response(),
            Self::MethodNotAllowed => (
                status,
                [(header::ALLOW, "GET, POST, PUT, PATCH")],
                "Method not allowed",
            )
                .into_response(),
            Self::RenderFailed(page) => (status, Html(page)).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_sets_location() {
        let response = PreviewResponse::Redirect("/done?m=ok".into()).into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/done?m=ok");
    }

    #[test]
    fn test_statuses() {
        assert_eq!(PreviewResponse::Html(String::new()).status(), StatusCode::OK);
        assert_eq!(PreviewResponse::Forbidden("/..".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(PreviewResponse::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            PreviewResponse::RenderFailed(String::new()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_html_content_type() {
        let response = PreviewResponse::Html("<p>x</p>".into()).into_response();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html; charset=utf-8");
    }
}
