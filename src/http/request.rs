//! Request identification and classification.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every request
//! - Read the request ID back for logging
//! - Classify the method into a preview intent and extract path and query
//!
//! # Design Decisions
//! - Request ID added as early as possible so the trace span carries it
//! - The path is used as sent; it is not percent-decoded

use axum::http::{HeaderValue, Method, Request, Uri};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::model::{Intent, PreviewRequest};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// The request's ID, or `"unknown"` outside the request-id layer.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Intent for a method; `None` for methods the preview server does not serve.
pub fn intent_for(method: &Method) -> Option<Intent> {
    match *method {
        Method::GET => Some(Intent::View),
        Method::POST | Method::PUT | Method::PATCH => Some(Intent::Submit),
        _ => None,
    }
}

/// Build the resolution input from method and URI.
pub fn preview_request(method: &Method, uri: &Uri) -> Option<PreviewRequest> {
    let intent = intent_for(method)?;
    Some(PreviewRequest::new(intent, uri.path(), uri.query()))
}
