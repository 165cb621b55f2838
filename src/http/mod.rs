//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, reload swap)
//!     → request.rs (request ID, method → intent, path + query)
//!     → controllers/ (template, resource, generated index)
//!     → response.rs (status, headers, body)
//!     → Send to client
//! ```

pub mod controllers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::PreviewResponse;
pub use server::HttpServer;
