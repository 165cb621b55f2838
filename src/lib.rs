//! Local preview server for server-rendered page templates.

pub mod config;
pub mod discovery;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod render;
pub mod routing;
pub mod site;

pub use config::schema::{ServerConfig, SiteConfig};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use site::{Site, SiteHandle};
