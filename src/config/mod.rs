//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! pagewire.toml (optional)
//!     → loader.rs (parse & deserialize)
//!     → ServerConfig (listener, timeouts, logging, watch)
//!
//! <project>/site.json
//!     → loader.rs (parse, fall back to defaults)
//!     → validation.rs (semantic checks, reported as warnings)
//!     → SiteConfig (directories, mappings, model selector)
//!
//! On project change:
//!     watcher.rs detects change
//!     → Site rebuilt from disk
//!     → sent to the server, which swaps it in
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use schema::ServerConfig;
pub use schema::SiteConfig;
pub use schema::Mapping;
