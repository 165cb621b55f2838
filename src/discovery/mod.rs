//! Discovery subsystem.
//!
//! # Data Flow
//! ```text
//! <pages root>/**/*.html           <mock root>/pages/**/*.json
//!     → templates.rs (walk, name)      → models.rs (index by directory)
//!     └──────────────┬──────────────────┘
//!                    ▼
//!          TemplateRecord[] (name, location, variants)
//!                    → tree.rs (folder/leaf tree for the index page)
//! ```
//!
//! # Design Decisions
//! - Discovery never writes to disk
//! - Missing directories degrade to empty results with a log line
//! - Walk order is sorted so repeated discoveries are identical

pub mod models;
pub mod templates;
pub mod tree;

pub use models::ModelVariant;
pub use templates::{discover_templates, TemplateRecord};
pub use tree::TemplateTree;
