//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Request path
//!     → matcher.rs (ordered URI mappings → template + path variables)
//!     → layout.rs  (layout globs → wrapping layout name)
//!
//! Compilation (at load/reload):
//!     Mapping[] / layouts index.json
//!     → pattern.rs (URI templates and globs → anchored regexes)
//!     → Freeze as immutable RouteTable / LayoutConfig
//! ```
//!
//! # Design Decisions
//! - Routes compiled at load, immutable at runtime
//! - Deterministic: same input always matches same route
//! - First match wins (configuration order)

pub mod layout;
pub mod matcher;
pub mod pattern;

pub use layout::{Layout, LayoutConfig};
pub use matcher::{MatchResult, RouteTable};
pub use pattern::{GlobPattern, PatternError, RoutePattern};
