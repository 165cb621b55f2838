//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → request spans carrying the request ID (http::server)
//!
//! Consumers:
//!     → logging.rs (EnvFilter + fmt layer to stderr)
//! ```
//!
//! # Design Decisions
//! - Structured fields over formatted messages
//! - Request ID flows through every event of a request via its span
//! - `RUST_LOG` always wins over the configured level

pub mod logging;
