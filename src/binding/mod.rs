//! Declarative HTTP bindings for RPC operations.
//!
//! # Data Flow
//! ```text
//! HttpRule (one verb/path pair + doc, version, metadata)
//!     → rule.rs (Binding construction; empty path drops the binding)
//!     → table.rs (versioned route table, template matching)
//!     → dispatcher lookup per request
//! ```
//!
//! # Design Decisions
//! - Bindings are immutable data; registration order is preserved and
//!   first match wins within a version
//! - Registration conflicts are surfaced to the caller; `replace` keeps
//!   a last-wins path for dynamic updates
//! - Path templates use `{name}` placeholders matched per segment, no regex

pub mod rule;
pub mod table;

pub use rule::{collect_bindings, Binding, HttpRule, RulePattern};
pub use table::{RouteError, RouteTable};
