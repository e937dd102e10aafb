//! Header trust boundary.
//!
//! # Data Flow
//! ```text
//! Inbound request headers
//!     → names.rs (allow-list + tracing prefixes)
//!     → guard.rs (filter, derive, stamp)
//!     → PropagatedHeaders (forwarded to backend invoke)
//!     → guard.rs sign_subset (ordered fields for the signing collaborator)
//! ```
//!
//! # Design Decisions
//! - Everything not on the allow-list is dropped before propagation
//! - Sanitization is total and deterministic: same input, same output
//! - The service's own identity is stamped server-side, never read from
//!   the caller
//! - Signed fields are never defaulted; a missing field stays missing

pub mod guard;
pub mod names;

pub use guard::{md5_hex, sanitize, sign_subset, PropagatedHeaders};
