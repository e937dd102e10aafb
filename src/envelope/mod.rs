//! Dual-mode response rendering.
//!
//! # Data Flow
//! ```text
//! Backend reply or error + query flags
//!     → status translation (see crate::status)
//!     → body.rs (flat error shape or full envelope)
//!     → render.rs (wire bytes, status, response headers)
//! ```
//!
//! # Design Decisions
//! - The `onebox` query flag selects the enveloped shape per request; it
//!   is not a property of the binding
//! - A refreshed credential on the reply is stamped onto both the token
//!   header and Authorization, so token refresh needs no extra endpoint
//! - request_id/request_method are echoed from the values stamped by the
//!   header guard, never recomputed

pub mod body;
pub mod render;

pub use body::{ErrBody, Reply, RespBody, TokenBearer};
pub use render::{render, EnvelopeError, RenderParams, Rendered, CONTENT_TYPE_JSON};
