//! Request decoding: query, path and body unification.
//!
//! # Data Flow
//! ```text
//! Raw request (method, uri, headers, buffered body) + resolved binding
//!     → context.rs (RequestContext: query map, cached body, path params)
//!     → reader.rs (merge sources into one JSON object)
//!     → typed request handed to the backend invoke
//! ```
//!
//! # Design Decisions
//! - GET/DELETE/HEAD decode from query and path parameters only; the body
//!   is never consulted
//! - Other verbs decode the body first, then overlay query/path values,
//!   so query/path wins a name collision
//! - The body is buffered once so body-parameter lookups can re-read it
//! - Decoding failure is a structural error, never silently ignored

pub mod context;
pub mod reader;

pub use context::{QueryMap, RequestContext};
pub use reader::{decode, decode_as, DecodeError};
