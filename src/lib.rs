//! REST↔RPC transcoding gateway core.
//!
//! # Architecture Overview
//!
//! ```text
//! Client request
//!     → dispatch (axum catch-all, trace/timeout layers)
//!     → binding (versioned route table, template resolution)
//!     → headers (allow-list filter, derived fields, signing subset)
//!     → decode (query/path/body unified into one request value)
//!     → Backend::invoke (abstract RPC transport)
//!     → status (RPC code → HTTP status, "(code)text" convention)
//!     → envelope (flat or onebox wire shape)
//!     → Client response
//! ```
//!
//! The route table is built once from declarative bindings (registration
//! or configuration) and read on every dispatch; everything else is
//! per-request state.

pub mod binding;
pub mod config;
pub mod decode;
pub mod dispatch;
pub mod envelope;
pub mod headers;
pub mod observability;
pub mod status;

pub use binding::{Binding, HttpRule, RouteError, RouteTable};
pub use config::GatewayConfig;
pub use decode::{decode, decode_as, DecodeError, RequestContext};
pub use dispatch::{Backend, Dispatcher, GatewayServer};
pub use envelope::{Reply, TokenBearer};
pub use headers::PropagatedHeaders;
pub use status::{RpcCode, RpcError};
