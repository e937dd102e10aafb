//! Request dispatch and server wiring.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → server.rs (axum catch-all route, trace + timeout layers)
//!     → dispatcher.rs (resolve binding → header guard → decode
//!        → backend invoke → translate → render)
//!     → wire response (exactly one render per request)
//! ```
//!
//! # Design Decisions
//! - The route table is the only cross-request state: RwLock'd, read on
//!   every dispatch, mutated rarely on add/remove
//! - Routing misses and decode failures skip the invoke entirely but still
//!   flow through the one translate/render path
//! - The backend is an abstract trait; transport, retries and deadlines
//!   live behind it

pub mod backend;
pub mod dispatcher;
pub mod server;

pub use backend::{Backend, EchoBackend};
pub use dispatcher::Dispatcher;
pub use server::GatewayServer;
