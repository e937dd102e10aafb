//! Observability subsystem.
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Log filter configurable via config and the RUST_LOG environment
//!   variable, environment winning

pub mod logging;

pub use logging::init_tracing;
