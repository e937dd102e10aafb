//! RPC status to HTTP status translation.
//!
//! # Data Flow
//! ```text
//! Backend error (RpcCode + message)
//!     → translate.rs (scan "(code)text" convention)
//!     → rewrite to the reserved invalid-format code when absent
//!     → code.rs (fixed RpcCode → HTTP status table)
//!     → StatusOutcome (http status, app error code, normalized error)
//! ```
//!
//! # Design Decisions
//! - Every outbound error message carries the "(code)text" shape, even
//!   when the origin violated the convention
//! - The `ihc` query flag forces HTTP 200 but leaves the body untouched
//! - An app error code of 0 is never emitted on the error path

pub mod code;
pub mod translate;

pub use code::RpcCode;
pub use translate::{translate, RpcError, StatusOutcome};

/// Internal server error.
pub const INTERNAL_ERR: i64 = 10401;
/// A required header is missing.
pub const HEADER_MISSING_ERR: i64 = 10402;
/// The auth token is empty.
pub const TOKEN_IS_EMPTY_ERR: i64 = 10403;
/// Token decoding failed.
pub const DECODE_TOKEN_FAIL: i64 = 10404;
/// Token parsing failed.
pub const PARSE_TOKEN_ERR: i64 = 10405;
/// Token claim decoding failed.
pub const DECODE_CLAIM_FAIL: i64 = 10406;
/// Token claim parsing failed.
pub const PARSE_CLAIM_FAIL: i64 = 10407;
/// The error message did not carry a parseable "(code)" prefix.
pub const INVALID_ERR_FORMAT_ERR: i64 = 10408;
/// A path argument failed structural decoding.
pub const INVALID_PATH_ARG_ERR: i64 = 10409;
/// The service is under maintenance.
pub const MAINTENANCE_ERR: i64 = 10410;
/// The request body failed structural decoding.
pub const INVALID_BODY_ERR: i64 = 10411;
