//! Backend error normalization.
//!
//! Errors follow a message convention of `(code)summary`, for example
//! `(10401)internal server error`. Errors violating the convention are
//! rewritten so every outbound message carries the shape.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use axum::http::StatusCode;

use crate::status::code::RpcCode;
use crate::status::INVALID_ERR_FORMAT_ERR;

static CODE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // First parenthesized group anywhere in the message.
    Regex::new(r"\(([^)]+)\)").unwrap()
});

/// A backend failure: coarse RPC status plus human message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct RpcError {
    pub code: RpcCode,
    pub message: String,
}

impl RpcError {
    pub fn new(code: RpcCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Coerce an arbitrary error into the transcoding error shape.
    ///
    /// Errors that do not already carry a recognized RPC status become
    /// invalid-argument with the original text as message.
    pub fn coerce(err: &(dyn std::error::Error + 'static)) -> Self {
        match err.downcast_ref::<Self>() {
            Some(rpc) => rpc.clone(),
            None => Self::new(RpcCode::InvalidArgument, err.to_string()),
        }
    }
}

/// Result of translating one backend outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOutcome {
    /// HTTP status to emit (forced to 200 under `ihc`).
    pub http: StatusCode,
    /// RPC status after any invalid-format rewrite.
    pub code: RpcCode,
    /// Application error code recovered from the message; 0 on success.
    pub app_code: i64,
    /// Normalized error, `None` on success.
    pub error: Option<RpcError>,
}

impl StatusOutcome {
    fn ok() -> Self {
        Self {
            http: StatusCode::OK,
            code: RpcCode::Ok,
            app_code: 0,
            error: None,
        }
    }
}

/// Extract the leading `(code)` token; `None` when absent or non-numeric.
fn extract_app_code(message: &str) -> Option<i64> {
    CODE_PATTERN
        .captures(message)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

/// Map a backend outcome to HTTP status, app error code and normalized error.
///
/// `ignore_http_status` (the `ihc` query flag) pins the HTTP status to 200
/// so clients that cannot branch on transport status can still branch on
/// the body's error code; the body is unaffected.
pub fn translate(error: Option<&RpcError>, ignore_http_status: bool) -> StatusOutcome {
    let Some(err) = error else {
        return StatusOutcome::ok();
    };
    if err.code == RpcCode::Ok {
        return StatusOutcome::ok();
    }

    let mut code = err.code;
    let mut message = err.message.clone();
    let mut app_code = extract_app_code(&message).unwrap_or(0);

    if app_code == 0 {
        // Convention violation: force the shape so the client always sees
        // a parseable code.
        message = format!("({INVALID_ERR_FORMAT_ERR}){message}");
        code = RpcCode::InvalidArgument;
        app_code = INVALID_ERR_FORMAT_ERR;
    }

    let http = if ignore_http_status {
        StatusCode::OK
    } else {
        code.http_status()
    };

    StatusOutcome {
        http,
        code,
        app_code,
        error: Some(RpcError::new(code, message)),
    }
}
