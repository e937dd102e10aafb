//! Outcome rendering into wire bytes and response headers.

use axum::http::{HeaderMap, HeaderValue, StatusCode};
use thiserror::Error;

use crate::envelope::body::{ErrBody, Reply, RespBody};
use crate::headers::names;
use crate::status::{translate, RpcError};

/// Content type for every rendered body.
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

/// Rendering failures; fatal for the request only.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("response serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Per-request rendering inputs derived before the body is built.
#[derive(Debug, Clone, Copy)]
pub struct RenderParams<'a> {
    /// Enveloped mode, selected by the `onebox` query flag.
    pub onebox: bool,
    /// Force HTTP 200, selected by the `ihc` query flag.
    pub ignore_http_status: bool,
    /// Echoed from the trace-id stamped by the header guard.
    pub request_id: &'a str,
    /// Echoed from the request-method field stamped by the header guard.
    pub request_method: &'a str,
}

/// One rendered response: exactly one of these reaches the wire per request.
#[derive(Debug)]
pub struct Rendered {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

fn set_header(headers: &mut HeaderMap, name: &'static str, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(name, value);
    }
}

/// Render the outcome of one request.
///
/// Mode matrix:
/// - error, flat: the flat error shape at the translated status
/// - error, onebox: the envelope with `success: false` at the translated
///   status
/// - success, onebox: the envelope wrapping the payload, message "SUCCESS"
/// - success, flat: the raw payload
pub fn render(
    params: RenderParams<'_>,
    payload: Option<&Reply>,
    error: Option<&RpcError>,
) -> Result<Rendered, EnvelopeError> {
    let mut headers = HeaderMap::new();
    set_header(&mut headers, names::CONTENT_TYPE, CONTENT_TYPE_JSON);
    set_header(&mut headers, names::TRACE_ID, params.request_id);
    set_header(&mut headers, names::REQUEST_METHOD, params.request_method);

    // Token-refresh responses update the client credential transparently.
    if let Some(token) = payload.and_then(|r| r.refreshed_token.as_deref()) {
        set_header(&mut headers, names::X_AUTH_TOKEN, token);
        set_header(&mut headers, names::AUTHORIZATION, token);
    }

    let outcome = translate(error, params.ignore_http_status);
    let data = payload.map(|r| &r.data);

    let body = if let Some(err) = &outcome.error {
        if !params.onebox {
            // Flat error only; the envelope is never emitted here.
            serde_json::to_vec(&ErrBody {
                code: outcome.code.as_i32(),
                err_code: outcome.app_code,
                message: &err.message,
                request_id: params.request_id,
                request_method: params.request_method,
            })?
        } else {
            serde_json::to_vec(&RespBody {
                err_code: outcome.app_code,
                message: &err.message,
                status: outcome.http.as_u16(),
                data,
                request_id: params.request_id,
                request_method: params.request_method,
                success: false,
            })?
        }
    } else if params.onebox {
        serde_json::to_vec(&RespBody {
            err_code: 0,
            message: "SUCCESS",
            status: outcome.http.as_u16(),
            data,
            request_id: params.request_id,
            request_method: params.request_method,
            success: true,
        })?
    } else {
        serde_json::to_vec(data.unwrap_or(&serde_json::Value::Null))?
    };

    Ok(Rendered {
        status: outcome.http,
        headers,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::RpcCode;
    use serde_json::json;

    fn params(onebox: bool, ihc: bool) -> RenderParams<'static> {
        RenderParams {
            onebox,
            ignore_http_status: ihc,
            request_id: "",
            request_method: "",
        }
    }

    fn body_str(rendered: &Rendered) -> &str {
        std::str::from_utf8(&rendered.body).unwrap()
    }

    #[test]
    fn test_success_flat_is_raw_payload() {
        let reply = Reply::new(json!({"id": "42"}));
        let rendered = render(params(false, false), Some(&reply), None).unwrap();
        assert_eq!(rendered.status, StatusCode::OK);
        assert_eq!(body_str(&rendered), r#"{"id":"42"}"#);
        assert_eq!(
            rendered.headers.get(names::CONTENT_TYPE).unwrap(),
            CONTENT_TYPE_JSON
        );
    }

    #[test]
    fn test_success_onebox_is_enveloped() {
        let reply = Reply::new(json!({"id": "42"}));
        let rendered = render(params(true, false), Some(&reply), None).unwrap();
        assert_eq!(rendered.status, StatusCode::OK);
        assert_eq!(
            body_str(&rendered),
            r#"{"errCode":0,"errMessage":"SUCCESS","status":200,"data":{"id":"42"},"request_id":"","request_method":"","success":true}"#
        );
    }

    #[test]
    fn test_error_flat_shape_and_status() {
        let err = RpcError::new(RpcCode::NotFound, "(10409)user not found");
        let rendered = render(params(false, false), None, Some(&err)).unwrap();
        assert_eq!(rendered.status, StatusCode::NOT_FOUND);
        assert_eq!(
            body_str(&rendered),
            r#"{"code":5,"err_code":10409,"message":"(10409)user not found","request_id":"","request_method":""}"#
        );
    }

    #[test]
    fn test_error_onebox_enveloped_with_rewrite() {
        let err = RpcError::new(RpcCode::Internal, "boom");
        let rendered = render(params(true, false), None, Some(&err)).unwrap();
        assert_eq!(rendered.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body_str(&rendered),
            r#"{"errCode":10408,"errMessage":"(10408)boom","status":400,"request_id":"","request_method":"","success":false}"#
        );
    }

    #[test]
    fn test_ihc_forces_200_body_untouched() {
        let err = RpcError::new(RpcCode::Unavailable, "(10410)maintenance");
        let rendered = render(params(false, true), None, Some(&err)).unwrap();
        assert_eq!(rendered.status, StatusCode::OK);
        assert!(body_str(&rendered).contains("\"err_code\":10410"));
    }

    #[test]
    fn test_refreshed_token_stamped_on_both_headers() {
        let reply = Reply::with_token(json!({"ok": true}), "t-456");
        let rendered = render(params(false, false), Some(&reply), None).unwrap();
        assert_eq!(rendered.headers.get(names::X_AUTH_TOKEN).unwrap(), "t-456");
        assert_eq!(rendered.headers.get(names::AUTHORIZATION).unwrap(), "t-456");
    }

    #[test]
    fn test_request_id_and_method_echoed() {
        let reply = Reply::new(json!({}));
        let p = RenderParams {
            onebox: true,
            ignore_http_status: false,
            request_id: "trace-1",
            request_method: "Login",
        };
        let rendered = render(p, Some(&reply), None).unwrap();
        assert_eq!(rendered.headers.get(names::TRACE_ID).unwrap(), "trace-1");
        assert_eq!(
            rendered.headers.get(names::REQUEST_METHOD).unwrap(),
            "Login"
        );
        assert!(body_str(&rendered).contains(r#""request_id":"trace-1""#));
    }

    #[test]
    fn test_success_flat_without_payload_is_null() {
        let rendered = render(params(false, false), None, None).unwrap();
        assert_eq!(body_str(&rendered), "null");
    }
}
