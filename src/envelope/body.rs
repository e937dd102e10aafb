//! Wire shapes and the backend reply carrier.

use serde::Serialize;
use serde_json::Value;

/// Enveloped response shape (`onebox` mode), used for success and error.
#[derive(Debug, Serialize)]
pub struct RespBody<'a> {
    #[serde(rename = "errCode")]
    pub err_code: i64,
    #[serde(rename = "errMessage")]
    pub message: &'a str,
    /// Translated HTTP status, duplicated into the body.
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<&'a Value>,
    pub request_id: &'a str,
    pub request_method: &'a str,
    pub success: bool,
}

/// Flat error shape, emitted when `onebox` is off.
#[derive(Debug, Serialize)]
pub struct ErrBody<'a> {
    /// RPC status as its wire integer.
    pub code: i32,
    pub err_code: i64,
    pub message: &'a str,
    pub request_id: &'a str,
    pub request_method: &'a str,
}

/// Declares that a response payload carries a refreshed credential.
///
/// Replaces the original's by-name field reflection: payload types opt in
/// explicitly and the renderer never inspects types at runtime.
pub trait TokenBearer {
    fn refreshed_token(&self) -> Option<&str> {
        None
    }
}

/// One backend reply: the JSON payload plus the explicitly-declared
/// refreshed credential, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply {
    pub data: Value,
    pub refreshed_token: Option<String>,
}

impl Reply {
    pub fn new(data: Value) -> Self {
        Self {
            data,
            refreshed_token: None,
        }
    }

    pub fn with_token(data: Value, token: impl Into<String>) -> Self {
        Self {
            data,
            refreshed_token: Some(token.into()),
        }
    }

    /// Build a reply from a typed payload, pulling the credential through
    /// the [`TokenBearer`] capability.
    pub fn from_payload<P>(payload: &P) -> Result<Self, serde_json::Error>
    where
        P: Serialize + TokenBearer,
    {
        Ok(Self {
            data: serde_json::to_value(payload)?,
            refreshed_token: payload.refreshed_token().map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct LoginResponse {
        account: String,
        token: String,
    }

    impl TokenBearer for LoginResponse {
        fn refreshed_token(&self) -> Option<&str> {
            Some(&self.token)
        }
    }

    #[derive(Serialize)]
    struct PlainResponse {
        id: String,
    }

    impl TokenBearer for PlainResponse {}

    #[test]
    fn test_reply_from_token_bearer() {
        let payload = LoginResponse {
            account: "ada".into(),
            token: "t-123".into(),
        };
        let reply = Reply::from_payload(&payload).unwrap();
        assert_eq!(reply.refreshed_token.as_deref(), Some("t-123"));
        assert_eq!(reply.data, json!({"account": "ada", "token": "t-123"}));
    }

    #[test]
    fn test_reply_without_capability() {
        let payload = PlainResponse { id: "42".into() };
        let reply = Reply::from_payload(&payload).unwrap();
        assert!(reply.refreshed_token.is_none());
    }

    #[test]
    fn test_envelope_field_names() {
        let data = json!({"id": "42"});
        let body = RespBody {
            err_code: 0,
            message: "SUCCESS",
            status: 200,
            data: Some(&data),
            request_id: "",
            request_method: "",
            success: true,
        };
        let rendered = serde_json::to_string(&body).unwrap();
        assert_eq!(
            rendered,
            r#"{"errCode":0,"errMessage":"SUCCESS","status":200,"data":{"id":"42"},"request_id":"","request_method":"","success":true}"#
        );
    }

    #[test]
    fn test_envelope_omits_absent_data() {
        let body = RespBody {
            err_code: 10401,
            message: "(10401)internal server error",
            status: 500,
            data: None,
            request_id: "r1",
            request_method: "GET",
            success: false,
        };
        let rendered = serde_json::to_string(&body).unwrap();
        assert!(!rendered.contains("\"data\""));
    }

    #[test]
    fn test_flat_error_field_names() {
        let body = ErrBody {
            code: 5,
            err_code: 10409,
            message: "(10409)user not found",
            request_id: "r1",
            request_method: "GET",
        };
        let rendered = serde_json::to_string(&body).unwrap();
        assert_eq!(
            rendered,
            r#"{"code":5,"err_code":10409,"message":"(10409)user not found","request_id":"r1","request_method":"GET"}"#
        );
    }
}
