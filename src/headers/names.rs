//! Header and query-parameter names recognized at the trust boundary.
//!
//! Names are compared case-insensitively and propagated lowercase.

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_FORWARDED_HOST: &str = "x-forwarded-host";
pub const X_AUTH_TOKEN: &str = "x-auth-token";
pub const X_SUB_TOKEN: &str = "x-sub-token";
pub const ACCEPT_LANGUAGE: &str = "accept-language";
pub const APP_ID: &str = "paasport-app-id";
pub const SUB_APP_ID: &str = "paasport-sub-app-id";
pub const DEVICE_ID: &str = "paasport-device-id";
pub const SUB_DEVICE_ID: &str = "paasport-sub-device-id";
pub const DEVICE_NAME: &str = "paasport-device-name";
pub const SUB_DEVICE_NAME: &str = "paasport-sub-device-name";
pub const REGION: &str = "paasport-region";
pub const USER_AGENT: &str = "user-agent";
pub const CLIENT_USER_AGENT: &str = "client-user-agent";
pub const AUTHORIZATION: &str = "authorization";
pub const TRACE_ID: &str = "paasport-trace-id";
pub const ACCOUNT_ID: &str = "paasport-account-id";
pub const TERMINAL_TYPE: &str = "paasport-terminal-type";
pub const TENANT_NAME: &str = "paasport-tenant-name";
pub const SUB_TENANT_NAME: &str = "paasport-sub-tenant-name";
pub const PROJECT_NAME: &str = "paasport-project-name";
pub const REQUEST_METHOD: &str = "paasport-request-method";
pub const REFERER: &str = "referer";
pub const CONTENT_TYPE: &str = "content-type";

/// Tracing header families passed through by prefix.
pub const X_B3_PREFIX: &str = "x-b3";
pub const X_ENVOY_PREFIX: &str = "x-envoy";
pub const X_REQUEST_PREFIX: &str = "x-request";

/// Headers copied across the trust boundary verbatim.
pub const ALLOW_LIST: &[&str] = &[
    X_FORWARDED_FOR,
    X_FORWARDED_HOST,
    X_AUTH_TOKEN,
    X_SUB_TOKEN,
    APP_ID,
    SUB_APP_ID,
    DEVICE_ID,
    SUB_DEVICE_ID,
    DEVICE_NAME,
    SUB_DEVICE_NAME,
    REGION,
    USER_AGENT,
    AUTHORIZATION,
    ACCEPT_LANGUAGE,
    TERMINAL_TYPE,
    REFERER,
    TENANT_NAME,
    SUB_TENANT_NAME,
];

/// Fields fed to the request signature, in signing order.
///
/// The order is part of the signature contract and must not change.
pub const SIGN_LIST: &[&str] = &[
    X_SUB_TOKEN,
    APP_ID,
    DEVICE_ID,
    REGION,
    SUB_APP_ID,
    SUB_DEVICE_ID,
    TERMINAL_TYPE,
];

/// Query parameters recognized by the gateway.
pub const TIMESTAMP_QUERY_PARAM: &str = "time";
pub const LANGUAGE_QUERY_PARAM: &str = "lang";
pub const BODY_IN_ONEBOX_PARAM: &str = "onebox";
pub const IGNORE_HTTP_CODE_PARAM: &str = "ihc";
pub const SIGN_NONCE_PARAM: &str = "sign_nonce";

/// True when a header may cross the trust boundary.
pub fn is_allowed(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    if ALLOW_LIST.contains(&lower.as_str()) {
        return true;
    }
    lower.starts_with(X_B3_PREFIX)
        || lower.starts_with(X_ENVOY_PREFIX)
        || lower.starts_with(X_REQUEST_PREFIX)
}
