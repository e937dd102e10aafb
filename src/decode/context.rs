//! Per-request state owned by one unit of work.

use axum::body::Bytes;
use axum::http::{HeaderMap, Method};

use crate::binding::Binding;
use crate::headers::names;

/// Parsed query string, order preserved, repeated names kept.
#[derive(Debug, Clone, Default)]
pub struct QueryMap {
    pairs: Vec<(String, String)>,
}

impl QueryMap {
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();
        Self { pairs }
    }

    /// First value for the name, when present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All values for the name, in query order.
    pub fn all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Flag semantics: present with a non-empty value.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Everything one request needs past routing: the raw parts, the cached
/// body (the stream is single-read and may be read twice), the resolved
/// path parameters and the selected binding. Dropped at end of request.
#[derive(Debug)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub query: QueryMap,
    pub body: Bytes,
    /// Captured template parameters, ordered, repeats kept.
    pub path_params: Vec<(String, String)>,
    pub binding: Binding,
}

impl RequestContext {
    /// Query parameter value, empty when absent.
    pub fn query_parameter(&self, name: &str) -> &str {
        self.query.get(name).unwrap_or("")
    }

    /// First body form field with the name, re-read from the cached buffer.
    pub fn body_parameter(&self, name: &str) -> Option<String> {
        url::form_urlencoded::parse(&self.body)
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    /// `onebox` flag: enveloped response mode.
    pub fn onebox(&self) -> bool {
        self.query.flag(names::BODY_IN_ONEBOX_PARAM)
    }

    /// `ihc` flag: force HTTP 200 regardless of the mapped status.
    pub fn ignore_http_status(&self) -> bool {
        self.query.flag(names::IGNORE_HTTP_CODE_PARAM)
    }

    /// `lang` override consumed by the header guard.
    pub fn lang(&self) -> Option<&str> {
        self.query.get(names::LANGUAGE_QUERY_PARAM)
    }

    /// Opaque signing nonce, passed through to the signing collaborator.
    pub fn sign_nonce(&self) -> Option<&str> {
        self.query.get(names::SIGN_NONCE_PARAM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::HttpRule;

    fn context(query: Option<&str>, body: &str) -> RequestContext {
        RequestContext {
            method: Method::POST,
            path: "/a1/users".to_string(),
            headers: HeaderMap::new(),
            query: QueryMap::parse(query),
            body: Bytes::from(body.to_string()),
            path_params: Vec::new(),
            binding: Binding::from_rule("Op", &HttpRule::post("/users")).unwrap(),
        }
    }

    #[test]
    fn test_query_first_and_all() {
        let q = QueryMap::parse(Some("a=1&b=2&a=3"));
        assert_eq!(q.get("a"), Some("1"));
        assert_eq!(q.all("a"), vec!["1", "3"]);
        assert_eq!(q.get("missing"), None);
    }

    #[test]
    fn test_flag_requires_non_empty_value() {
        let q = QueryMap::parse(Some("onebox=1&ihc="));
        assert!(q.flag("onebox"));
        assert!(!q.flag("ihc"));
        assert!(!q.flag("absent"));
    }

    #[test]
    fn test_query_percent_decoding() {
        let q = QueryMap::parse(Some("lang=zh%2DCN&name=a%20b"));
        assert_eq!(q.get("lang"), Some("zh-CN"));
        assert_eq!(q.get("name"), Some("a b"));
    }

    #[test]
    fn test_body_parameter_rereads_buffer() {
        let ctx = context(None, "grant_type=token&scope=all");
        assert_eq!(ctx.body_parameter("grant_type"), Some("token".to_string()));
        assert_eq!(ctx.body_parameter("scope"), Some("all".to_string()));
        assert_eq!(ctx.body_parameter("missing"), None);
        // A second read sees the same buffer.
        assert_eq!(ctx.body_parameter("grant_type"), Some("token".to_string()));
    }

    #[test]
    fn test_request_flags() {
        let ctx = context(Some("onebox=1&ihc=1&lang=fr&sign_nonce=n1"), "");
        assert!(ctx.onebox());
        assert!(ctx.ignore_http_status());
        assert_eq!(ctx.lang(), Some("fr"));
        assert_eq!(ctx.sign_nonce(), Some("n1"));
    }
}
