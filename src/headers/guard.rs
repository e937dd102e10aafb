//! Inbound header filtering and derivation.
//!
//! # Responsibilities
//! - Copy allow-listed headers into the propagated set, lowercased
//! - Always carry the auth-token, trace-id and request-method fields
//! - Resolve device-name (user-agent fallback, percent-decoding)
//! - Derive device-id from device-name when absent
//! - Stamp the service's own identity
//! - Produce the ordered signing subset

use std::collections::btree_map;
use std::collections::BTreeMap;

use axum::http::HeaderMap;
use md5::{Digest, Md5};
use percent_encoding::percent_decode_str;

use crate::headers::names;

/// Sanitized headers forwarded with the backend invocation.
///
/// Backed by an ordered map so repeated sanitization of identical input
/// yields an identical mapping, iteration order included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagatedHeaders {
    inner: BTreeMap<String, String>,
}

impl PropagatedHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.inner.insert(name.to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Field value, or the empty string when the field is absent.
    pub fn value(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(&name.to_ascii_lowercase())
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<'a> IntoIterator for &'a PropagatedHeaders {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

/// First value of a header as a string, empty when absent or not UTF-8.
fn read(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

/// Filter and derive the propagated header set for one request.
///
/// Total and deterministic: never fails, and identical input headers plus
/// an identical `lang` override produce an identical mapping.
pub fn sanitize(headers: &HeaderMap, lang: Option<&str>, service_name: &str) -> PropagatedHeaders {
    tracing::debug!(count = headers.len(), "sanitizing inbound headers");
    let mut out = PropagatedHeaders::new();

    for name in headers.keys() {
        if names::is_allowed(name.as_str()) {
            out.set(name.as_str(), read(headers, name.as_str()));
        }
    }

    // Always carried, even when empty, so downstream lookups never miss.
    out.set(names::X_AUTH_TOKEN, read(headers, names::X_AUTH_TOKEN));
    out.set(names::REQUEST_METHOD, read(headers, names::REQUEST_METHOD));
    out.set(names::TRACE_ID, read(headers, names::TRACE_ID));

    let device_name = read(headers, names::DEVICE_NAME);
    if device_name.is_empty() {
        out.set(names::DEVICE_NAME, read(headers, names::USER_AGENT));
    } else {
        // Non-ASCII device names arrive percent-encoded; keep the raw value
        // when decoding fails.
        match percent_decode_str(&device_name).decode_utf8() {
            Ok(decoded) => out.set(names::DEVICE_NAME, decoded.into_owned()),
            Err(_) => out.set(names::DEVICE_NAME, device_name),
        }
    }

    // An explicit query-parameter language wins over the header.
    if let Some(lang) = lang {
        if !lang.is_empty() {
            out.set(names::ACCEPT_LANGUAGE, lang);
        }
    }

    // Bearer-style precedence for a generic Authorization header.
    let auth = read(headers, names::AUTHORIZATION);
    if !auth.is_empty() {
        out.set(names::X_AUTH_TOKEN, auth);
    }

    if out.value(names::DEVICE_ID).is_empty() && !out.value(names::DEVICE_NAME).is_empty() {
        let derived = md5_hex(out.value(names::DEVICE_NAME));
        out.set(names::DEVICE_ID, derived);
    }

    // Republish the raw user-agent under its own name; the device-name slot
    // above may have rewritten it.
    out.set(names::CLIENT_USER_AGENT, read(headers, names::USER_AGENT));

    // Stamped server-side; not readable from any inbound header.
    out.set(names::PROJECT_NAME, service_name);

    out
}

/// The ordered field subset consumed by the signing collaborator.
///
/// Order follows [`names::SIGN_LIST`]; signature computation is
/// order-sensitive. Absent fields are omitted rather than defaulted: an
/// injected default would not match the signature of a client that left
/// the field out.
pub fn sign_subset(headers: &PropagatedHeaders) -> Vec<(&'static str, String)> {
    names::SIGN_LIST
        .iter()
        .filter_map(|&name| headers.get(name).map(|v| (name, v.to_string())))
        .collect()
}

/// Lowercase hex MD5 digest.
///
/// Pinned: existing clients derive device ids with this exact algorithm
/// and digest format.
pub fn md5_hex(data: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}
