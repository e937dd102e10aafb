//! Merging query, path and body sources into one request value.

use std::collections::BTreeMap;

use axum::http::Method;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::decode::context::RequestContext;
use crate::headers::names;

/// Structural decoding failures.
///
/// These carry no `(code)` prefix; the status translator rewrites them
/// into the reserved invalid-format code on the way out.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Body bytes did not decode under the declared content type.
    #[error("malformed request body: {0}")]
    Body(String),

    /// Query/path overlay requires a JSON object body.
    #[error("request body must be a JSON object")]
    BodyShape,

    /// The merged value does not fit the typed request.
    #[error("request does not match the expected shape: {0}")]
    Structure(String),
}

/// Decode one request into a JSON object per the binding's verb.
///
/// GET/DELETE/HEAD read query and path parameters only. Other verbs decode
/// the buffered body first and then overlay query/path values, so a field
/// name satisfiable by either source resolves to the query/path value.
pub fn decode(ctx: &RequestContext) -> Result<Value, DecodeError> {
    match ctx.method {
        Method::GET | Method::DELETE | Method::HEAD => Ok(Value::Object(parameter_object(ctx))),
        _ => {
            let mut base = decode_body(ctx)?;
            let overlay = parameter_object(ctx);
            if overlay.is_empty() {
                return Ok(base);
            }
            match &mut base {
                Value::Object(map) => {
                    for (key, value) in overlay {
                        map.insert(key, value);
                    }
                    Ok(base)
                }
                Value::Null => Ok(Value::Object(overlay)),
                _ => Err(DecodeError::BodyShape),
            }
        }
    }
}

/// Decode into a typed request on top of the JSON merge.
pub fn decode_as<T: DeserializeOwned>(ctx: &RequestContext) -> Result<T, DecodeError> {
    serde_json::from_value(decode(ctx)?).map_err(|e| DecodeError::Structure(e.to_string()))
}

/// Body per declared content type: urlencoded forms or JSON (default).
fn decode_body(ctx: &RequestContext) -> Result<Value, DecodeError> {
    if ctx.body.is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    let content_type = ctx
        .headers
        .get(names::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if content_type.contains("x-www-form-urlencoded") {
        let mut multi: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in url::form_urlencoded::parse(&ctx.body) {
            multi.entry(key.into_owned()).or_default().push(value.into_owned());
        }
        Ok(Value::Object(object_from_multi(multi)))
    } else {
        serde_json::from_slice(&ctx.body).map_err(|e| DecodeError::Body(e.to_string()))
    }
}

/// Query and path parameters as one JSON object.
///
/// Both sources are collected into multi-value maps first, so repeated
/// names (repeated query keys, repeated path segments) never silently
/// overwrite each other; a name present in both sources resolves to the
/// path values.
fn parameter_object(ctx: &RequestContext) -> Map<String, Value> {
    let mut multi: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in ctx.query.iter() {
        multi.entry(key.to_string()).or_default().push(value.to_string());
    }

    let mut path_multi: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in &ctx.path_params {
        path_multi.entry(key.clone()).or_default().push(value.clone());
    }
    for (key, values) in path_multi {
        multi.insert(key, values);
    }

    object_from_multi(multi)
}

fn object_from_multi(multi: BTreeMap<String, Vec<String>>) -> Map<String, Value> {
    let mut object = Map::new();
    for (key, mut values) in multi {
        let value = if values.len() == 1 {
            Value::String(values.remove(0))
        } else {
            Value::Array(values.into_iter().map(Value::String).collect())
        };
        object.insert(key, value);
    }
    object
}
