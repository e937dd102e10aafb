//! Versioned route table and template resolution.
//!
//! # Responsibilities
//! - Group bindings by API version (first path segment, e.g. "/a1")
//! - Enforce (method, path) uniqueness within a version on insert
//! - Resolve (path, method) to a binding plus extracted path parameters
//! - Distinguish "path known, verb not" from "no such path"

use std::collections::HashMap;

use axum::http::Method;
use thiserror::Error;

use crate::binding::rule::Binding;

/// Routing and registration failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// No template matched the request path.
    #[error("no route for path '{path}'")]
    NotFound { path: String },

    /// A template matched the path, but under a different verb.
    #[error("method '{method}' not allowed on '{path}'")]
    MethodNotAllowed { path: String, method: Method },

    /// The version group was never registered.
    #[error("version '{version}' not registered")]
    VersionNotFound { version: String },

    /// (method, path) already registered within the version.
    #[error("route {method} '{path}' already registered in version '{version}'")]
    Conflict {
        version: String,
        method: Method,
        path: String,
    },
}

/// Immutable-once-built set of bindings, grouped by version.
///
/// Reads run under shared access on every dispatch; mutation happens at
/// startup and on dynamic add/remove behind the dispatcher's lock.
#[derive(Debug, Default)]
pub struct RouteTable {
    /// Version key → bindings in registration order (first match wins).
    versions: HashMap<String, Vec<Binding>>,
}

/// A declared version normalized to a route-group key.
///
/// Empty maps to the root group "/"; otherwise a leading slash is ensured
/// so "a1" and "/a1" name the same group.
fn group_key(version: &str) -> String {
    if version.is_empty() || version == "/" {
        "/".to_string()
    } else if version.starts_with('/') {
        version.to_string()
    } else {
        format!("/{version}")
    }
}

/// Match a concrete path against a `{name}` template, per segment.
///
/// Returns the captured parameters in template order; repeated names are
/// all kept so later merging sees every value.
fn match_template(template: &str, path: &str) -> Option<Vec<(String, String)>> {
    let tpl: Vec<&str> = template.split('/').filter(|s| !s.is_empty()).collect();
    let got: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if tpl.len() != got.len() {
        return None;
    }
    let mut params = Vec::new();
    for (t, g) in tpl.iter().zip(got.iter()) {
        if let Some(name) = t.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            params.push((name.to_string(), (*g).to_string()));
        } else if t != g {
            return None;
        }
    }
    Some(params)
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding; duplicate (method, path) within the version is
    /// an error rather than a silent overwrite.
    pub fn insert(&mut self, binding: Binding) -> Result<(), RouteError> {
        let key = group_key(&binding.version);
        let group = self.versions.entry(key.clone()).or_default();
        if group
            .iter()
            .any(|b| b.method == binding.method && b.path == binding.path)
        {
            return Err(RouteError::Conflict {
                version: key,
                method: binding.method,
                path: binding.path,
            });
        }
        tracing::debug!(
            version = %key,
            method = %binding.method,
            path = %binding.path,
            operation = %binding.operation,
            "route registered"
        );
        group.push(binding);
        Ok(())
    }

    /// Register with last-wins semantics; returns the displaced binding.
    pub fn replace(&mut self, binding: Binding) -> Option<Binding> {
        let key = group_key(&binding.version);
        let group = self.versions.entry(key).or_default();
        let displaced = group
            .iter()
            .position(|b| b.method == binding.method && b.path == binding.path)
            .map(|idx| group.remove(idx));
        group.push(binding);
        displaced
    }

    /// Remove one binding by its registration key.
    pub fn remove(
        &mut self,
        version: &str,
        path: &str,
        method: &Method,
    ) -> Result<Binding, RouteError> {
        let key = group_key(version);
        let group = self
            .versions
            .get_mut(&key)
            .ok_or_else(|| RouteError::VersionNotFound {
                version: key.clone(),
            })?;
        let idx = group
            .iter()
            .position(|b| b.method == *method && b.path == path)
            .ok_or_else(|| RouteError::NotFound {
                path: path.to_string(),
            })?;
        Ok(group.remove(idx))
    }

    /// Exact lookup by registration key, no template matching.
    pub fn get(&self, version: &str, path: &str, method: &Method) -> Option<&Binding> {
        self.versions
            .get(&group_key(version))?
            .iter()
            .find(|b| b.method == *method && b.path == path)
    }

    /// Resolve an incoming (path, method) to a binding and its path
    /// parameters.
    ///
    /// The first path segment selects the version group when one is
    /// registered under it; otherwise the root group sees the full path.
    pub fn resolve(
        &self,
        path: &str,
        method: &Method,
    ) -> Result<(&Binding, Vec<(String, String)>), RouteError> {
        let (group, local_path) = self.select_group(path);
        let Some(group) = group else {
            return Err(RouteError::NotFound {
                path: path.to_string(),
            });
        };

        let mut verb_mismatch = false;
        for binding in group {
            if let Some(params) = match_template(&binding.path, local_path) {
                if binding.method == *method {
                    return Ok((binding, params));
                }
                verb_mismatch = true;
            }
        }
        if verb_mismatch {
            Err(RouteError::MethodNotAllowed {
                path: path.to_string(),
                method: method.clone(),
            })
        } else {
            Err(RouteError::NotFound {
                path: path.to_string(),
            })
        }
    }

    fn select_group<'a, 'p>(&'a self, path: &'p str) -> (Option<&'a Vec<Binding>>, &'p str) {
        let trimmed = path.trim_start_matches('/');
        if let Some(first) = trimmed.split('/').next() {
            if !first.is_empty() {
                let key = format!("/{first}");
                if let Some(group) = self.versions.get(&key) {
                    return (Some(group), &trimmed[first.len()..]);
                }
            }
        }
        (self.versions.get("/"), path)
    }

    /// Registered bindings across all versions.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.versions.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.versions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
