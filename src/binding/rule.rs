//! Binding construction from declarative HTTP rules.

use axum::http::Method;

/// Exactly one verb/path pair per rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulePattern {
    Get(String),
    Put(String),
    Post(String),
    Patch(String),
    Delete(String),
    Head(String),
}

impl RulePattern {
    fn verb_and_path(&self) -> (Method, &str) {
        match self {
            Self::Get(p) => (Method::GET, p),
            Self::Put(p) => (Method::PUT, p),
            Self::Post(p) => (Method::POST, p),
            Self::Patch(p) => (Method::PATCH, p),
            Self::Delete(p) => (Method::DELETE, p),
            Self::Head(p) => (Method::HEAD, p),
        }
    }
}

/// Declarative HTTP annotation attached to one RPC operation.
///
/// An operation without a rule (or with an empty path) contributes no
/// binding and is simply excluded from the route list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpRule {
    pub pattern: Option<RulePattern>,
    pub doc: String,
    pub version: String,
    pub metadata: Vec<(String, String)>,
}

impl HttpRule {
    pub fn get(path: impl Into<String>) -> Self {
        Self::with_pattern(RulePattern::Get(path.into()))
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::with_pattern(RulePattern::Put(path.into()))
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::with_pattern(RulePattern::Post(path.into()))
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::with_pattern(RulePattern::Patch(path.into()))
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::with_pattern(RulePattern::Delete(path.into()))
    }

    pub fn head(path: impl Into<String>) -> Self {
        Self::with_pattern(RulePattern::Head(path.into()))
    }

    fn with_pattern(pattern: RulePattern) -> Self {
        Self {
            pattern: Some(pattern),
            ..Self::default()
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn metadata(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((field.into(), value.into()));
        self
    }
}

/// One RPC operation bound to one HTTP verb, path template and version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub method: Method,
    pub path: String,
    /// Route-group key; empty means the root group "/".
    pub version: String,
    pub doc: String,
    pub operation: String,
    /// Free-form pairs, order preserved from the rule.
    pub metadata: Vec<(String, String)>,
}

impl Binding {
    /// Build the binding for one operation; `None` when the rule carries
    /// no pattern or an empty path.
    pub fn from_rule(operation: impl Into<String>, rule: &HttpRule) -> Option<Self> {
        let pattern = rule.pattern.as_ref()?;
        let (method, path) = pattern.verb_and_path();
        if path.is_empty() {
            return None;
        }
        let metadata = rule
            .metadata
            .iter()
            .filter(|(field, value)| !field.is_empty() && !value.is_empty())
            .cloned()
            .collect();
        Some(Self {
            method,
            path: path.to_string(),
            version: rule.version.clone(),
            doc: rule.doc.clone(),
            operation: operation.into(),
            metadata,
        })
    }
}

/// Build bindings for a list of operations, preserving declaration order.
pub fn collect_bindings<I, S>(operations: I) -> Vec<Binding>
where
    I: IntoIterator<Item = (S, HttpRule)>,
    S: Into<String>,
{
    operations
        .into_iter()
        .filter_map(|(operation, rule)| Binding::from_rule(operation, &rule))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rule_each_verb() {
        let cases = [
            (HttpRule::get("/users"), Method::GET),
            (HttpRule::put("/users"), Method::PUT),
            (HttpRule::post("/users"), Method::POST),
            (HttpRule::patch("/users"), Method::PATCH),
            (HttpRule::delete("/users"), Method::DELETE),
            (HttpRule::head("/users"), Method::HEAD),
        ];
        for (rule, method) in cases {
            let binding = Binding::from_rule("Op", &rule).unwrap();
            assert_eq!(binding.method, method);
            assert_eq!(binding.path, "/users");
        }
    }

    #[test]
    fn test_empty_path_drops_binding() {
        assert!(Binding::from_rule("Op", &HttpRule::get("")).is_none());
        assert!(Binding::from_rule("Op", &HttpRule::default()).is_none());
    }

    #[test]
    fn test_metadata_filters_empty_pairs() {
        let rule = HttpRule::get("/users")
            .metadata("auth", "required")
            .metadata("", "dropped")
            .metadata("dropped", "");
        let binding = Binding::from_rule("ListUsers", &rule).unwrap();
        assert_eq!(binding.metadata, vec![("auth".into(), "required".into())]);
    }

    #[test]
    fn test_collect_preserves_order() {
        let bindings = collect_bindings([
            ("First", HttpRule::get("/a")),
            ("Skipped", HttpRule::default()),
            ("Second", HttpRule::post("/b").version("/a1")),
        ]);
        let names: Vec<&str> = bindings.iter().map(|b| b.operation.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
        assert_eq!(bindings[1].version, "/a1");
    }
}
