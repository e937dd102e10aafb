//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::binding::{Binding, HttpRule};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Service identity stamped into propagated headers.
    pub service_name: String,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Declarative route bindings, registered at startup.
    pub routes: Vec<RouteSpec>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// End-to-end request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Maximum buffered request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default tracing filter when RUST_LOG is unset.
    pub log_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "restgate=debug,tower_http=debug".to_string(),
        }
    }
}

/// One declarative route binding, the configuration-file analog of an
/// operation's HTTP rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteSpec {
    /// HTTP verb: GET, PUT, POST, PATCH, DELETE or HEAD.
    pub method: String,

    /// Path template with `{name}` placeholders.
    pub path: String,

    /// RPC operation the route is bound to.
    pub operation: String,

    /// Route-group key; empty means the root group.
    #[serde(default)]
    pub version: String,

    /// Documentation string carried on the binding.
    #[serde(default)]
    pub doc: String,

    /// Free-form metadata pairs, order preserved.
    #[serde(default)]
    pub metadata: Vec<(String, String)>,
}

impl RouteSpec {
    fn rule(&self) -> Option<HttpRule> {
        let mut rule = match self.method.to_ascii_uppercase().as_str() {
            "GET" => HttpRule::get(&self.path),
            "PUT" => HttpRule::put(&self.path),
            "POST" => HttpRule::post(&self.path),
            "PATCH" => HttpRule::patch(&self.path),
            "DELETE" => HttpRule::delete(&self.path),
            "HEAD" => HttpRule::head(&self.path),
            _ => return None,
        };
        rule = rule.doc(&self.doc).version(&self.version);
        for (field, value) in &self.metadata {
            rule = rule.metadata(field, value);
        }
        Some(rule)
    }

    /// The binding for this spec; `None` for unknown verbs or empty paths
    /// (validation reports both before registration).
    pub fn to_binding(&self) -> Option<Binding> {
        Binding::from_rule(&self.operation, &self.rule()?)
    }
}

impl GatewayConfig {
    /// Bindings for all route specs, in declaration order.
    pub fn bindings(&self) -> Vec<Binding> {
        self.routes.iter().filter_map(RouteSpec::to_binding).collect()
    }
}
