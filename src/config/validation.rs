//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and route specs before registration
//! - Detect duplicate (version, method, path) routes up front
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: GatewayConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

const SUPPORTED_METHODS: &[&str] = &["GET", "PUT", "POST", "PATCH", "DELETE", "HEAD"];

/// One semantic problem found in the configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener bind_address '{0}' is not a valid socket address")]
    BindAddress(String),

    #[error("service_name must not be empty")]
    ServiceName,

    #[error("timeouts.request_secs must be greater than zero")]
    RequestTimeout,

    #[error("limits.max_body_bytes must be greater than zero")]
    BodyLimit,

    #[error("route {index}: method '{method}' is not supported")]
    RouteMethod { index: usize, method: String },

    #[error("route {index}: path must not be empty")]
    RoutePath { index: usize },

    #[error("route {index}: operation must not be empty")]
    RouteOperation { index: usize },

    #[error("route {index}: duplicate of an earlier (version, method, path)")]
    RouteDuplicate { index: usize },
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.service_name.is_empty() {
        errors.push(ValidationError::ServiceName);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::BodyLimit);
    }

    let mut seen = HashSet::new();
    for (index, route) in config.routes.iter().enumerate() {
        let method = route.method.to_ascii_uppercase();
        if !SUPPORTED_METHODS.contains(&method.as_str()) {
            errors.push(ValidationError::RouteMethod {
                index,
                method: route.method.clone(),
            });
        }
        if route.path.is_empty() {
            errors.push(ValidationError::RoutePath { index });
        }
        if route.operation.is_empty() {
            errors.push(ValidationError::RouteOperation { index });
        }
        if !seen.insert((route.version.clone(), method, route.path.clone())) {
            errors.push(ValidationError::RouteDuplicate { index });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
