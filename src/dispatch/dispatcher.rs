//! Per-request pipeline and route table ownership.

use std::sync::{Arc, RwLock};

use axum::body::{Body, Bytes};
use axum::http::{Method, Request, Response, StatusCode};
use uuid::Uuid;

use crate::binding::{Binding, RouteError, RouteTable};
use crate::decode::{decode, QueryMap, RequestContext};
use crate::dispatch::backend::Backend;
use crate::envelope::{render, Rendered, RenderParams, Reply};
use crate::headers::{names, sanitize};
use crate::status::{RpcCode, RpcError, INTERNAL_ERR, INVALID_PATH_ARG_ERR};

const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Owns the versioned route table and orchestrates one request end to end.
///
/// States per request: Received → Decoded → Invoked → Translated →
/// Rendered → Sent. A routing or decode failure skips Invoked; translation
/// is reached exactly once either way.
pub struct Dispatcher {
    routes: RwLock<RouteTable>,
    backend: Arc<dyn Backend>,
    service_name: String,
    max_body_bytes: usize,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn Backend>, service_name: impl Into<String>) -> Self {
        Self {
            routes: RwLock::new(RouteTable::new()),
            backend,
            service_name: service_name.into(),
            max_body_bytes: DEFAULT_BODY_LIMIT,
        }
    }

    pub fn with_body_limit(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Register bindings in order; the first conflict aborts registration.
    pub fn register<I>(&self, bindings: I) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = Binding>,
    {
        let mut routes = self.write_routes();
        for binding in bindings {
            routes.insert(binding)?;
        }
        Ok(())
    }

    /// Dynamically add one route.
    pub fn add_route(&self, binding: Binding) -> Result<(), RouteError> {
        self.write_routes().insert(binding)
    }

    /// Dynamically add one route, displacing any existing registration.
    pub fn replace_route(&self, binding: Binding) -> Option<Binding> {
        self.write_routes().replace(binding)
    }

    /// Dynamically remove one route by its registration key.
    pub fn remove_route(
        &self,
        version: &str,
        path: &str,
        method: &Method,
    ) -> Result<Binding, RouteError> {
        self.write_routes().remove(version, path, method)
    }

    pub fn route_count(&self) -> usize {
        self.read_routes().len()
    }

    fn read_routes(&self) -> std::sync::RwLockReadGuard<'_, RouteTable> {
        self.routes.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_routes(&self) -> std::sync::RwLockWriteGuard<'_, RouteTable> {
        self.routes.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Handle one request; always produces a well-formed wire response.
    pub async fn handle(&self, request: Request<Body>) -> Response<Body> {
        let (parts, body) = request.into_parts();
        let method = parts.method.clone();
        let path = parts.uri.path().to_string();
        let query = QueryMap::parse(parts.uri.query());

        let propagated = sanitize(
            &parts.headers,
            query.get(names::LANGUAGE_QUERY_PARAM),
            &self.service_name,
        );
        let request_id = propagated.value(names::TRACE_ID).to_string();
        let request_method = propagated.value(names::REQUEST_METHOD).to_string();

        // Log correlation only; the echoed request_id stays the inbound
        // value, empty included.
        let correlation = if request_id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            request_id.clone()
        };
        tracing::debug!(
            request_id = %correlation,
            method = %method,
            path = %path,
            "transcoding request"
        );

        let params = RenderParams {
            onebox: query.flag(names::BODY_IN_ONEBOX_PARAM),
            ignore_http_status: query.flag(names::IGNORE_HTTP_CODE_PARAM),
            request_id: &request_id,
            request_method: &request_method,
        };

        // Binding resolution precedes decoding; a miss is terminal.
        let resolved = self
            .read_routes()
            .resolve(&path, &method)
            .map(|(binding, path_params)| (binding.clone(), path_params));
        let (binding, path_params) = match resolved {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(request_id = %correlation, method = %method, path = %path, %err, "no route");
                return respond(params, None, Some(&routing_error(&err)));
            }
        };

        // GET/DELETE/HEAD never touch the body; other verbs buffer it once
        // so it can be re-read for body-parameter lookups.
        let body_bytes = match method {
            Method::GET | Method::DELETE | Method::HEAD => Bytes::new(),
            _ => match axum::body::to_bytes(body, self.max_body_bytes).await {
                Ok(bytes) => bytes,
                Err(err) => {
                    let err = RpcError::new(
                        RpcCode::InvalidArgument,
                        format!("reading request body: {err}"),
                    );
                    return respond(params, None, Some(&err));
                }
            },
        };

        let ctx = RequestContext {
            method,
            path,
            headers: parts.headers,
            query,
            body: body_bytes,
            path_params,
            binding,
        };

        let outcome = match decode(&ctx) {
            Ok(typed) => {
                self.backend
                    .invoke(&ctx.binding.operation, typed, &propagated)
                    .await
            }
            // Structural errors skip the invoke; the translator rewrites
            // them into the invalid-format convention.
            Err(err) => Err(RpcError::new(RpcCode::InvalidArgument, err.to_string())),
        };

        let (payload, error) = match outcome {
            Ok(reply) => (Some(reply), None),
            Err(err) => (None, Some(err)),
        };
        if let Some(err) = &error {
            tracing::error!(
                request_id = %correlation,
                method = %ctx.method,
                path = %ctx.path,
                error = %err,
                "request failed"
            );
        }
        respond(params, payload.as_ref(), error.as_ref())
    }
}

/// Routing misses rendered through the ordinary translate/render path.
fn routing_error(err: &RouteError) -> RpcError {
    match err {
        RouteError::NotFound { .. } | RouteError::VersionNotFound { .. } => {
            RpcError::new(RpcCode::NotFound, format!("({INVALID_PATH_ARG_ERR}){err}"))
        }
        RouteError::MethodNotAllowed { .. } => RpcError::new(
            RpcCode::Unimplemented,
            format!("({INVALID_PATH_ARG_ERR}){err}"),
        ),
        RouteError::Conflict { .. } => {
            RpcError::new(RpcCode::Internal, format!("({INTERNAL_ERR}){err}"))
        }
    }
}

fn respond(
    params: RenderParams<'_>,
    payload: Option<&Reply>,
    error: Option<&RpcError>,
) -> Response<Body> {
    match render(params, payload, error) {
        Ok(Rendered {
            status,
            headers,
            body,
        }) => {
            let mut response = Response::new(Body::from(body));
            *response.status_mut() = status;
            *response.headers_mut() = headers;
            response
        }
        // Translation already decided the outcome; all that is left is a
        // minimal failure for this request.
        Err(err) => {
            tracing::error!(%err, "rendering response failed");
            let mut response = Response::new(Body::from("response serialization failed"));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    }
}
