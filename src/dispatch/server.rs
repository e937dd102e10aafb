//! Axum wiring for the transcoding gateway.
//!
//! # Responsibilities
//! - Build the axum Router: one catch-all route into the dispatcher
//! - Wire middleware (trace, request timeout)
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::dispatch::dispatcher::Dispatcher;

/// HTTP server for the gateway.
pub struct GatewayServer {
    dispatcher: Arc<Dispatcher>,
    config: GatewayConfig,
}

impl GatewayServer {
    pub fn new(config: GatewayConfig, dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher, config }
    }

    /// Build the axum router with all middleware layers.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", any(transcode_handler))
            .route("/{*path}", any(transcode_handler))
            .with_state(self.dispatcher.clone())
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            service = %self.config.service_name,
            routes = self.dispatcher.route_count(),
            "gateway starting"
        );

        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("gateway stopped");
        Ok(())
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Every path and verb funnels into the one dispatch pipeline.
async fn transcode_handler(
    State(dispatcher): State<Arc<Dispatcher>>,
    request: Request<Body>,
) -> Response {
    dispatcher.handle(request).await
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to install Ctrl+C handler");
    }
    tracing::info!("shutdown signal received");
}
