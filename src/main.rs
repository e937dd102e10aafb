//! Gateway binary: load config, build the route table, serve.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use restgate::config::{load_config, GatewayConfig};
use restgate::dispatch::{Dispatcher, EchoBackend, GatewayServer};
use restgate::observability::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "restgate", about = "REST to RPC transcoding gateway")]
struct Args {
    /// Path to the TOML configuration file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    init_tracing(&config.observability.log_filter);
    tracing::info!(
        bind_address = %config.listener.bind_address,
        service = %config.service_name,
        routes = config.routes.len(),
        "configuration loaded"
    );

    // Echo transport until a real RPC backend is wired in deployment.
    let dispatcher = Arc::new(
        Dispatcher::new(Arc::new(EchoBackend), config.service_name.clone())
            .with_body_limit(config.limits.max_body_bytes),
    );
    dispatcher.register(config.bindings())?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let server = GatewayServer::new(config, dispatcher);
    server.run(listener).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
