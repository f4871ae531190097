//! Health proxy server.
//!
//! Exposes the backend health check to callers that can't reach the
//! backend directly, plus a liveness probe for the proxy itself.

pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::client::PhiactaClient;

pub use routes::create_router;

/// Serve the router on `0.0.0.0:port` until Ctrl-C.
///
/// # Errors
///
/// Returns error if the port can't be bound or the server fails.
pub async fn run_http(client: PhiactaClient, port: u16) -> anyhow::Result<()> {
    tracing::info!(port, backend = client.base_url(), "Starting health proxy");

    let router = create_router(Arc::new(client));
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("HTTP server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        // Without a signal handler, keep serving until the process is killed
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
