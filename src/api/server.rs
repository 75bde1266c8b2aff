//! Server lifecycle: bind, serve, and shut down on Ctrl-C.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::application::Recommender;
use crate::ports::{Classifier, Scaler};

use super::router::build_router;

/// Serve the API on `addr` until Ctrl-C.
///
/// # Errors
/// Returns error if the address cannot be bound or the server fails.
pub async fn serve<C, S>(service: Arc<Recommender<C, S>>, addr: SocketAddr) -> std::io::Result<()>
where
    C: Classifier + 'static,
    S: Scaler + 'static,
{
    serve_until(service, addr, shutdown_signal()).await
}

/// Serve the API on `addr` until `shutdown` completes.
///
/// # Errors
/// Returns error if the address cannot be bound or the server fails.
pub async fn serve_until<C, S, F>(
    service: Arc<Recommender<C, S>>,
    addr: SocketAddr,
    shutdown: F,
) -> std::io::Result<()>
where
    C: Classifier + 'static,
    S: Scaler + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    let app = build_router(service);

    tracing::info!(addr = %local, "Recommendation API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Recommendation API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
