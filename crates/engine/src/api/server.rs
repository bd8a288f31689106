use std::net::SocketAddr;

use anyhow::Result;
use tokio::sync::watch;
use tracing::info;

use super::routes::create_router;
use super::AppState;

pub async fn start_server(
    state: AppState,
    addr: SocketAddr,
    shutdown_rx: watch::Receiver<bool>,
) -> Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("🚀 School IoT assistant listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_rx))
        .await?;

    Ok(())
}

async fn shutdown_signal(mut shutdown_rx: watch::Receiver<bool>) {
    // Wait for shutdown signal
    while !*shutdown_rx.borrow() {
        if shutdown_rx.changed().await.is_err() {
            break;
        }
    }
    info!("Shutting down API server...");
}
