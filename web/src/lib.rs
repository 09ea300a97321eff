use log::*;
use tokio::net::TcpListener;

pub use error::{Error, Result};
pub use service::AppState;

mod controller;
pub mod error;
mod router;
pub mod sse;

pub use router::define_routes;

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let server_url = format!(
        "{}:{}",
        app_state.config.interface(),
        app_state.config.port
    );
    let listener = TcpListener::bind(&server_url).await?;
    info!("Server starting... listening for connections on http://{server_url}");

    let shutdown = app_state.shutdown.clone();
    let router = define_routes(app_state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
}

/// Resolves on Ctrl-C after cancelling every open event stream, so
/// long-lived responses finish and graceful shutdown can complete.
async fn shutdown_signal(shutdown: tokio_util::sync::CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, closing event streams"),
        Err(e) => {
            error!("Unable to listen for the shutdown signal: {e}");
            std::future::pending::<()>().await;
        }
    }
    shutdown.cancel();
}
