pub mod config;
pub mod metrics;
pub mod middleware;
pub mod rest;
pub mod store;

use tokio::net::TcpListener;

/// Serves the API on an already-bound listener until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: rest::AppState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = rest::router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
