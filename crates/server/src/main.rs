use monitor_server::config::ServerConfig;
use monitor_server::rest::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    let listener = match tokio::net::TcpListener::bind(config.rest_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %config.rest_addr, "bind failed: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        addr = %config.rest_addr,
        auth = config.api_token.is_some(),
        location = %config.default_location,
        "REST server starting"
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for shutdown signal: {e}");
        }
        tracing::info!("shutting down");
    };

    if let Err(e) = monitor_server::serve(listener, AppState::new(&config), shutdown).await {
        tracing::error!("REST server failed: {e}");
        std::process::exit(1);
    }
}
