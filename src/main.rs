use detection_dashboard::{router, ApiClient, AppState, Config, DashboardController};
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    info!("using detection backend at {}", config.api_base_url);

    let controller = DashboardController::new(ApiClient::new(&config.api_base_url), &config);
    controller.load().await;
    if config.sync_streaming_on_load {
        if let Err(err) = controller.sync_streaming_state().await {
            warn!("keeping local streaming state: {err}");
        }
    }

    let app = router(AppState::new(controller));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
