//! Synetra Dashboard
//!
//! Serves the Dioxus app together with the backend forwarding routes.

#[cfg(feature = "server")]
use synetra_dashboard::{config, server};

#[cfg(feature = "server")]
use anyhow::Result;
#[cfg(feature = "server")]
use std::net::SocketAddr;
#[cfg(feature = "server")]
use tokio::signal;
#[cfg(feature = "server")]
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
#[cfg(feature = "server")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "server")]
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "synetra_dashboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Starting Synetra Dashboard v{} ({})",
        env!("SYNETRA_VERSION"),
        env!("SYNETRA_GIT_SHA")
    );

    // Load configuration
    let config = config::load_config()?;
    tracing::info!(
        "Configuration loaded, port: {}, backend: {}",
        config.port,
        config.backend_url
    );

    let state = server::ServerState::from_config(&config)?;

    let app = dioxus::server::router(synetra_dashboard::app::App)
        .merge(server::router(state))
        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Browser bundle entry point
#[cfg(not(feature = "server"))]
fn main() {
    dioxus::launch(synetra_dashboard::app::App);
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
#[cfg(feature = "server")]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
