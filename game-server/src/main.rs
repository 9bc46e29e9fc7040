use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;

use game_core::SessionSettings;
use game_server::{
    build_record_store, config::Config, create_routes, session_manager::SessionManager,
};

const CLEANUP_INTERVAL: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Number Quest server...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let host: IpAddr = match config.host.parse() {
        Ok(host) => host,
        Err(e) => {
            tracing::error!("Invalid HOST '{}': {}", config.host, e);
            std::process::exit(1);
        }
    };

    info!("Using {:?} record store", config.record_store);
    let store = match build_record_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open record store: {}", e);
            std::process::exit(1);
        }
    };

    let session_manager = Arc::new(SessionManager::new(
        store,
        SessionSettings {
            leaderboard_size: config.leaderboard_size,
            seed: None,
        },
    ));

    let routes = create_routes(session_manager.clone());

    // Start cleanup task
    let cleanup_session_manager = session_manager.clone();
    let session_timeout = config.session_timeout();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            cleanup_session_manager
                .cleanup_inactive_sessions(session_timeout)
                .await;
        }
    });

    info!("Server starting on {}:{}", config.host, config.port);

    let (addr, server) =
        warp::serve(routes).bind_with_graceful_shutdown((host, config.port), shutdown_signal());

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}

/// Resolves on SIGINT (Ctrl+C) or SIGTERM
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use signal::unix::{SignalKind, signal};

        let (mut sigint, mut sigterm) =
            match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
                (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
                (Err(e), _) | (_, Err(e)) => {
                    tracing::error!("Failed to install signal handlers: {}", e);
                    std::future::pending::<()>().await;
                    return;
                }
            };

        tokio::select! {
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down gracefully...");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down gracefully...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl+c: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down gracefully...");
    }
}
