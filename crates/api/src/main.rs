use std::net::SocketAddr;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use signals_api::config::ServerConfig;
use signals_api::router::build_app_router;
use signals_api::state::AppState;
use signals_pipeline::{CollaboratorConfig, Collaborators};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "signals_api=debug,signals_pipeline=debug,signals_events=debug,tower_http=debug".into()
    });
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        public_base_url = %config.public_base_url,
        "Loaded server configuration"
    );

    // --- Messaging provider ---
    let provider = signals_events::delivery::provider_from_env()
        .expect("Failed to initialise messaging provider");
    tracing::info!(provider = provider.name(), "Messaging provider ready");

    // --- Research collaborators ---
    let collaborators = Collaborators::from_config(&CollaboratorConfig::from_env())
        .expect("Failed to initialise research collaborators");

    // --- App state ---
    let state = AppState::build(config.clone(), provider, collaborators);

    // Spawn event history (records lifecycle events per job).
    let history_handle = state.spawn_history();
    tracing::info!("Event history started");

    // --- Router ---
    let app = build_app_router(state.clone(), &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!(
        jobs = state.registry.len().await,
        notifications_sent = state.dispatcher.sent_count(),
        "Server stopped accepting connections, cleaning up"
    );

    // Dropping the last bus handle closes the channel and stops the history.
    // Research tasks still running hold their own handles, hence the timeout.
    drop(state);
    if tokio::time::timeout(Duration::from_secs(5), history_handle)
        .await
        .is_err()
    {
        tracing::warn!("Event history did not stop in time");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
