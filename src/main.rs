//! Vehicle Arena relay - pub/sub relay for peer-replicated vehicle combat
//!
//! This is the main entry point. It handles:
//! - WebSocket connections relaying `connect`/`join`/`params`/`leave` between peers
//! - A health endpoint
//! - Optional in-process bot peers that run the full simulation against the relay

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vehicle_arena::app::AppState;
use vehicle_arena::config::Config;
use vehicle_arena::http::build_router;
use vehicle_arena::relay::spawn_bot;
use vehicle_arena::util::time::init_server_time;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    init_tracing(&config);

    // Initialize server time tracking
    init_server_time();

    info!(
        addr = %config.server_addr,
        bots = config.bot_count,
        logic_hz = config.logic_hz,
        "Starting Vehicle Arena relay"
    );

    let state = AppState::new(config.clone());

    // Bots join before any remote peer so they show up on first connect
    for index in 0..config.bot_count {
        spawn_bot(state.hub.clone(), index, config.sim_seed, config.session());
    }

    let router = build_router(state);

    let addr: SocketAddr = config.server_addr;
    let listener = TcpListener::bind(addr).await?;

    info!("Server listening on {}", addr);
    info!("Health check: http://{}/health", addr);
    info!("WebSocket endpoint: ws://{}/ws", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// RUST_LOG wins over the configured level
fn init_tracing(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(env_filter);

    if config.log_json {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}
