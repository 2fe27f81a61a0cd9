//! CRASHSIM — crash-game wagering strategy simulator.
//!
//! Entry point. Initialises structured logging, loads configuration,
//! and serves the HTTP API until Ctrl+C.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crashsim::api;
use crashsim::api::routes::ServiceState;
use crashsim::config::AppConfig;

const BANNER: &str = r#"
  ____  ____      _     ____   _   _  ____   ___  __  __
 / ___||  _ \    / \   / ___| | | | |/ ___| |_ _||  \/  |
| |    | |_) |  / _ \  \___ \ | |_| |\___ \  | | | |\/| |
| |___ |  _ <  / ___ \  ___) ||  _  | ___) | | | | |  | |
 \____||_| \_\/_/   \_\|____/ |_| |_||____/ |___||_|  |_|

  Crash-Game Wagering Strategy Simulator
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cfg = AppConfig::load("config.toml")?;

    println!("{BANNER}");
    info!(
        host = %cfg.server.host,
        port = cfg.server.port,
        max_rounds = cfg.simulation.max_rounds,
        default_rounds = cfg.simulation.default_rounds,
        multiplier_cap = cfg.simulation.multiplier_cap,
        "CRASHSIM starting up"
    );

    let addr = cfg.server.bind_addr();
    let state = Arc::new(ServiceState::new(cfg));
    let app = api::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Listening. Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("CRASHSIM shut down cleanly.");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received.");
    }
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_env("CRASHSIM_LOG")
        .unwrap_or_else(|_| EnvFilter::new("crashsim=info"));

    let json_logging = std::env::var("CRASHSIM_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
