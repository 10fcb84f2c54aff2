//! ai-relay binary entry point.

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use ai_relay::config::{Cli, Config};
use ai_relay::server::routes::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments.
    let cli = Cli::parse();

    // Initialize tracing/logging.
    let filter = if cli.verbose {
        "ai_relay=debug,tower_http=debug"
    } else {
        "ai_relay=info,tower_http=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_target(true)
        .init();

    info!("ai-relay v{}", env!("CARGO_PKG_VERSION"));

    // File first, then environment, then CLI.
    let mut config = Config::load(&cli.config)?;
    config.apply_env();
    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }
    let config = Arc::new(config);

    info!(
        mount_path = config.server.mount_path,
        azure_configured = config.azure.is_configured(),
        ollama_base_url = config.ollama.base_url(),
        ollama_model = config.ollama.model(),
        request_timeout_secs = config.server.request_timeout_secs,
        "Configuration loaded"
    );

    let state = Arc::new(AppState::new(config.clone())?);
    let app = build_router(state);

    let listen_addr = config.server.listen.clone();
    let listener = TcpListener::bind(&listen_addr).await?;
    info!("Listening on {listen_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
