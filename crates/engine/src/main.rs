use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::sync::watch;
use tracing::{error, info, warn};

use campus_engine::api::{self, AppState};
use campus_engine::assistant::Assistant;
use campus_engine::config::{Config, REQUIRED_VARS};
use campus_engine::llm::AnthropicModel;
use campus_engine::resources::ResourceClient;
use campus_engine::session::SessionStore;
use campus_shared::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: could not read .env: {}", e);
        }
    }
    telemetry::init_tracing("info");

    println!("Starting School IoT assistant...\n");

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            eprintln!("Make sure these environment variables are set (or present in .env):");
            for var in REQUIRED_VARS {
                eprintln!("  - {}", var);
            }
            return Err(e);
        }
    };

    if config.uses_default_secret() {
        warn!("SECRET_KEY is not set, session cookies are signed with the development key");
    }

    // Authenticate against the resource API up front
    let resources = ResourceClient::new(config.resources.clone());
    resources.authenticate().await?;
    info!("Authenticated against the resource API");

    let model = AnthropicModel::new(config.anthropic.clone());
    let assistant = Assistant::new(Arc::new(model), Arc::new(resources));
    let sessions = SessionStore::with_idle_ttl(&config.secret_key, config.session_idle_ttl);
    let state = AppState::new(assistant, sessions);

    // Create shutdown channel
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Start API server
    let bind_addr = config.bind_addr;
    let mut api_handle = tokio::spawn(async move {
        if let Err(e) = api::start_server(state, bind_addr, shutdown_rx).await {
            error!("API server crashed: {:#}", e);
        }
    });

    // Wait for Ctrl+C, or bail out if the server dies on its own
    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal?;
            println!("\nReceived shutdown signal...");
        }
        _ = &mut api_handle => {
            return Err(anyhow!("API server stopped unexpectedly"));
        }
    }

    let _ = shutdown_tx.send(true);
    let _ = api_handle.await;

    println!("School IoT assistant shutdown complete.");
    Ok(())
}
