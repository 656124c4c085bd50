mod config;
mod errors;
mod extraction;
mod hubspot;
mod llm_client;
mod resume;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::hubspot::HubSpotClient;
use crate::llm_client::{GeminiClient, LanguageModel};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Sync API v{}", env!("CARGO_PKG_VERSION"));
    info!(?config, "Configuration loaded");

    // One HubSpot client serves both the CRM and the File Manager
    let hubspot = Arc::new(HubSpotClient::new(
        config.hubspot_api_base.clone(),
        config.hubspot_token.clone(),
    ));
    info!("HubSpot client initialized ({})", config.hubspot_api_base);

    let llm = Arc::new(GeminiClient::new(
        config.gemini_api_base.clone(),
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    ));
    info!("LLM client initialized (model: {})", llm.model_name());

    let state = AppState {
        llm,
        crm: hubspot.clone(),
        documents: hubspot,
        folder_id: config.hubspot_folder_id.clone(),
    };

    // Open API surface: any origin, method and header
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(DefaultBodyLimit::max(config.max_upload_bytes)),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
