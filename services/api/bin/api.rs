//! Main Entrypoint for the Herald API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing logging.
//! 3. Building the text-generation and directory clients and the orchestrator.
//! 4. Constructing the Axum router and applying middleware.
//! 5. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use herald_api::{config::Config, router::create_router, state::AppState};
use herald_core::{
    CommandOrchestrator,
    address::AddressPolicy,
    formalizer::{FormalizerSettings, PromptTemplates},
    gateway::GatewaySettings,
    graph::{GraphClientConfig, GraphDirectoryClient},
    llm_client::{OpenAIClientConfig, OpenAICompatibleClient},
};
use std::{collections::HashMap, fs, net::SocketAddr, path::Path, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C; shutting down");
        return;
    }
    info!("Received shutdown signal. Shutting down gracefully...");
}

/// Loads `*.md` prompt templates from a directory, keyed by file stem.
fn load_prompts(prompts_path: &Path) -> anyhow::Result<HashMap<String, String>> {
    let mut prompts = HashMap::new();
    if !prompts_path.is_dir() {
        warn!(path = %prompts_path.display(), "Prompts directory not found; using built-in prompts");
        return Ok(prompts);
    }
    for entry in fs::read_dir(prompts_path)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("md") {
            let prompt_key = path
                .file_stem()
                .and_then(|s| s.to_str())
                .context("Could not get file stem")?
                .to_string();
            let content = fs::read_to_string(&path)?;
            prompts.insert(prompt_key, content);
        }
    }
    Ok(prompts)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Initialize Shared Services ---
    let prompts = load_prompts(&config.prompts_path)?;
    let templates = PromptTemplates::from_map(&prompts);

    let llm_client = OpenAICompatibleClient::new(OpenAIClientConfig {
        endpoint: config.llm_endpoint.clone(),
        api_key: config.openai_api_key.clone(),
        timeout_secs: config.http_timeout_secs,
    })
    .context("Failed to build text generation client")?;

    let directory = GraphDirectoryClient::new(GraphClientConfig {
        base_url: config.graph_base_url.clone(),
        access_token: config.graph_access_token.clone(),
        timeout_secs: config.http_timeout_secs,
    })
    .context("Failed to build directory client")?;

    let gateway_settings = GatewaySettings {
        group_routing: config.group_routing,
        topic_matching: config.topic_matching,
        ..GatewaySettings::new(
            AddressPolicy::new(config.email_domain.clone())
                .with_separator(config.address_separator.clone()),
        )
    };

    let orchestrator = CommandOrchestrator::from_clients(
        Arc::new(llm_client),
        Arc::new(directory),
        FormalizerSettings {
            model: config.chat_model.clone(),
            ..FormalizerSettings::default()
        },
        templates,
        gateway_settings,
    );

    let app_state = Arc::new(AppState {
        orchestrator: Arc::new(orchestrator),
    });

    // --- 4. Create Router and Apply Middleware ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    // --- 5. Start Server ---
    info!(
        model = %config.chat_model,
        email_domain = %config.email_domain,
        bind_address = %config.bind_address,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}
