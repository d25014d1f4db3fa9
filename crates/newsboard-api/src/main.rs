use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use newsboard_api::{build_router, config::Config, state::AppState};
use newsboard_llm::{GeminiClient, TextGenerator};
use newsboard_persist::{PersistClientBuilder, StorageBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting newsboard API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    // Initialize persistence client
    let backend: StorageBackend = config.storage.backend.parse()?;
    let mut builder = PersistClientBuilder::new()
        .backend(backend)
        .database(&config.storage.database);
    if let Some(uri) = &config.mongodb_uri {
        builder = builder.mongodb_uri(uri);
    }
    let store = builder.build().await?;
    tracing::info!(backend = store.backend_name(), "Storage ready");

    // Initialize text generator (optional)
    let generator: Option<Arc<dyn TextGenerator>> = match config.gemini_config() {
        Some(gemini) => {
            tracing::info!(model = %gemini.model, "Summaries enabled");
            Some(Arc::new(GeminiClient::new(gemini)?))
        }
        None => {
            tracing::warn!("GOOGLE_API_KEY not set, summary routes disabled");
            None
        }
    };

    // Create application state
    let state = Arc::new(AppState::new(config.clone(), store, generator));

    // Build router
    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API docs: http://{}/api/docs", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
