use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: HashMap<String, String>,
    pub live_threads: usize,
    pub live_connections: usize,
}

/// Health check endpoint
///
/// Returns the health status of the API and its dependencies
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult<Json<HealthResponse>> {
    let mut services = HashMap::new();

    // A cheap read proves the store answers
    let storage = match state.store.list_newspapers().await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::warn!("Storage health check failed: {}", e);
            "disconnected"
        }
    };
    services.insert(
        "storage".to_string(),
        format!("{} ({})", storage, state.store.backend_name()),
    );
    services.insert(
        "llm".to_string(),
        if state.summaries.is_some() { "configured" } else { "disabled" }.to_string(),
    );

    let registry = state.board.registry();
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services,
        live_threads: registry.thread_count().await,
        live_connections: registry.connection_count().await,
    }))
}
