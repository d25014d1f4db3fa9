use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use super::{required, ThreadResponse};
use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    #[serde(alias = "uuid")]
    pub newspaper_id: String,
    pub index: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QueuedResponse {
    pub queued: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryListQuery {
    #[serde(rename = "newspaper-id")]
    pub newspaper_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryListResponse {
    pub newspaper_id: String,
    pub threads: Vec<ThreadResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuggestRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuggestResponse {
    pub text: String,
}

/// Summarize a thread now and return it with its new summary
#[utoipa::path(
    post,
    path = "/thread-summary",
    request_body = SummaryRequest,
    responses(
        (status = 200, description = "Summary stored", body = ThreadResponse),
        (status = 404, description = "Thread not found"),
        (status = 502, description = "Text generation failed"),
        (status = 503, description = "No API key configured")
    ),
    tag = "summaries"
)]
pub async fn create_summary(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SummaryRequest>,
) -> ApiResult<Json<ThreadResponse>> {
    let thread = state
        .summaries()?
        .generate(&req.newspaper_id, req.index)
        .await?;

    Ok(Json(ThreadResponse::new(req.index, thread)))
}

/// Queue a summary; failures are retried in the background
#[utoipa::path(
    post,
    path = "/thread-summary/queue",
    request_body = SummaryRequest,
    responses(
        (status = 202, description = "Summary queued", body = QueuedResponse),
        (status = 503, description = "No API key configured")
    ),
    tag = "summaries"
)]
pub async fn queue_summary(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SummaryRequest>,
) -> ApiResult<(StatusCode, Json<QueuedResponse>)> {
    state
        .summary_queue()?
        .enqueue(req.newspaper_id, req.index)?;

    Ok((StatusCode::ACCEPTED, Json(QueuedResponse { queued: true })))
}

/// Threads of an edition with their summaries
#[utoipa::path(
    get,
    path = "/get-summary",
    params(SummaryListQuery),
    responses(
        (status = 200, description = "Threads with summaries", body = SummaryListResponse),
        (status = 400, description = "Missing newspaper-id"),
        (status = 404, description = "Newspaper not found")
    ),
    tag = "summaries"
)]
pub async fn list_summaries(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SummaryListQuery>,
) -> ApiResult<Json<SummaryListResponse>> {
    let newspaper_id = required(&query.newspaper_id, "newspaper-id")?;
    let threads = state.editions.threads(newspaper_id).await?;

    Ok(Json(SummaryListResponse {
        newspaper_id: newspaper_id.to_string(),
        threads: threads
            .into_iter()
            .map(|(index, thread)| ThreadResponse::new(index, thread))
            .collect(),
    }))
}

/// Generate a suggested post from a free-form prompt
#[utoipa::path(
    post,
    path = "/thread-post-suggest",
    request_body = SuggestRequest,
    responses(
        (status = 200, description = "Generated text", body = SuggestResponse),
        (status = 400, description = "Empty prompt"),
        (status = 503, description = "No API key configured")
    ),
    tag = "summaries"
)]
pub async fn suggest_post(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SuggestRequest>,
) -> ApiResult<Json<SuggestResponse>> {
    let text = state.summaries()?.suggest(&req.prompt).await?;
    Ok(Json(SuggestResponse { text }))
}
