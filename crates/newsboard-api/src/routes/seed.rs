use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use super::{required, required_index};
use crate::{error::ApiResult, state::AppState};

const SEEDED_EDITIONS: usize = 5;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SeedPostsQuery {
    #[serde(rename = "newspaper-id")]
    pub newspaper_id: Option<String>,
    pub index: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SeedPostsResponse {
    pub created: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SeedNewsResponse {
    pub created: Vec<String>,
}

/// Fill a thread with a sample conversation (development only)
#[utoipa::path(
    get,
    path = "/create-posts",
    params(SeedPostsQuery),
    responses(
        (status = 200, description = "Posts written", body = SeedPostsResponse),
        (status = 404, description = "Thread not found")
    ),
    tag = "seed"
)]
pub async fn create_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SeedPostsQuery>,
) -> ApiResult<Json<SeedPostsResponse>> {
    let newspaper_id = required(&query.newspaper_id, "newspaper-id")?;
    let index = required_index(&query.index)?;

    let created = state.board.seed_thread_posts(newspaper_id, index).await?;
    Ok(Json(SeedPostsResponse { created }))
}

/// Create a batch of published editions (development only)
#[utoipa::path(
    get,
    path = "/create-news",
    responses(
        (status = 200, description = "Editions created", body = SeedNewsResponse)
    ),
    tag = "seed"
)]
pub async fn create_news(State(state): State<Arc<AppState>>) -> ApiResult<Json<SeedNewsResponse>> {
    let created = state
        .editions
        .seed_published_editions(SEEDED_EDITIONS)
        .await?
        .into_iter()
        .map(|newspaper| newspaper.id)
        .collect();

    Ok(Json(SeedNewsResponse { created }))
}
