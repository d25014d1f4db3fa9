use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use super::{required, PostResponse, ThreadResponse};
use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThreadTitlesResponse {
    pub newspaper_id: String,
    pub threads: Vec<ThreadResponse>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ThreadPostsQuery {
    #[serde(rename = "thread-id")]
    pub thread_id: Option<String>,
}

/// Threads of the edition currently collecting posts
///
/// Creates a fresh edition when none is running.
#[utoipa::path(
    get,
    path = "/thread-titles",
    responses(
        (status = 200, description = "Current edition", body = ThreadTitlesResponse)
    ),
    tag = "threads"
)]
pub async fn thread_titles(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ThreadTitlesResponse>> {
    let edition = state.editions.current_edition().await?;

    Ok(Json(ThreadTitlesResponse {
        newspaper_id: edition.newspaper.id,
        threads: edition
            .threads
            .into_iter()
            .map(|(index, thread)| ThreadResponse::new(index, thread))
            .collect(),
    }))
}

/// Posts of a thread in sequence order
#[utoipa::path(
    get,
    path = "/thread-posts",
    params(ThreadPostsQuery),
    responses(
        (status = 200, description = "Posts of the thread", body = Vec<PostResponse>),
        (status = 400, description = "Missing thread-id")
    ),
    tag = "threads"
)]
pub async fn thread_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ThreadPostsQuery>,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let thread_id = required(&query.thread_id, "thread-id")?;
    let posts = state.board.posts(thread_id).await?;

    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}
