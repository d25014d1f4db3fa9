use axum::{
    extract::{Query, State},
    Json,
};
use newsboard_board::PostSubmission;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use super::{required, required_index};
use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NewPostQuery {
    #[serde(rename = "newspaper-id")]
    pub newspaper_id: Option<String>,
    pub index: Option<String>,
    #[serde(rename = "thread-id")]
    pub thread_id: Option<String>,
    #[serde(rename = "user-name")]
    pub user_name: Option<String>,
    #[serde(rename = "post-content")]
    pub post_content: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewPostResponse {
    pub accepted: bool,
    pub sequence_index: u64,
    pub limit_reached: bool,
}

/// Submit a post over HTTP
///
/// Goes through the same admission as WebSocket frames, so live
/// subscribers of the thread receive it too.
#[utoipa::path(
    get,
    path = "/new-posts",
    params(NewPostQuery),
    responses(
        (status = 200, description = "Post accepted", body = NewPostResponse),
        (status = 400, description = "Missing parameter or empty post"),
        (status = 404, description = "Thread not found"),
        (status = 409, description = "Thread is full")
    ),
    tag = "posts"
)]
pub async fn new_post(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NewPostQuery>,
) -> ApiResult<Json<NewPostResponse>> {
    let newspaper_id = required(&query.newspaper_id, "newspaper-id")?;
    let thread_id = required(&query.thread_id, "thread-id")?;
    let index = required_index(&query.index)?;

    let mut submission = PostSubmission::new(thread_id, newspaper_id, index);
    submission.author = query.user_name;
    submission.body = query.post_content;

    let receipt = state.board.submit(submission).await?;

    Ok(Json(NewPostResponse {
        accepted: receipt.accepted,
        sequence_index: receipt.sequence_index,
        limit_reached: receipt.limit_reached,
    }))
}
