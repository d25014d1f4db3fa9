use axum::{extract::State, Json};
use newsboard_types::{format_timestamp, Newspaper};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewspaperResponse {
    pub id: String,
    /// Publication time, `YYYY-MM-DD HH:MM:SS`
    pub created_at: String,
}

impl NewspaperResponse {
    fn from_published(newspaper: Newspaper) -> Option<Self> {
        let published_at = newspaper.published_at?;
        Some(Self {
            id: newspaper.id,
            created_at: format_timestamp(&published_at),
        })
    }
}

/// Published editions, newest first
#[utoipa::path(
    get,
    path = "/newspaper-list",
    responses(
        (status = 200, description = "Published editions", body = Vec<NewspaperResponse>)
    ),
    tag = "newspapers"
)]
pub async fn newspaper_list(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<NewspaperResponse>>> {
    let published = state.editions.published_editions().await?;

    Ok(Json(
        published
            .into_iter()
            .filter_map(NewspaperResponse::from_published)
            .collect(),
    ))
}
