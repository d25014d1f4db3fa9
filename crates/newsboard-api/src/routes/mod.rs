pub mod health;
pub mod newspapers;
pub mod posts;
pub mod seed;
pub mod summaries;
pub mod threads;

use newsboard_types::{format_timestamp, StoredPost, Thread};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ApiError, ApiResult};

/// Thread metadata as returned to clients
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThreadResponse {
    pub index: u32,
    pub id: String,
    pub title: String,
    pub enabled: bool,
    pub summary: Option<String>,
}

impl ThreadResponse {
    pub fn new(index: u32, thread: Thread) -> Self {
        Self {
            index,
            id: thread.id,
            title: thread.title,
            enabled: thread.enabled,
            summary: thread.summary,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub index: u64,
    pub author: String,
    pub body: String,
    /// `YYYY-MM-DD HH:MM:SS`
    pub created_at: String,
}

impl From<StoredPost> for PostResponse {
    fn from(stored: StoredPost) -> Self {
        Self {
            index: stored.index,
            created_at: format_timestamp(&stored.post.created_at),
            author: stored.post.author,
            body: stored.post.body,
        }
    }
}

/// Required query parameter, or 400 naming it
pub(crate) fn required<'a>(value: &'a Option<String>, name: &str) -> ApiResult<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("missing {} parameter", name)))
}

/// Required thread index parameter
pub(crate) fn required_index(value: &Option<String>) -> ApiResult<u32> {
    required(value, "index")?
        .parse()
        .map_err(|_| ApiError::BadRequest("index must be a non-negative integer".to_string()))
}
