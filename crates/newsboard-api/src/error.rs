use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use newsboard_board::BoardError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    ThreadFull(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("Persistence error: {0}")]
    Persist(#[from] newsboard_persist::PersistError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<BoardError> for ApiError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::Validation(msg) => ApiError::BadRequest(msg),
            BoardError::ThreadNotFound { .. } | BoardError::NewspaperNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            BoardError::ThreadFull { .. } => ApiError::ThreadFull(err.to_string()),
            BoardError::Upstream(msg) => ApiError::Upstream(msg),
            BoardError::Persist(e) => ApiError::Persist(e),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::ThreadFull(_) => (StatusCode::CONFLICT, self.to_string()),
            ApiError::Upstream(ref msg) => {
                tracing::error!("Upstream error: {}", msg);
                (StatusCode::BAD_GATEWAY, "Text generation failed".to_string())
            }
            ApiError::NotConfigured(_) => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            ApiError::Persist(ref e) => {
                tracing::error!("Persistence error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
            ApiError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_errors_map_to_status() {
        let cases = [
            (BoardError::Validation("empty".into()), StatusCode::BAD_REQUEST),
            (BoardError::thread_not_found("n", 1), StatusCode::NOT_FOUND),
            (BoardError::NewspaperNotFound("n".into()), StatusCode::NOT_FOUND),
            (
                BoardError::ThreadFull {
                    thread_id: "t".into(),
                    limit: 20,
                },
                StatusCode::CONFLICT,
            ),
            (BoardError::Upstream("boom".into()), StatusCode::BAD_GATEWAY),
            (BoardError::QueueClosed, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_not_configured_is_unavailable() {
        let response = ApiError::NotConfigured("GOOGLE_API_KEY").into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
