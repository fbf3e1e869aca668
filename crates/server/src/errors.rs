use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use store::{InvalidShardCount, StoreError};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
        };
        let msg = self.to_string();
        warn!(%status, error = %msg, "request failed");
        (status, Json(serde_json::json!({"error": msg}))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid store configuration: {0}")]
    Store(#[from] InvalidShardCount),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
