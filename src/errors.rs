use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Run-level failure classes the trigger endpoint distinguishes for
/// operators: source unreachable vs. source format changed vs. store
/// trouble. Everything below this level is absorbed and logged.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to fetch source document: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("parsed 0 rows from the source document; the upstream format may have changed")]
    EmptyParse,

    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl IntoResponse for SyncError {
    fn into_response(self) -> Response {
        let status = match &self {
            SyncError::Fetch(_) => StatusCode::BAD_GATEWAY,
            SyncError::EmptyParse | SyncError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::error!("sync failed: {}", self);
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
