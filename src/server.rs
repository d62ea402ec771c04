use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::db::SqliteStore;
use crate::errors::SyncError;
use crate::pipeline;
use crate::store::ReadOnlyStore;

#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    secret: Arc<String>,
}

/// Serve the trigger endpoint. The store implementation is chosen per
/// request from the configured target mode; everything else is one handler.
pub async fn serve(config: Config, port: u16) -> Result<()> {
    let secret = config
        .sync_secret
        .clone()
        .context("SYNC_SECRET must be set to serve the trigger endpoint")?;
    let state = AppState {
        config: Arc::new(config),
        secret: Arc::new(secret),
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/sync", get(sync_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

async fn sync_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if !authorized(&headers, &state.secret) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" })))
            .into_response();
    }

    let cfg = &state.config;
    let result = if cfg.read_only_target {
        pipeline::run(cfg, &ReadOnlyStore).await
    } else {
        match SqliteStore::open(&cfg.db_path, &cfg.sitemap_path) {
            Ok(store) => pipeline::run(cfg, &store).await,
            Err(e) => Err(SyncError::Store(e)),
        }
    };

    match result {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => e.into_response(),
    }
}

fn authorized(headers: &HeaderMap, secret: &str) -> bool {
    let expected = format!("Bearer {secret}");
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(expected.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(v) = value {
            headers.insert(header::AUTHORIZATION, HeaderValue::from_str(v).unwrap());
        }
        headers
    }

    #[test]
    fn bearer_token_must_match_exactly() {
        assert!(authorized(&headers(Some("Bearer s3cret")), "s3cret"));
        assert!(!authorized(&headers(Some("Bearer wrong")), "s3cret"));
        assert!(!authorized(&headers(Some("s3cret")), "s3cret"));
        assert!(!authorized(&headers(None), "s3cret"));
    }
}
