use reqwest::header;
use tracing::{info, warn};

use crate::errors::SyncError;

/// Fetch the raw source document, bypassing intermediary caches. A failure
/// here aborts the run before anything is written.
pub async fn fetch_source(url: &str) -> Result<String, SyncError> {
    info!("Fetching source document: {url}");
    let client = reqwest::Client::new();
    let text = client
        .get(url)
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::PRAGMA, "no-cache")
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(text)
}

/// Fire the rebuild hook: a single empty POST. Failures are logged, never
/// propagated.
pub async fn trigger_rebuild(url: &str) {
    info!("Triggering rebuild hook");
    let client = reqwest::Client::new();
    match client.post(url).send().await {
        Ok(resp) if !resp.status().is_success() => {
            warn!("Rebuild hook returned {}", resp.status());
        }
        Err(e) => warn!("Rebuild hook failed: {e}"),
        _ => {}
    }
}

/// Ask the serving layer to refresh cached views for the affected routes.
/// Failures are logged, never propagated.
pub async fn revalidate_views(url: &str, paths: &[&str]) {
    let body = serde_json::json!({ "paths": paths }).to_string();
    let client = reqwest::Client::new();
    match client
        .post(url)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
    {
        Ok(resp) if !resp.status().is_success() => {
            warn!("Revalidation returned {}", resp.status());
        }
        Err(e) => warn!("Revalidation failed: {e}"),
        _ => {}
    }
}
