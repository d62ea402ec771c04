use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::article::{self, ArticleDocument};
use crate::config::Config;
use crate::errors::SyncError;
use crate::fetch;
use crate::parser;
use crate::reconcile;
use crate::slug::SlugSet;
use crate::store::ArticleStore;

/// Serving routes whose cached views depend on the article store.
pub const AFFECTED_ROUTES: &[&str] = &["/opportunities", "/opportunities/[slug]"];

/// At most this many slugs are itemized in the summary.
const SUMMARY_SLUG_CAP: usize = 25;

const MATERIALIZE_CHUNK: usize = 100;

#[derive(Debug, Serialize)]
pub struct SyncSummary {
    pub synced: usize,
    pub new: usize,
    pub deleted: usize,
    #[serde(rename = "newSlugs")]
    pub new_slugs: Vec<String>,
    #[serde(rename = "deletedSlugs")]
    pub deleted_slugs: Vec<String>,
}

/// One full sync: fetch, run against the store, then fire the non-fatal
/// downstream notifications.
pub async fn run(cfg: &Config, store: &dyn ArticleStore) -> Result<SyncSummary, SyncError> {
    let doc = fetch::fetch_source(&cfg.source_url).await?;
    let summary = run_on_document(&doc, store, cfg, Utc::now())?;

    if !store.writable() && summary.synced > 0 {
        if let Some(hook) = &cfg.deploy_hook_url {
            fetch::trigger_rebuild(hook).await;
        }
    }
    if let Some(url) = &cfg.revalidate_url {
        fetch::revalidate_views(url, AFFECTED_ROUTES).await;
    }

    Ok(summary)
}

/// The run body, fetchless and hookless so scenarios are testable against a
/// document string. One linear pass: parse, reconcile, write current
/// records, prune stale removed slugs, splice new slugs into the sitemap.
pub fn run_on_document(
    doc: &str,
    store: &dyn ArticleStore,
    cfg: &Config,
    now: DateTime<Utc>,
) -> Result<SyncSummary, SyncError> {
    let mut slugs = SlugSet::new();
    let records = parser::parse_document(doc, &mut slugs);
    if records.is_empty() {
        return Err(SyncError::EmptyParse);
    }

    let current: HashSet<String> = records.iter().map(|r| r.slug.clone()).collect();
    let existing: HashSet<String> = store.list_slugs()?.into_iter().collect();
    let diff = reconcile::reconcile(&current, &existing);

    // Materialize in parallel per chunk, write sequentially. A bad record
    // is logged and skipped; it never aborts the batch.
    let mut written = 0usize;
    for chunk in records.chunks(MATERIALIZE_CHUNK) {
        let articles: Vec<ArticleDocument> = chunk
            .par_iter()
            .map(|r| article::materialize(r, now, &cfg.base_url, &cfg.site_name))
            .collect();
        for a in &articles {
            match store.write(a, now) {
                Ok(()) => written += 1,
                Err(e) => warn!("Skipping write for {}: {e}", a.slug),
            }
        }
    }

    // Removed slugs are only pruned once stale past the retention window
    // and confirmed absent from the current parse.
    let cutoff = now - Duration::days(cfg.retention_days);
    let mut removed: Vec<&String> = diff.removed.iter().collect();
    removed.sort();

    let mut deleted_slugs = Vec::new();
    for slug in removed {
        let stale = match store.last_synced(slug)? {
            Some(ts) => ts < cutoff,
            None => {
                warn!("No sync tracker for removed slug {slug}; retaining");
                false
            }
        };
        if stale && !current.contains(slug.as_str()) {
            match store.delete(slug) {
                Ok(()) => deleted_slugs.push(slug.clone()),
                Err(e) => warn!("Failed to delete {slug}: {e}"),
            }
        }
    }

    // New slugs reported in parse order.
    let new_slugs: Vec<String> = records
        .iter()
        .map(|r| &r.slug)
        .filter(|s| diff.new.contains(*s))
        .cloned()
        .collect();
    if !new_slugs.is_empty() {
        store.append_sitemap(&new_slugs, &cfg.base_url, now.date_naive())?;
    }

    info!(
        synced = records.len(),
        written,
        new = new_slugs.len(),
        kept = diff.kept.len(),
        deleted = deleted_slugs.len(),
        "Sync pass complete"
    );

    Ok(SyncSummary {
        synced: records.len(),
        new: new_slugs.len(),
        deleted: deleted_slugs.len(),
        new_slugs: cap(new_slugs),
        deleted_slugs: cap(deleted_slugs),
    })
}

fn cap(mut slugs: Vec<String>) -> Vec<String> {
    slugs.truncate(SUMMARY_SLUG_CAP);
    slugs
}
