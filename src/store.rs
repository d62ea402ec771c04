use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};

use crate::article::ArticleDocument;

/// Storage capability the pipeline is constructed with. The environment
/// policy (writable vs. read-only serving target) is decided once, by
/// choosing the implementation, instead of branching inside the pipeline.
pub trait ArticleStore {
    /// Current inventory of stored article slugs.
    fn list_slugs(&self) -> Result<Vec<String>>;

    fn read(&self, slug: &str) -> Result<Option<ArticleDocument>>;

    /// Write or overwrite an article and stamp its sync tracker.
    fn write(&self, article: &ArticleDocument, synced_at: DateTime<Utc>) -> Result<()>;

    /// Delete an article and its tracking marker.
    fn delete(&self, slug: &str) -> Result<()>;

    /// Last time this slug was written by a sync, if tracked.
    fn last_synced(&self, slug: &str) -> Result<Option<DateTime<Utc>>>;

    /// Splice new slugs into the persisted sitemap document.
    fn append_sitemap(&self, slugs: &[String], base_url: &str, date: NaiveDate) -> Result<()>;

    fn writable(&self) -> bool;
}

/// Store for serving environments whose storage is immutable at request
/// time: empty inventory, writes and deletes are no-ops. With nothing to
/// diff against, the pipeline naturally reports every parsed row as new.
pub struct ReadOnlyStore;

impl ArticleStore for ReadOnlyStore {
    fn list_slugs(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn read(&self, _slug: &str) -> Result<Option<ArticleDocument>> {
        Ok(None)
    }

    fn write(&self, _article: &ArticleDocument, _synced_at: DateTime<Utc>) -> Result<()> {
        Ok(())
    }

    fn delete(&self, _slug: &str) -> Result<()> {
        Ok(())
    }

    fn last_synced(&self, _slug: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(None)
    }

    fn append_sitemap(&self, _slugs: &[String], _base_url: &str, _date: NaiveDate) -> Result<()> {
        Ok(())
    }

    fn writable(&self) -> bool {
        false
    }
}
