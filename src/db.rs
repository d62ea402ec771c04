use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension};

use crate::article::ArticleDocument;
use crate::sitemap;
use crate::store::ArticleStore;

/// Writable article store: sqlite for documents and sync tracking, a plain
/// file for the sitemap document.
pub struct SqliteStore {
    conn: Connection,
    sitemap_path: PathBuf,
}

impl SqliteStore {
    pub fn open(db_path: &Path, sitemap_path: &Path) -> Result<Self> {
        if let Some(dir) = db_path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating store directory {}", dir.display()))?;
        }
        let conn = Connection::open(db_path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        init_schema(&conn)?;
        Ok(Self {
            conn,
            sitemap_path: sitemap_path.to_path_buf(),
        })
    }

    /// In-memory store for tests.
    #[cfg(test)]
    pub fn open_in_memory(sitemap_path: &Path) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self {
            conn,
            sitemap_path: sitemap_path.to_path_buf(),
        })
    }

    pub fn article_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn latest_sync(&self) -> Result<Option<DateTime<Utc>>> {
        let ts: Option<String> = self
            .conn
            .query_row("SELECT MAX(synced_at) FROM sync_tracker", [], |row| row.get(0))?;
        ts.map(|t| parse_timestamp(&t)).transpose()
    }

}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS articles (
            slug       TEXT PRIMARY KEY,
            document   TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sync_tracker (
            slug      TEXT PRIMARY KEY,
            synced_at TEXT NOT NULL
        );
        ",
    )?;
    Ok(())
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("bad timestamp in store: {raw}"))?
        .with_timezone(&Utc))
}

impl ArticleStore for SqliteStore {
    fn list_slugs(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT slug FROM articles ORDER BY slug")?;
        let slugs = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(slugs)
    }

    fn read(&self, slug: &str) -> Result<Option<ArticleDocument>> {
        let json: Option<String> = self
            .conn
            .query_row("SELECT document FROM articles WHERE slug = ?1", [slug], |row| row.get(0))
            .optional()?;
        json.map(|j| {
            serde_json::from_str(&j).with_context(|| format!("stored article {slug} is not valid JSON"))
        })
        .transpose()
    }

    fn write(&self, article: &ArticleDocument, synced_at: DateTime<Utc>) -> Result<()> {
        let json = serde_json::to_string_pretty(article)?;
        let ts = synced_at.to_rfc3339();
        self.conn.execute(
            "INSERT INTO articles (slug, document, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(slug) DO UPDATE SET document = excluded.document, updated_at = excluded.updated_at",
            rusqlite::params![article.slug, json, ts],
        )?;
        self.conn.execute(
            "INSERT INTO sync_tracker (slug, synced_at) VALUES (?1, ?2)
             ON CONFLICT(slug) DO UPDATE SET synced_at = excluded.synced_at",
            rusqlite::params![article.slug, ts],
        )?;
        Ok(())
    }

    fn delete(&self, slug: &str) -> Result<()> {
        self.conn.execute("DELETE FROM articles WHERE slug = ?1", [slug])?;
        self.conn.execute("DELETE FROM sync_tracker WHERE slug = ?1", [slug])?;
        Ok(())
    }

    fn last_synced(&self, slug: &str) -> Result<Option<DateTime<Utc>>> {
        let ts: Option<String> = self
            .conn
            .query_row("SELECT synced_at FROM sync_tracker WHERE slug = ?1", [slug], |row| {
                row.get(0)
            })
            .optional()?;
        ts.map(|t| parse_timestamp(&t)).transpose()
    }

    fn append_sitemap(&self, slugs: &[String], base_url: &str, date: NaiveDate) -> Result<()> {
        let existing = match std::fs::read_to_string(&self.sitemap_path) {
            Ok(xml) => Some(xml),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("reading sitemap {}", self.sitemap_path.display())
                })
            }
        };
        let updated = sitemap::append_entries(existing.as_deref(), slugs, base_url, date);
        if let Some(dir) = self.sitemap_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.sitemap_path, updated)
            .with_context(|| format!("writing sitemap {}", self.sitemap_path.display()))?;
        Ok(())
    }

    fn writable(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::materialize;
    use crate::parser::{Category, ListingRecord};
    use chrono::TimeZone;

    fn record(slug: &str) -> ListingRecord {
        ListingRecord {
            slug: slug.to_string(),
            company: "Acme".to_string(),
            role: "Intern".to_string(),
            location: "NYC".to_string(),
            apply_link: "https://acme.example/apply".to_string(),
            date_posted: "5d".to_string(),
            category: Category::Software,
        }
    }

    fn store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open_in_memory(&dir.path().join("sitemap.xml")).unwrap();
        (dir, store)
    }

    #[test]
    fn write_read_round_trip() {
        let (_dir, store) = store();
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let doc = materialize(&record("acme-intern-nyc"), now, "https://x.example", "X");

        store.write(&doc, now).unwrap();
        assert_eq!(store.list_slugs().unwrap(), vec!["acme-intern-nyc".to_string()]);
        assert_eq!(store.read("acme-intern-nyc").unwrap().unwrap(), doc);
        assert_eq!(store.last_synced("acme-intern-nyc").unwrap(), Some(now));
        assert_eq!(store.read("missing").unwrap(), None);
    }

    #[test]
    fn overwrite_updates_tracker() {
        let (_dir, store) = store();
        let t1 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let t2 = Utc.timestamp_opt(1_700_100_000, 0).unwrap();
        let doc = materialize(&record("acme-intern-nyc"), t1, "https://x.example", "X");

        store.write(&doc, t1).unwrap();
        store.write(&doc, t2).unwrap();
        assert_eq!(store.article_count().unwrap(), 1);
        assert_eq!(store.last_synced("acme-intern-nyc").unwrap(), Some(t2));
        assert_eq!(store.latest_sync().unwrap(), Some(t2));
    }

    #[test]
    fn delete_removes_article_and_tracker() {
        let (_dir, store) = store();
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let doc = materialize(&record("acme-intern-nyc"), now, "https://x.example", "X");

        store.write(&doc, now).unwrap();
        store.delete("acme-intern-nyc").unwrap();
        assert!(store.list_slugs().unwrap().is_empty());
        assert_eq!(store.last_synced("acme-intern-nyc").unwrap(), None);
    }

    #[test]
    fn sitemap_created_then_appended() {
        let (dir, store) = store();
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();

        store
            .append_sitemap(&["a".to_string()], "https://x.example", date)
            .unwrap();
        store
            .append_sitemap(&["b".to_string()], "https://x.example", date)
            .unwrap();

        let xml = std::fs::read_to_string(dir.path().join("sitemap.xml")).unwrap();
        let urls = sitemap::parse_urlset(&xml).unwrap();
        assert_eq!(urls.len(), 4); // root + index + a + b
        assert!(urls.contains(&"https://x.example/opportunities/b".to_string()));
    }
}
