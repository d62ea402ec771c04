mod article;
mod config;
mod db;
mod errors;
mod fetch;
mod parser;
mod pipeline;
mod reconcile;
mod server;
mod sitemap;
mod slug;
mod store;

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::db::SqliteStore;
use crate::slug::SlugSet;
use crate::store::{ArticleStore, ReadOnlyStore};

#[derive(Parser)]
#[command(name = "intern_sync", about = "Internship listing sync pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the source document and sync the article store
    Sync {
        /// Treat the target store as read-only (report only, fire rebuild hook)
        #[arg(long)]
        read_only: bool,
    },
    /// Serve the HTTP trigger endpoint
    Serve {
        /// Port to listen on (default: PORT env or 8080)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Materialize articles from a local source document, skipping existing slugs
    Generate {
        /// Path to a saved source document
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Show store and sitemap statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let cfg = Config::from_env()?;

    let result = match cli.command {
        Commands::Sync { read_only } => {
            let summary = if read_only || cfg.read_only_target {
                pipeline::run(&cfg, &ReadOnlyStore).await?
            } else {
                let store = SqliteStore::open(&cfg.db_path, &cfg.sitemap_path)?;
                pipeline::run(&cfg, &store).await?
            };
            println!(
                "Synced {} listings ({} new, {} deleted).",
                summary.synced, summary.new, summary.deleted
            );
            if !summary.new_slugs.is_empty() {
                println!("New: {}", summary.new_slugs.join(", "));
            }
            if !summary.deleted_slugs.is_empty() {
                println!("Deleted: {}", summary.deleted_slugs.join(", "));
            }
            Ok(())
        }
        Commands::Serve { port } => {
            let port = port.unwrap_or(cfg.port);
            server::serve(cfg, port).await
        }
        Commands::Generate { input } => {
            let doc = std::fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let store = SqliteStore::open(&cfg.db_path, &cfg.sitemap_path)?;
            let counts = generate_articles(&doc, &store, &cfg)?;
            counts.print();
            Ok(())
        }
        Commands::Stats => {
            let store = SqliteStore::open(&cfg.db_path, &cfg.sitemap_path)?;
            let last = store
                .latest_sync()?
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "never".to_string());
            let sitemap_urls = match std::fs::read_to_string(&cfg.sitemap_path) {
                Ok(xml) => sitemap::parse_urlset(&xml)?.len(),
                Err(_) => 0,
            };
            println!("Articles:     {}", store.article_count()?);
            println!("Last sync:    {}", last);
            println!("Sitemap URLs: {}", sitemap_urls);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

struct GenerateCounts {
    parsed: usize,
    written: usize,
    skipped: usize,
}

impl GenerateCounts {
    fn print(&self) {
        println!(
            "Parsed {} listings: {} written, {} already present.",
            self.parsed, self.written, self.skipped
        );
    }
}

/// Batch-materialize articles from a local document. Each record owns
/// exactly one output slug, so the materialization map is a free-for-all;
/// only the store writes run sequentially.
fn generate_articles(
    doc: &str,
    store: &SqliteStore,
    cfg: &Config,
) -> anyhow::Result<GenerateCounts> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let mut slugs = SlugSet::new();
    let records = parser::parse_document(doc, &mut slugs);
    if records.is_empty() {
        anyhow::bail!("parsed 0 rows from the input document");
    }

    let existing: HashSet<String> = store.list_slugs()?.into_iter().collect();
    let now = Utc::now();

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec})")?
            .progress_chars("=> "),
    );

    let mut written = 0usize;
    let mut skipped = 0usize;
    for chunk in records.chunks(100) {
        let articles: Vec<_> = chunk
            .par_iter()
            .map(|r| article::materialize(r, now, &cfg.base_url, &cfg.site_name))
            .collect();
        for a in &articles {
            if existing.contains(&a.slug) {
                skipped += 1;
            } else {
                store.write(a, now)?;
                written += 1;
            }
            pb.inc(1);
        }
    }
    pb.finish_and_clear();

    Ok(GenerateCounts {
        parsed: records.len(),
        written,
        skipped,
    })
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
