use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/SimplifyJobs/Summer2026-Internships/dev/README.md";
const DEFAULT_BASE_URL: &str = "https://www.internprep.dev";
const DEFAULT_SITE_NAME: &str = "InternPrep";
const DEFAULT_DB_PATH: &str = "data/articles.sqlite";
const DEFAULT_SITEMAP_PATH: &str = "public/sitemap-internships.xml";

/// Pipeline configuration loaded from environment variables (`.env`
/// honored when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub source_url: String,
    pub base_url: String,
    pub site_name: String,
    pub db_path: PathBuf,
    pub sitemap_path: PathBuf,
    pub retention_days: i64,
    /// Bearer secret for the trigger endpoint; `serve` refuses to start
    /// without it.
    pub sync_secret: Option<String>,
    /// Rebuild hook fired in read-only target mode when rows were parsed.
    pub deploy_hook_url: Option<String>,
    /// Downstream cache/view invalidation endpoint.
    pub revalidate_url: Option<String>,
    /// Serving target whose storage is immutable at request time.
    pub read_only_target: bool,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            source_url: env_or("SOURCE_URL", DEFAULT_SOURCE_URL),
            base_url: env_or("BASE_URL", DEFAULT_BASE_URL),
            site_name: env_or("SITE_NAME", DEFAULT_SITE_NAME),
            db_path: PathBuf::from(env_or("DB_PATH", DEFAULT_DB_PATH)),
            sitemap_path: PathBuf::from(env_or("SITEMAP_PATH", DEFAULT_SITEMAP_PATH)),
            retention_days: env_or("RETENTION_DAYS", "30")
                .parse::<i64>()
                .context("RETENTION_DAYS must be a number of days")?,
            sync_secret: std::env::var("SYNC_SECRET").ok(),
            deploy_hook_url: std::env::var("DEPLOY_HOOK_URL").ok(),
            revalidate_url: std::env::var("REVALIDATE_URL").ok(),
            read_only_target: matches!(
                std::env::var("READ_ONLY_TARGET").as_deref(),
                Ok("1") | Ok("true")
            ),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
