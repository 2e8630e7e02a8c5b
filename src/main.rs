use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use toadman::app::{App, AppEvent};
use toadman::config::Config;
use toadman::pipeline::AggregationPipeline;
use toadman::sources::build_client;
use toadman::storage::TtlCache;
use toadman::ui;
use toadman::view_model::ViewModel;

/// Get the data directory path (~/.toadman/)
fn get_data_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".toadman"))
}

#[derive(Parser, Debug)]
#[command(
    name = "toadman",
    about = "Terminal news desk for agentic coding tools: RSS feeds and Hacker News in one list"
)]
struct Args {
    /// Bypass the cache and fetch fresh articles
    #[arg(long)]
    refresh: bool,

    /// Delete the article cache before starting
    #[arg(long)]
    clear_cache: bool,

    /// Override the recency window in days (0 = today only)
    #[arg(long, value_name = "DAYS")]
    window_days: Option<u32>,

    /// Use an alternate config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let data_dir = get_data_dir()?;
    let cache_dir = data_dir.join("cache");
    let export_dir = data_dir.join("exports");
    for dir in [&cache_dir, &export_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    // User-only access to cached articles and exports
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) =
            std::fs::set_permissions(&data_dir, std::fs::Permissions::from_mode(0o700))
        {
            tracing::warn!(
                path = %data_dir.display(),
                error = %e,
                "Failed to set data directory permissions to 0700"
            );
        }
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| data_dir.join("config.toml"));
    let mut config = Config::load_or_init(&config_path);
    if let Some(days) = args.window_days {
        config.window_days = days;
    }

    let cache = TtlCache::in_dir(&cache_dir, config.cache.expiry());
    if args.clear_cache {
        cache.clear().context("Failed to clear cache")?;
        eprintln!("Cache cleared.");
    }

    let client = build_client().context("Failed to build HTTP client")?;
    let pipeline = Arc::new(AggregationPipeline::new(&config, client, cache));

    eprintln!("Fetching articles...");
    let articles = pipeline.get_articles(args.refresh).await;
    tracing::info!(articles = articles.len(), "Initial load complete");

    let mut app = App::new(
        ViewModel::new(articles),
        pipeline,
        config.summarizer.clone(),
        export_dir,
    );

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    ui::run(&mut app, event_tx, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}
