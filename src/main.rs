use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use imageharvest::{BrowserCollector, HarvestConfig, ImageStore, ScrollOptions, keywords, run_harvest};

#[derive(Parser, Debug)]
#[command(author, version, about = "Collect candidate image URLs for a keyword list into SQLite")]
struct Args {
    /// Keyword file, one search term per line (`#` comments allowed).
    /// Falls back to the built-in keyword list.
    #[arg(short, long)]
    keywords: Option<PathBuf>,

    /// SQLite database path
    #[arg(long, default_value = "data.db")]
    db_path: PathBuf,

    /// Scroll-pass ceiling per keyword
    #[arg(long, default_value_t = 15)]
    max_scrolls: usize,

    /// Stop the run once this many records have been collected
    #[arg(long, default_value_t = 5000)]
    total_cap: i64,

    /// Run the browser with a visible window
    #[arg(long)]
    headed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let keywords = match &args.keywords {
        Some(path) => keywords::load_keyword_file(path)?,
        None => keywords::DEFAULT_KEYWORDS
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
    };

    let config = HarvestConfig::new(args.db_path)
        .keywords(keywords)
        .max_scrolls(args.max_scrolls)
        .total_cap(args.total_cap)
        .headless(!args.headed);

    info!("Image harvest starting ({} keywords)", config.keywords.len());

    let store = ImageStore::open(&config.db_path).await?;
    let collector = BrowserCollector {
        scroll: ScrollOptions {
            max_scrolls: config.max_scrolls,
            ..ScrollOptions::default()
        },
        headless: config.headless,
    };

    let total = run_harvest(&collector, &store, &config).await?;
    store.close().await;

    info!("Done: {total} image records");
    Ok(())
}
