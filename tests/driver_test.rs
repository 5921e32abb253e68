//! Driver stop-condition tests using a scripted collector, so no browser
//! is involved.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use tempfile::TempDir;

use imageharvest::{CollectError, HarvestConfig, ImageStore, KeywordCollector, run_harvest};

/// Inserts a fixed number of unique records per keyword, optionally failing
/// on chosen keywords.
struct ScriptedCollector {
    records_per_keyword: usize,
    fail_on: Vec<String>,
    fatal_on: Vec<String>,
    calls: AtomicUsize,
}

impl ScriptedCollector {
    fn new(records_per_keyword: usize) -> Self {
        Self {
            records_per_keyword,
            fail_on: Vec::new(),
            fatal_on: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl KeywordCollector for ScriptedCollector {
    async fn collect(&self, store: &ImageStore, keyword: &str) -> Result<usize, CollectError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fatal_on.iter().any(|k| k == keyword) {
            return Err(CollectError::Store(anyhow::anyhow!("disk gone")));
        }
        if self.fail_on.iter().any(|k| k == keyword) {
            return Err(CollectError::Browser(anyhow::anyhow!("navigation failed")));
        }

        for i in 0..self.records_per_keyword {
            store
                .insert(keyword, &format!("https://img.example/{keyword}/{i}"), None)
                .await
                .map_err(CollectError::Store)?;
        }
        Ok(self.records_per_keyword)
    }
}

async fn temp_store() -> Result<(TempDir, ImageStore)> {
    let dir = TempDir::new()?;
    let store = ImageStore::open(&dir.path().join("images.sqlite")).await?;
    Ok((dir, store))
}

fn config(keywords: usize, total_cap: i64) -> HarvestConfig {
    HarvestConfig::new("unused.db")
        .keywords((0..keywords).map(|i| format!("keyword-{i:02}")).collect())
        .total_cap(total_cap)
        .keyword_delay(Duration::ZERO)
}

#[tokio::test]
async fn global_cap_stops_the_run_early() -> Result<()> {
    let (_dir, store) = temp_store().await?;

    // 500 records per keyword against a cap of 5000: the cap is reached
    // after keyword 10 of 50, so keyword 11 is never collected.
    let collector = ScriptedCollector::new(500);
    let total = run_harvest(&collector, &store, &config(50, 5000)).await?;

    assert_eq!(total, 5000);
    assert_eq!(collector.calls.load(Ordering::SeqCst), 10);
    Ok(())
}

#[tokio::test]
async fn failed_keyword_is_skipped_not_retried() -> Result<()> {
    let (_dir, store) = temp_store().await?;

    let mut collector = ScriptedCollector::new(10);
    collector.fail_on.push("keyword-01".to_string());

    let total = run_harvest(&collector, &store, &config(3, 5000)).await?;

    // All three keywords were attempted exactly once; the failed one
    // contributed nothing.
    assert_eq!(collector.calls.load(Ordering::SeqCst), 3);
    assert_eq!(total, 20);
    Ok(())
}

#[tokio::test]
async fn store_failure_aborts_the_run() -> Result<()> {
    let (_dir, store) = temp_store().await?;

    let mut collector = ScriptedCollector::new(10);
    collector.fatal_on.push("keyword-01".to_string());

    let result = run_harvest(&collector, &store, &config(3, 5000)).await;

    assert!(result.is_err());
    // Keyword 2 was never reached
    assert_eq!(collector.calls.load(Ordering::SeqCst), 2);
    Ok(())
}

#[tokio::test]
async fn run_reports_preexisting_records_in_total() -> Result<()> {
    let (_dir, store) = temp_store().await?;

    // Records left over from a previous run count toward the cap
    for i in 0..4995 {
        store
            .insert("earlier-run", &format!("https://img.example/old/{i}"), None)
            .await?;
    }

    let collector = ScriptedCollector::new(500);
    let total = run_harvest(&collector, &store, &config(50, 5000)).await?;

    assert_eq!(total, 5495);
    assert_eq!(collector.calls.load(Ordering::SeqCst), 1);
    Ok(())
}
