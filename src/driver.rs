//! Sequential keyword orchestration.
//!
//! Iterates the configured keyword list, collecting one keyword at a time
//! with a fresh browser session each. Two stop conditions only: the
//! per-keyword scroll ceiling (inside the collector) and the global
//! record-count cap checked after every keyword.

use anyhow::Result;
use tracing::{error, info};

use crate::collector::{self, CollectError, ScrollOptions};
use crate::config::HarvestConfig;
use crate::store::ImageStore;

/// Per-keyword collection strategy.
///
/// The production implementation launches a real browser per keyword;
/// tests substitute a scripted collector so the driver's stop conditions
/// can be exercised without Chromium.
#[allow(async_fn_in_trait)]
pub trait KeywordCollector {
    /// Collect candidates for one keyword into the store. Returns the size
    /// of the final scroll pass.
    async fn collect(&self, store: &ImageStore, keyword: &str) -> Result<usize, CollectError>;
}

/// Launches one fresh Chromium session per keyword.
pub struct BrowserCollector {
    pub scroll: ScrollOptions,
    pub headless: bool,
}

impl KeywordCollector for BrowserCollector {
    async fn collect(&self, store: &ImageStore, keyword: &str) -> Result<usize, CollectError> {
        collector::collect_keyword(store, keyword, &self.scroll, self.headless).await
    }
}

/// Run a full harvest over the configured keyword list.
///
/// A keyword whose collection fails with a browser error is logged and
/// skipped; it is not retried within this run. A store error aborts the run
/// since no fallback store exists. Returns the final total record count.
pub async fn run_harvest<C: KeywordCollector>(
    collector: &C,
    store: &ImageStore,
    config: &HarvestConfig,
) -> Result<i64> {
    let initial = store.stats().await?;
    info!(
        "Harvesting {} keywords ({} records already in store, cap {})",
        config.keywords.len(),
        initial.total,
        config.total_cap
    );

    for keyword in &config.keywords {
        match collector.collect(store, keyword).await {
            Ok(final_pass) => {
                info!("Finished '{keyword}' ({final_pass} candidates in final pass)");
            }
            Err(CollectError::Browser(e)) => {
                error!("Abandoning keyword '{keyword}': {e:#}");
            }
            Err(e @ CollectError::Store(_)) => return Err(e.into()),
        }

        let stats = store.stats().await?;
        let progress = (stats.total * 100 / config.total_cap).min(100);
        info!(
            "==> {} records collected ({progress}% of {})",
            stats.total, config.total_cap
        );

        if stats.total >= config.total_cap {
            info!("Record cap reached, stopping run early");
            break;
        }

        tokio::time::sleep(config.keyword_delay).await;
    }

    let final_stats = store.stats().await?;
    info!(
        "Collection complete: {} records total ({} downloaded, {} processed)",
        final_stats.total, final_stats.downloaded, final_stats.processed
    );

    Ok(final_stats.total)
}
