//! Browser-driven collection of image candidates, one keyword at a time.
//!
//! Each keyword gets a fresh browser session: launch, navigate to the image
//! results, run the scroll-collect loop, tear the browser down. Collection
//! is best-effort; an automation failure abandons the keyword rather than
//! retrying.

mod browser;
mod heuristics;
mod page;
mod scroll;
mod types;

pub use browser::{BrowserWrapper, launch_browser};
pub use page::{ResultsPage, SearchPage};
pub use scroll::run_scroll_loop;
pub use types::{
    CollectError, DEFAULT_MAX_SCROLLS, ImageCandidate, MAX_STAGNANT_PASSES, ScrollOptions,
    SRC_LENGTH_THRESHOLD,
};

use anyhow::Context;
use tracing::info;

use crate::store::ImageStore;

/// Collect image candidates for one keyword into the store.
///
/// Returns the number of candidates found in the final scroll pass. The
/// browser session is scoped to this call and shut down on every exit path,
/// success or failure.
pub async fn collect_keyword(
    store: &ImageStore,
    keyword: &str,
    opts: &ScrollOptions,
    headless: bool,
) -> Result<usize, CollectError> {
    info!("Starting search: {keyword}");

    let browser = launch_browser(headless)
        .await
        .map_err(CollectError::Browser)?;

    let result = run_session(&browser, store, keyword, opts).await;

    browser.shutdown().await;

    result
}

async fn run_session(
    browser: &BrowserWrapper,
    store: &ImageStore,
    keyword: &str,
    opts: &ScrollOptions,
) -> Result<usize, CollectError> {
    let page = browser.new_page().await.map_err(CollectError::Browser)?;
    let results = ResultsPage::new(page);

    results
        .navigate(keyword)
        .await
        .context("Navigation failed")
        .map_err(CollectError::Browser)?;

    // Let the initial lazy-loaded results render before extracting
    tokio::time::sleep(opts.settle_delay).await;

    run_scroll_loop(&results, store, keyword, opts).await
}
