//! DOM-facing operations for one image-search results page.
//!
//! Google renders image results via JavaScript after navigation, so all
//! extraction goes through `page.evaluate` against the live DOM rather
//! than parsing response HTML.

use anyhow::{Context, Result};
use chromiumoxide::page::Page;
use tracing::debug;
use url::Url;

use super::heuristics;
use super::types::{CLICKABLE_SELECTOR, ImageCandidate, SEARCH_URL};

/// Collects `(src, alt)` from every rendered `<img>`, preferring the live
/// `src` attribute over the `data-src` lazy-load placeholder.
const EXTRACT_IMAGES_SCRIPT: &str = r#"
(() => {
    const results = [];
    document.querySelectorAll('img').forEach((img) => {
        const src = img.src || img.getAttribute('data-src') || '';
        const alt = img.alt || '';
        if (src) {
            results.push({ src, alt });
        }
    });
    return results;
})()
"#;

/// Scrolls down by two viewport heights and reports the resulting document
/// height, which the loop uses for its stagnation bookkeeping.
const SCROLL_AND_MEASURE_SCRIPT: &str = r#"
(() => {
    window.scrollBy(0, window.innerHeight * 2);
    return document.body.scrollHeight;
})()
"#;

const MEASURE_HEIGHT_SCRIPT: &str = "document.body.scrollHeight";

/// Operations the scroll loop needs from a live results page.
///
/// The production implementation drives chromiumoxide; tests substitute a
/// scripted page so termination behavior can be exercised without Chromium.
#[allow(async_fn_in_trait)]
pub trait SearchPage {
    /// Every image-like element currently in the rendered document.
    async fn extract_candidates(&self) -> Result<Vec<ImageCandidate>>;

    /// Current document height, without scrolling.
    async fn document_height(&self) -> Result<i64>;

    /// Scroll down by two viewport heights, then report document height.
    async fn scroll_and_measure(&self) -> Result<i64>;

    /// Find and click a show-more pagination control if one is present.
    /// Returns `true` iff a control was clicked.
    async fn click_show_more(&self) -> Result<bool>;
}

/// A chromiumoxide page navigated to Google's image results for one keyword.
pub struct ResultsPage {
    page: Page,
}

impl ResultsPage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// Image-search URL for a keyword, locale pinned to English so the
    /// results shape (and the show-more button label) stays stable.
    pub fn search_url(keyword: &str) -> Result<Url> {
        let mut url = Url::parse(SEARCH_URL).context("Failed to parse search base URL")?;
        url.query_pairs_mut()
            .append_pair("q", keyword)
            .append_pair("tbm", "isch")
            .append_pair("hl", "en");
        Ok(url)
    }

    /// Navigate to the image results for `keyword` and wait for the
    /// initial load.
    pub async fn navigate(&self, keyword: &str) -> Result<()> {
        let url = Self::search_url(keyword)?;
        debug!("Navigating to image search: {url}");

        self.page
            .goto(url.as_str())
            .await
            .context("Failed to navigate to image search")?;
        self.page
            .wait_for_navigation()
            .await
            .context("Failed to wait for initial page load")?;

        Ok(())
    }
}

impl SearchPage for ResultsPage {
    async fn extract_candidates(&self) -> Result<Vec<ImageCandidate>> {
        let js_result = self
            .page
            .evaluate(EXTRACT_IMAGES_SCRIPT)
            .await
            .context("Failed to execute image extraction script")?;

        match js_result.into_value::<serde_json::Value>() {
            Ok(value) => {
                serde_json::from_value(value).context("Failed to parse image candidates from JS result")
            }
            Err(e) => Err(anyhow::anyhow!("Failed to get extraction value: {e}")),
        }
    }

    async fn document_height(&self) -> Result<i64> {
        let js_result = self
            .page
            .evaluate(MEASURE_HEIGHT_SCRIPT)
            .await
            .context("Failed to read document height")?;

        js_result
            .into_value::<i64>()
            .map_err(|e| anyhow::anyhow!("Failed to parse document height: {e}"))
    }

    async fn scroll_and_measure(&self) -> Result<i64> {
        let js_result = self
            .page
            .evaluate(SCROLL_AND_MEASURE_SCRIPT)
            .await
            .context("Failed to execute scroll script")?;

        js_result
            .into_value::<i64>()
            .map_err(|e| anyhow::anyhow!("Failed to parse post-scroll document height: {e}"))
    }

    async fn click_show_more(&self) -> Result<bool> {
        // No clickable elements at all is a normal state, not an error
        let Ok(controls) = self.page.find_elements(CLICKABLE_SELECTOR).await else {
            return Ok(false);
        };

        for control in controls {
            let Ok(Some(text)) = control.inner_text().await else {
                continue;
            };

            if heuristics::is_show_more_label(&text) {
                control
                    .click()
                    .await
                    .context("Failed to click show-more control")?;
                debug!("Clicked show-more control: {text:?}");
                return Ok(true);
            }
        }

        Ok(false)
    }
}
