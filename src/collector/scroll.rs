//! The scroll-and-collect loop.
//!
//! Repeatedly extracts image candidates from the rendered results page,
//! persists survivors of the placeholder filter, and scrolls for more.
//! Terminates when the document height stops growing for
//! [`MAX_STAGNANT_PASSES`] consecutive passes or the scroll ceiling is hit.

use tracing::{info, warn};

use super::heuristics;
use super::page::SearchPage;
use super::types::{CollectError, MAX_STAGNANT_PASSES, ScrollOptions};
use crate::store::ImageStore;

/// Drive the scroll-collect loop for one keyword against an already
/// navigated results page.
///
/// Returns the number of candidates that survived the filter in the final
/// pass. The baseline document height is read before the first pass so a
/// page that never grows counts every pass as stagnant.
pub async fn run_scroll_loop<P: SearchPage>(
    page: &P,
    store: &ImageStore,
    keyword: &str,
    opts: &ScrollOptions,
) -> Result<usize, CollectError> {
    let mut last_height = page.document_height().await.map_err(CollectError::Browser)?;
    let mut stagnant_passes: u32 = 0;
    let mut pass = 0usize;
    let mut last_pass_size = 0usize;

    while stagnant_passes < MAX_STAGNANT_PASSES && pass < opts.max_scrolls {
        pass += 1;

        let candidates = page
            .extract_candidates()
            .await
            .map_err(CollectError::Browser)?;

        let mut kept = 0usize;
        for candidate in candidates {
            if !heuristics::is_probable_image(&candidate.src) {
                continue;
            }
            kept += 1;

            let alt = (!candidate.alt.is_empty()).then_some(candidate.alt.as_str());
            store
                .insert(keyword, &candidate.src, alt)
                .await
                .map_err(CollectError::Store)?;
        }
        last_pass_size = kept;

        let stats = store.stats().await.map_err(CollectError::Store)?;
        info!(
            "  scroll {}/{} - {} candidates this pass, {} records total",
            pass, opts.max_scrolls, kept, stats.total
        );

        let height = page
            .scroll_and_measure()
            .await
            .map_err(CollectError::Browser)?;

        if height == last_height {
            stagnant_passes += 1;

            // A successful click counts as evidence of further content,
            // whatever the click actually did.
            match page.click_show_more().await {
                Ok(true) => {
                    tokio::time::sleep(opts.recovery_delay).await;
                    stagnant_passes = 0;
                }
                Ok(false) => {}
                Err(e) => warn!("Show-more recovery failed: {e:#}"),
            }
        } else {
            stagnant_passes = 0;
        }
        last_height = height;

        tokio::time::sleep(opts.pacing_delay).await;
    }

    Ok(last_pass_size)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use anyhow::Result;
    use tempfile::TempDir;

    use super::*;
    use crate::collector::types::ImageCandidate;

    /// Scripted page: serves a fixed candidate set every pass and a
    /// pre-programmed sequence of post-scroll heights.
    struct ScriptedPage {
        baseline_height: i64,
        heights: Mutex<VecDeque<i64>>,
        last_height: Mutex<i64>,
        candidates: Vec<ImageCandidate>,
        has_show_more: bool,
        passes: AtomicUsize,
        clicks: AtomicUsize,
    }

    impl ScriptedPage {
        fn new(baseline_height: i64, heights: Vec<i64>) -> Self {
            Self {
                baseline_height,
                heights: Mutex::new(heights.into()),
                last_height: Mutex::new(baseline_height),
                candidates: Vec::new(),
                has_show_more: false,
                passes: AtomicUsize::new(0),
                clicks: AtomicUsize::new(0),
            }
        }

        fn with_candidates(mut self, candidates: Vec<ImageCandidate>) -> Self {
            self.candidates = candidates;
            self
        }

        fn with_show_more(mut self) -> Self {
            self.has_show_more = true;
            self
        }
    }

    impl SearchPage for ScriptedPage {
        async fn extract_candidates(&self) -> Result<Vec<ImageCandidate>> {
            self.passes.fetch_add(1, Ordering::SeqCst);
            Ok(self.candidates.clone())
        }

        async fn document_height(&self) -> Result<i64> {
            Ok(self.baseline_height)
        }

        async fn scroll_and_measure(&self) -> Result<i64> {
            let mut last = self.last_height.lock().unwrap();
            if let Some(next) = self.heights.lock().unwrap().pop_front() {
                *last = next;
            }
            Ok(*last)
        }

        async fn click_show_more(&self) -> Result<bool> {
            if self.has_show_more {
                self.clicks.fetch_add(1, Ordering::SeqCst);
            }
            Ok(self.has_show_more)
        }
    }

    fn instant_opts(max_scrolls: usize) -> ScrollOptions {
        ScrollOptions {
            max_scrolls,
            settle_delay: Duration::ZERO,
            pacing_delay: Duration::ZERO,
            recovery_delay: Duration::ZERO,
        }
    }

    async fn temp_store() -> Result<(TempDir, ImageStore)> {
        let dir = TempDir::new()?;
        let store = ImageStore::open(&dir.path().join("images.sqlite")).await?;
        Ok((dir, store))
    }

    fn long_src(tag: &str) -> String {
        // Comfortably over the placeholder-length threshold
        format!("https://img.example/{tag}/{}", "a".repeat(120))
    }

    #[tokio::test]
    async fn flat_height_stops_after_three_passes() -> Result<()> {
        let (_dir, store) = temp_store().await?;

        // Height stays at 1000 through every pass and there is no
        // show-more control: three stagnant passes, then stop, well
        // before the configured ceiling of 15.
        let page = ScriptedPage::new(1000, vec![1000, 1000, 1000, 1000, 1000]);
        run_scroll_loop(&page, &store, "k", &instant_opts(15)).await?;

        assert_eq!(page.passes.load(Ordering::SeqCst), 3);
        Ok(())
    }

    #[tokio::test]
    async fn max_scrolls_bounds_a_growing_page() -> Result<()> {
        let (_dir, store) = temp_store().await?;

        let page = ScriptedPage::new(1000, vec![2000, 3000, 4000, 5000, 6000]);
        run_scroll_loop(&page, &store, "k", &instant_opts(2)).await?;

        assert_eq!(page.passes.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test]
    async fn show_more_click_resets_stagnation() -> Result<()> {
        let (_dir, store) = temp_store().await?;

        // Flat height but a clickable show-more control on every stagnant
        // pass: the counter keeps resetting and only max_scrolls stops us.
        let page =
            ScriptedPage::new(1000, vec![1000, 1000, 1000, 1000, 1000, 1000]).with_show_more();
        run_scroll_loop(&page, &store, "k", &instant_opts(5)).await?;

        assert_eq!(page.passes.load(Ordering::SeqCst), 5);
        assert!(page.clicks.load(Ordering::SeqCst) >= 1);
        Ok(())
    }

    #[tokio::test]
    async fn candidates_are_filtered_and_deduplicated() -> Result<()> {
        let (_dir, store) = temp_store().await?;

        let candidates = vec![
            ImageCandidate {
                src: long_src("one"),
                alt: "first".into(),
            },
            ImageCandidate {
                src: long_src("two"),
                alt: String::new(),
            },
            // Placeholder-length src must be discarded before persistence
            ImageCandidate {
                src: "https://img.example/icon.png".into(),
                alt: "icon".into(),
            },
        ];

        // Two passes re-observe the same candidates; the store ends up
        // with one row per distinct surviving src.
        let page = ScriptedPage::new(1000, vec![2000, 2000, 2000, 2000])
            .with_candidates(candidates);
        let final_pass = run_scroll_loop(&page, &store, "k", &instant_opts(15)).await?;

        assert_eq!(final_pass, 2);
        let stats = store.stats().await?;
        assert_eq!(stats.total, 2);

        // Empty alt is stored as NULL
        let pending = store.list_pending(10).await?;
        assert!(pending.iter().any(|r| r.alt.is_none()));
        Ok(())
    }
}
