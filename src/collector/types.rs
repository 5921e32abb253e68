//! Data structures and constants for image collection

use std::time::Duration;

use serde::Deserialize;

// =============================================================================
// Constants
// =============================================================================

/// Google search URL base; the image view is selected via `tbm=isch`
pub const SEARCH_URL: &str = "https://www.google.com/search";

/// Candidates with a `src` at or below this length are treated as
/// non-content placeholders (icons, 1x1 trackers) rather than real images
pub const SRC_LENGTH_THRESHOLD: usize = 100;

/// Consecutive scroll passes with no height growth before giving up on
/// a results page
pub const MAX_STAGNANT_PASSES: u32 = 3;

/// Default scroll-pass ceiling per keyword
pub const DEFAULT_MAX_SCROLLS: usize = 15;

/// Button labels Google uses for the end-of-results pagination control.
/// Matched case-sensitively against visible text.
pub const SHOW_MORE_LABELS: [&str; 2] = ["Show more", "更多"];

/// CSS selector for controls that may carry a show-more label
pub const CLICKABLE_SELECTOR: &str = "input[type='button'], button";

/// Chrome user agent string for stealth mode
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

// =============================================================================
// Data Structures
// =============================================================================

/// A `(src, alt)` pair extracted from one rendered image element,
/// before filtering
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ImageCandidate {
    pub src: String,
    pub alt: String,
}

/// Timing and bounds for one keyword's scroll-collect loop.
///
/// The delays exist to let lazy-loaded content render and to keep the
/// request rate polite; tests zero them out.
#[derive(Debug, Clone)]
pub struct ScrollOptions {
    /// Hard ceiling on scroll passes per keyword
    pub max_scrolls: usize,
    /// Wait after navigation before the first extraction
    pub settle_delay: Duration,
    /// Wait between scroll passes regardless of outcome
    pub pacing_delay: Duration,
    /// Wait after clicking a show-more control
    pub recovery_delay: Duration,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            max_scrolls: DEFAULT_MAX_SCROLLS,
            settle_delay: Duration::from_secs(2),
            pacing_delay: Duration::from_secs(1),
            recovery_delay: Duration::from_secs(2),
        }
    }
}

/// Collection failure, split by how the driver should react.
///
/// Browser failures are recoverable at keyword granularity: the driver logs
/// them and moves on to the next keyword. Store failures mean the backing
/// database is broken and abort the run.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("browser automation failed: {0}")]
    Browser(#[source] anyhow::Error),

    #[error("store operation failed: {0}")]
    Store(#[source] anyhow::Error),
}
