//! Run configuration for the harvester.

use std::path::PathBuf;
use std::time::Duration;

use crate::collector::DEFAULT_MAX_SCROLLS;
use crate::keywords::DEFAULT_KEYWORDS;

/// Default ceiling on total records before the run stops early
pub const DEFAULT_TOTAL_CAP: i64 = 5000;

/// Configuration for one harvest run.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// SQLite database path
    pub db_path: PathBuf,
    /// Ordered keyword list, processed strictly sequentially
    pub keywords: Vec<String>,
    /// Scroll-pass ceiling per keyword
    pub max_scrolls: usize,
    /// Global record-count ceiling; the run stops once reached
    pub total_cap: i64,
    /// Pause between keywords, to keep the request rate polite
    pub keyword_delay: Duration,
    /// Run Chrome without a visible window
    pub headless: bool,
}

impl HarvestConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            keywords: DEFAULT_KEYWORDS.iter().map(|s| (*s).to_string()).collect(),
            max_scrolls: DEFAULT_MAX_SCROLLS,
            total_cap: DEFAULT_TOTAL_CAP,
            keyword_delay: Duration::from_secs(2),
            headless: true,
        }
    }

    #[must_use]
    pub fn keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    #[must_use]
    pub fn max_scrolls(mut self, max_scrolls: usize) -> Self {
        self.max_scrolls = max_scrolls;
        self
    }

    #[must_use]
    pub fn total_cap(mut self, total_cap: i64) -> Self {
        self.total_cap = total_cap;
        self
    }

    #[must_use]
    pub fn keyword_delay(mut self, keyword_delay: Duration) -> Self {
        self.keyword_delay = keyword_delay;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }
}
