pub mod collector;
pub mod config;
pub mod driver;
pub mod keywords;
pub mod store;

pub use collector::{CollectError, ImageCandidate, ScrollOptions, collect_keyword};
pub use config::HarvestConfig;
pub use driver::{BrowserCollector, KeywordCollector, run_harvest};
pub use store::{ImageRecord, ImageStore, StoreStats};
