pub mod config;
pub mod dedup;
pub mod enricher;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod sources;
pub mod store;
pub mod web_crawler;

pub use config::{load_config, Config};
pub use enricher::Enricher;
pub use error::FetchError;
pub use models::{BusinessRecord, ExtractConfig, QualityLabel, Result};
pub use pipeline::{Pipeline, ProgressCallback};
pub use sources::{DiscoverySource, StaticSource};
pub use store::{LeadStore, MemoryStore};
pub use web_crawler::{ContactExtractor, CrawlConfig, WebCrawler};
