use serde::{Deserialize, Serialize};

/// One successfully fetched page. Raw HTML is carried instead of a parsed
/// document so the value can cross task boundaries; parsing happens in the
/// synchronous extraction/enrichment code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawledPage {
    pub url: String,
    pub html: String,
}

/// Candidate contacts pulled from one page, already normalized, sorted and
/// deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContacts {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
}

impl ExtractedContacts {
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Hard cap on distinct URLs fetched by one crawl.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    /// Maximum in-flight HTTP requests per crawl.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Fixed backoff applied after an HTTP 429 before skipping the page.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

fn default_max_pages() -> usize {
    10
}

fn default_concurrency() -> usize {
    4
}

fn default_timeout_seconds() -> u64 {
    15
}

fn default_backoff_ms() -> u64 {
    2000
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            concurrency: default_concurrency(),
            timeout_seconds: default_timeout_seconds(),
            backoff_ms: default_backoff_ms(),
        }
    }
}
