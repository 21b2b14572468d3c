use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::dedup;
use crate::enricher::Enricher;
use crate::models::{BusinessRecord, ExtractConfig, Result};
use crate::sources::DiscoverySource;
use crate::web_crawler::{ContactExtractor, CrawlConfig, WebCrawler};

/// Invoked with (processed, total) after each enrichment task completes.
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Fans discovery output through crawl → extract → enrich, one concurrent
/// task per website-bearing candidate, then resolves duplicates across the
/// whole batch.
pub struct Pipeline {
    crawl_config: CrawlConfig,
    crawler: Arc<WebCrawler>,
    extractor: Arc<ContactExtractor>,
    enricher: Arc<Enricher>,
}

impl Pipeline {
    pub fn new(crawl_config: CrawlConfig) -> Self {
        Self {
            crawl_config,
            crawler: Arc::new(WebCrawler::new()),
            extractor: Arc::new(ContactExtractor::new()),
            enricher: Arc::new(Enricher::new()),
        }
    }

    pub async fn run(
        &self,
        sources: &[Box<dyn DiscoverySource>],
        niche: &str,
        location: &str,
        max_results: usize,
        extract_config: ExtractConfig,
        progress: Option<ProgressCallback>,
    ) -> Result<Vec<BusinessRecord>> {
        let candidates = self
            .collect_candidates(sources, niche, location, max_results)
            .await;
        info!(
            candidates = candidates.len(),
            niche, location, "discovery complete"
        );

        let (with_website, without_website): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|record| record.website.is_some());

        let total = with_website.len();
        let mut tasks: JoinSet<BusinessRecord> = JoinSet::new();
        let mut fallbacks: Vec<BusinessRecord> = Vec::with_capacity(total);

        for record in with_website {
            fallbacks.push(record.clone());
            let crawler = self.crawler.clone();
            let extractor = self.extractor.clone();
            let enricher = self.enricher.clone();
            let crawl_config = self.crawl_config.clone();
            tasks.spawn(async move {
                enrich_candidate(
                    record,
                    &crawler,
                    &extractor,
                    &enricher,
                    &crawl_config,
                    &extract_config,
                )
                .await
            });
        }

        let mut enriched: Vec<BusinessRecord> = Vec::with_capacity(total);
        let mut processed = 0usize;
        while let Some(joined) = tasks.join_next().await {
            processed += 1;
            match joined {
                Ok(record) => enriched.push(record),
                Err(e) => {
                    // Panicked task: the candidate stays in the batch with
                    // its enrichment fields empty.
                    warn!(error = %e, "enrichment task failed");
                }
            }
            if let Some(progress) = &progress {
                progress(processed, total);
            }
        }

        // Re-add originals for tasks that never produced a record.
        if enriched.len() < total {
            for fallback in &fallbacks {
                let present = enriched.iter().any(|r| r.website == fallback.website);
                if !present {
                    enriched.push(fallback.clone());
                }
            }
        }

        enriched.extend(without_website);
        let deduplicated = dedup::dedupe(enriched);
        info!(records = deduplicated.len(), "pipeline complete");
        Ok(deduplicated)
    }

    /// Pulls from each source in turn until `max_results` raw candidates are
    /// collected. A failing source is logged and skipped.
    async fn collect_candidates(
        &self,
        sources: &[Box<dyn DiscoverySource>],
        niche: &str,
        location: &str,
        max_results: usize,
    ) -> Vec<BusinessRecord> {
        let mut candidates: Vec<BusinessRecord> = Vec::new();
        for source in sources {
            if candidates.len() >= max_results {
                break;
            }
            match source.search(niche, location).await {
                Ok(records) => {
                    info!(source = source.name(), found = records.len(), "source searched");
                    let remaining = max_results - candidates.len();
                    candidates.extend(records.into_iter().take(remaining));
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "source failed, skipping");
                }
            }
        }
        candidates
    }
}

/// Crawl one candidate's website and fold every fetched page into the
/// record. Crawl failures leave the record as it arrived.
async fn enrich_candidate(
    mut record: BusinessRecord,
    crawler: &WebCrawler,
    extractor: &ContactExtractor,
    enricher: &Enricher,
    crawl_config: &CrawlConfig,
    extract_config: &ExtractConfig,
) -> BusinessRecord {
    let website = record.website.clone().expect("candidate has a website");
    let pages = match crawler.crawl(&website, crawl_config).await {
        Ok(pages) => pages,
        Err(e) => {
            warn!(%website, error = %e, "crawl failed, keeping bare record");
            return record;
        }
    };

    for page in &pages {
        let contacts = extractor.extract(&page.html, extract_config);
        for email in contacts.emails {
            BusinessRecord::push_sorted_unique(&mut record.emails, email);
        }
        for phone in contacts.phones {
            BusinessRecord::push_sorted_unique(&mut record.phones, phone);
        }
        enricher.enrich(&mut record, &page.html, &page.url, extract_config);
    }
    record
}
