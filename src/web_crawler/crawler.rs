use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use scraper::{Html, Selector};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::FetchError;
use crate::web_crawler::types::{CrawlConfig, CrawledPage};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; LeadPipeline/1.0)";

/// Paths that never carry contact content and only burn fetches.
const SKIP_PATH_PATTERNS: [&str; 14] = [
    "/wp-admin", "/wp-login", "/login", "/logout", "/signin", "/cart", "/feed", ".pdf", ".jpg",
    ".jpeg", ".png", ".svg", ".css", ".js",
];

/// Bounded-concurrency, same-domain BFS crawler. The HTTP client is created
/// lazily on first use and its connection pool is shared by every fetch the
/// instance issues.
pub struct WebCrawler {
    client: OnceLock<Client>,
}

impl WebCrawler {
    pub fn new() -> Self {
        Self {
            client: OnceLock::new(),
        }
    }

    fn client(&self) -> &Client {
        self.client.get_or_init(|| {
            Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to create HTTP client")
        })
    }

    /// Breadth-first traversal seeded with `root_url`, restricted to the
    /// root's registrable domain, fetching at most `config.max_pages`
    /// distinct URLs with at most `config.concurrency` requests in flight.
    ///
    /// Per-page failures (403, 429, timeouts, non-HTML responses) skip the
    /// page and continue; only an unparseable root URL is an error.
    pub async fn crawl(
        &self,
        root_url: &str,
        config: &CrawlConfig,
    ) -> Result<Vec<CrawledPage>, FetchError> {
        let root = Url::parse(root_url)?;
        let root_host = registrable_host(&root)
            .ok_or(FetchError::InvalidUrl(url::ParseError::EmptyHost))?;

        let mut seed = root.clone();
        seed.set_fragment(None);

        let mut frontier: VecDeque<String> = VecDeque::new();
        frontier.push_back(seed.to_string());
        let mut visited: HashSet<String> = HashSet::new();
        let mut pages: Vec<CrawledPage> = Vec::new();

        let semaphore = Arc::new(Semaphore::new(config.concurrency.max(1)));
        let mut in_flight: JoinSet<(String, Result<String, FetchError>)> = JoinSet::new();
        let timeout = Duration::from_secs(config.timeout_seconds);
        let backoff = Duration::from_millis(config.backoff_ms);

        debug!(root = %root, max_pages = config.max_pages, concurrency = config.concurrency, "starting crawl");

        loop {
            while visited.len() < config.max_pages {
                let Some(url) = frontier.pop_front() else {
                    break;
                };
                if !visited.insert(url.clone()) {
                    continue;
                }
                let client = self.client().clone();
                let permit = semaphore.clone();
                in_flight.spawn(async move {
                    let _permit = permit.acquire_owned().await.expect("semaphore closed");
                    let result = fetch_html(&client, &url, timeout, backoff).await;
                    (url, result)
                });
            }

            let Some(joined) = in_flight.join_next().await else {
                break;
            };
            let Ok((url, result)) = joined else {
                continue;
            };

            match result {
                Ok(html) => {
                    for link in extract_links(&html, &url, &root_host) {
                        if !visited.contains(&link)
                            && visited.len() + frontier.len() < config.max_pages
                        {
                            frontier.push_back(link);
                        }
                    }
                    pages.push(CrawledPage { url, html });
                }
                // Site is blocking automated access; nothing to log.
                Err(FetchError::Status { status: 403, .. }) => {}
                Err(FetchError::Status { status, url }) => {
                    debug!(%url, status, "skipping page");
                }
                Err(e) => {
                    debug!(error = %e, "skipping page");
                }
            }
        }

        info!(
            root = %root,
            pages = pages.len(),
            urls_visited = visited.len(),
            "crawl complete"
        );
        Ok(pages)
    }
}

impl Default for WebCrawler {
    fn default() -> Self {
        Self::new()
    }
}

async fn fetch_html(
    client: &Client,
    url: &str,
    timeout: Duration,
    backoff: Duration,
) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| FetchError::from_reqwest(e, url))?;

    let status = response.status();
    if status.as_u16() == 429 {
        // Rate limited: back off once to be polite, then skip the page.
        let jitter = Duration::from_millis(fastrand::u64(0..250));
        warn!(%url, "rate limited, backing off");
        tokio::time::sleep(backoff + jitter).await;
        return Err(FetchError::Status {
            status: 429,
            url: url.to_string(),
        });
    }
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !content_type.contains("text/html") {
        return Err(FetchError::NotHtml {
            url: url.to_string(),
            content_type,
        });
    }

    response
        .text()
        .await
        .map_err(|e| FetchError::from_reqwest(e, url))
}

/// Host with a leading `www.` stripped; the same-registrable-domain key.
pub fn registrable_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| {
        h.to_ascii_lowercase()
            .trim_start_matches("www.")
            .to_string()
    })
}

/// Absolute, fragment-free, same-domain links discovered on a page, in
/// document order with duplicates removed.
pub fn extract_links(html: &str, page_url: &str, root_host: &str) -> Vec<String> {
    let Ok(base) = Url::parse(page_url) else {
        return Vec::new();
    };
    let selector = Selector::parse("a[href]").expect("invalid link selector");
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Ok(mut resolved) = base.join(href) else {
            continue;
        };
        resolved.set_fragment(None);
        if resolved.scheme() != "http" && resolved.scheme() != "https" {
            continue;
        }
        match registrable_host(&resolved) {
            Some(host) if host == root_host => {}
            _ => continue,
        }
        if is_skip_path(resolved.path()) {
            continue;
        }
        let link = resolved.to_string();
        if seen.insert(link.clone()) {
            links.push(link);
        }
    }
    links
}

fn is_skip_path(path: &str) -> bool {
    let path = path.to_lowercase();
    SKIP_PATH_PATTERNS.iter().any(|p| path.contains(p))
}
