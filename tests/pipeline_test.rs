use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use lead_pipeline::models::{BusinessRecord, ExtractConfig, Result};
use lead_pipeline::pipeline::Pipeline;
use lead_pipeline::sources::DiscoverySource;
use lead_pipeline::web_crawler::{CrawlConfig, WebCrawler};

/// Minimal HTTP fixture server: serves a fixed path→HTML map and records
/// every request path it sees.
struct FixtureSite {
    base_url: String,
    hits: Arc<Mutex<Vec<String>>>,
}

impl FixtureSite {
    async fn start(pages: HashMap<&'static str, String>) -> FixtureSite {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let hits: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        let pages: Arc<HashMap<&'static str, String>> = Arc::new(pages);
        let seen = hits.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let pages = pages.clone();
                let seen = seen.clone();
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 4096];
                    let Ok(n) = socket.read(&mut buf).await else {
                        return;
                    };
                    let request = String::from_utf8_lossy(&buf[..n]).to_string();
                    let path = request
                        .split_whitespace()
                        .nth(1)
                        .unwrap_or("/")
                        .to_string();
                    seen.lock().unwrap().push(path.clone());

                    let response = match pages.get(path.as_str()) {
                        Some(body) => format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        ),
                        None => String::from(
                            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                        ),
                    };
                    let _ = socket.write_all(response.as_bytes()).await;
                });
            }
        });

        FixtureSite {
            base_url: format!("http://{addr}"),
            hits,
        }
    }

    fn hit_paths(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

fn dental_site() -> HashMap<&'static str, String> {
    let mut pages = HashMap::new();
    pages.insert(
        "/",
        r##"<html><body>
            <a href="/contact">Contact</a>
            <a href="/about">About</a>
            <a href="/about#team">Team</a>
            <a href="https://other.example.com/away">Partner</a>
            <a href="/pricing">Pricing</a>
            <a href="/blog">Blog</a>
        </body></html>"##
            .to_string(),
    );
    pages.insert(
        "/contact",
        r#"<html><body>
            <a href="mailto:a@b.com">Email us</a>
            <p>Call (555) 123-4567</p>
            <a href="https://facebook.com/acmedental">Facebook</a>
        </body></html>"#
            .to_string(),
    );
    pages.insert(
        "/about",
        r#"<html><body>
            <link href="/wp-content/style.css">
            <p>About us: Jane Miller, Owner. Our team of 8 offers implants and Invisalign.</p>
            <p>Privacy Policy. We use cookies.</p>
        </body></html>"#
            .to_string(),
    );
    pages.insert("/pricing", "<html><body>Pricing</body></html>".to_string());
    pages.insert("/blog", "<html><body>Blog</body></html>".to_string());
    pages
}

#[tokio::test]
async fn crawl_respects_page_limit_and_never_refetches() {
    let site = FixtureSite::start(dental_site()).await;
    let config = CrawlConfig {
        max_pages: 3,
        concurrency: 2,
        timeout_seconds: 5,
        backoff_ms: 10,
    };

    let pages = WebCrawler::new()
        .crawl(&site.base_url, &config)
        .await
        .expect("crawl");

    assert!(pages.len() <= 3);
    let hits = site.hit_paths();
    assert!(hits.len() <= 3, "fetched {hits:?}");
    let mut distinct = hits.clone();
    distinct.sort();
    distinct.dedup();
    assert_eq!(distinct.len(), hits.len(), "a URL was fetched twice: {hits:?}");
    // The off-domain partner link never reaches the frontier.
    assert!(hits.iter().all(|p| !p.contains("away")));
}

fn cross_linked_site() -> HashMap<&'static str, String> {
    // Every page links to every page, including itself.
    let paths = ["/", "/a", "/b", "/c", "/d"];
    let mut pages = HashMap::new();
    for path in paths {
        let links: String = paths
            .iter()
            .map(|p| format!(r##"<a href="{p}">{p}</a>"##))
            .collect();
        pages.insert(path, format!("<html><body>{links}</body></html>"));
    }
    pages
}

#[tokio::test]
async fn rediscovered_links_do_not_consume_page_allowance() {
    let site = FixtureSite::start(cross_linked_site()).await;
    let config = CrawlConfig {
        max_pages: 5,
        concurrency: 2,
        timeout_seconds: 5,
        backoff_ms: 10,
    };

    let pages = WebCrawler::new()
        .crawl(&site.base_url, &config)
        .await
        .expect("crawl");

    // Links rediscovered on later pages must not eat into the allowance:
    // all five distinct pages fit exactly.
    assert_eq!(pages.len(), 5);
    let mut urls: Vec<String> = pages.iter().map(|p| p.url.clone()).collect();
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), 5);
}

#[tokio::test]
async fn crawl_visits_whole_site_when_limit_allows() {
    let site = FixtureSite::start(dental_site()).await;
    let config = CrawlConfig {
        max_pages: 10,
        concurrency: 4,
        timeout_seconds: 5,
        backoff_ms: 10,
    };

    let pages = WebCrawler::new()
        .crawl(&site.base_url, &config)
        .await
        .expect("crawl");

    assert_eq!(pages.len(), 5);
    assert!(pages.iter().any(|p| p.url.ends_with("/contact")));
    assert!(pages.iter().any(|p| p.url.ends_with("/blog")));
    // Fragment variant of /about collapsed into one fetch.
    assert_eq!(site.hit_paths().len(), 5);
}

struct SingleSite {
    record: BusinessRecord,
}

#[async_trait]
impl DiscoverySource for SingleSite {
    fn name(&self) -> &str {
        "fixture"
    }
    async fn search(&self, _niche: &str, _location: &str) -> Result<Vec<BusinessRecord>> {
        Ok(vec![self.record.clone()])
    }
}

#[tokio::test]
async fn pipeline_enriches_and_merges_across_sources() {
    let site = FixtureSite::start(dental_site()).await;

    let mut crawled = BusinessRecord::new("Acme Dental", "dentist", "web");
    crawled.website = Some(site.base_url.clone());

    let mut listing = BusinessRecord::new("Acme Dental", "dentist", "directory");
    listing.emails = vec!["a@b.com".to_string()];
    listing.city = Some("Geneva".to_string());

    let sources: Vec<Box<dyn DiscoverySource>> = vec![
        Box::new(SingleSite { record: crawled }),
        Box::new(SingleSite { record: listing }),
    ];

    let pipeline = Pipeline::new(CrawlConfig {
        max_pages: 10,
        concurrency: 4,
        timeout_seconds: 5,
        backoff_ms: 10,
    });
    let out = pipeline
        .run(&sources, "dentist", "", 10, ExtractConfig::default(), None)
        .await
        .expect("pipeline");

    // Shared name + shared email collapse the two observations.
    assert_eq!(out.len(), 1);
    let record = &out[0];
    assert!(record.emails.contains(&"a@b.com".to_string()));
    assert!(record.phones.contains(&"5551234567".to_string()));
    assert_eq!(record.cms.as_deref(), Some("wordpress"));
    assert!(record.social_links.contains_key("facebook"));
    assert!(record
        .compliance_flags
        .contains(&"PRIVACY_POLICY".to_string()));
    assert!(record.service_tags.contains(&"implants".to_string()));
    assert_eq!(record.contact_person_name.as_deref(), Some("Jane Miller"));
    assert_eq!(record.city.as_deref(), Some("Geneva"));
    let mut sources_seen = record.sources.clone();
    sources_seen.sort();
    assert_eq!(sources_seen, vec!["directory", "web"]);
    assert!(record.quality_score > 50.0);
}
