pub mod compliance;
pub mod heuristics;
pub mod quality;
pub mod services;
pub mod social;
pub mod tech_stack;

use scraper::{Html, Selector};

use crate::models::{BusinessRecord, ExtractConfig};
use compliance::ComplianceDetector;
use heuristics::HeuristicScanner;
use services::ServiceTagger;
use social::SocialLinkDetector;
use tech_stack::TechStackDetector;

/// Stored page excerpt is capped to keep exported records small.
const WEBSITE_TEXT_LIMIT: usize = 5000;

/// Derives secondary attributes from one fetched page. Deterministic given
/// the same inputs; mutates the record in place and performs no I/O.
pub struct Enricher {
    tech: TechStackDetector,
    social: SocialLinkDetector,
    compliance: ComplianceDetector,
    services: ServiceTagger,
    heuristics: HeuristicScanner,
}

impl Enricher {
    pub fn new() -> Self {
        Self {
            tech: TechStackDetector::new(),
            social: SocialLinkDetector::new(),
            compliance: ComplianceDetector::new(),
            services: ServiceTagger::new(),
            heuristics: HeuristicScanner::new(),
        }
    }

    /// Runs every enrichment sub-step that the config enables over one page.
    /// Sub-steps write disjoint fields; the quality score runs last because
    /// it reads what the others wrote.
    pub fn enrich(
        &self,
        record: &mut BusinessRecord,
        html: &str,
        source_url: &str,
        config: &ExtractConfig,
    ) {
        let text = page_text(html);

        if record.website.is_none() {
            record.website = Some(source_url.to_string());
        }

        self.tech.detect(record, html);
        if config.social_links {
            self.social.detect(record, html);
        }
        self.compliance.detect(record, &text);
        if config.services {
            self.services.tag(record, &text);
        }
        self.heuristics.scan(record, &text);

        if config.website_content && record.website_text.is_none() && !text.is_empty() {
            record.website_text = Some(text.chars().take(WEBSITE_TEXT_LIMIT).collect());
        }

        quality::score(record);
    }
}

impl Default for Enricher {
    fn default() -> Self {
        Self::new()
    }
}

/// Visible body text of a page, whitespace-collapsed.
pub fn page_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let body = Selector::parse("body").expect("invalid body selector");
    document
        .select(&body)
        .next()
        .map(|body| {
            body.text()
                .collect::<Vec<_>>()
                .join(" ")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <link href="/wp-content/themes/acme/style.css">
        <a href="https://facebook.com/acmedental">Facebook</a>
        <p>We use cookies. Privacy Policy.</p>
        <p>About us: Jane Miller, Owner. Our team of 8 offers Invisalign and implants.</p>
        <p>Our locations: Geneva and Lausanne.</p>
    </body></html>"#;

    #[test]
    fn enrich_fills_disjoint_fields() {
        let mut record = BusinessRecord::new("Acme Dental", "dentist", "test");
        Enricher::new().enrich(
            &mut record,
            PAGE,
            "https://acme-dental.com",
            &ExtractConfig::default(),
        );

        assert_eq!(record.cms.as_deref(), Some("wordpress"));
        assert!(record.social_links.contains_key("facebook"));
        assert!(record.compliance_flags.contains(&"PRIVACY_POLICY".to_string()));
        assert!(record.service_tags.contains(&"invisalign".to_string()));
        assert_eq!(record.contact_person_name.as_deref(), Some("Jane Miller"));
        assert!(record.is_multi_location);
        assert!(record.quality_score > 0.0);
        assert!(record.website_text.is_none());
    }

    #[test]
    fn enrich_is_deterministic() {
        let enricher = Enricher::new();
        let run = || {
            let mut record = BusinessRecord::new("Acme Dental", "dentist", "test");
            enricher.enrich(
                &mut record,
                PAGE,
                "https://acme-dental.com",
                &ExtractConfig::default(),
            );
            record
        };
        let a = run();
        let b = run();
        assert_eq!(a.tech_stack, b.tech_stack);
        assert_eq!(a.service_tags, b.service_tags);
        assert_eq!(a.quality_score, b.quality_score);
    }

    #[test]
    fn disabled_social_links_skips_detection() {
        let mut config = ExtractConfig::default();
        config.social_links = false;
        let mut record = BusinessRecord::new("Acme Dental", "dentist", "test");
        Enricher::new().enrich(&mut record, PAGE, "https://acme-dental.com", &config);
        assert!(record.social_links.is_empty());
    }

    #[test]
    fn website_content_toggle_stores_excerpt() {
        let mut config = ExtractConfig::default();
        config.website_content = true;
        let mut record = BusinessRecord::new("Acme Dental", "dentist", "test");
        Enricher::new().enrich(&mut record, PAGE, "https://acme-dental.com", &config);
        let text = record.website_text.expect("excerpt stored");
        assert!(text.contains("Jane Miller"));
    }

    #[test]
    fn page_text_collapses_whitespace() {
        let text = page_text("<body><p>a\n   b</p><div>c</div></body>");
        assert_eq!(text, "a b c");
    }
}
