use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Quality band derived from the rule-based score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLabel {
    Low,
    Medium,
    High,
}

impl QualityLabel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            QualityLabel::High
        } else if score >= 50.0 {
            QualityLabel::Medium
        } else {
            QualityLabel::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanySizeBand {
    Solo,
    Small,
    Medium,
    Large,
}

/// One candidate business: partial when it leaves a discovery source,
/// filled in by the crawler/extractor/enricher, merged by the resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub name: Option<String>,
    pub niche: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,

    // Sorted, deduplicated; maintained through the normalizer helpers.
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub phones: Vec<String>,

    pub cms: Option<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub third_party_widgets: Vec<String>,
    #[serde(default)]
    pub social_links: BTreeMap<String, String>,
    #[serde(default)]
    pub service_tags: Vec<String>,
    /// Uppercase tags such as GDPR or COOKIE_CONSENT.
    #[serde(default)]
    pub compliance_flags: Vec<String>,
    /// Text excerpt of the crawled site; only stored when the
    /// `website_content` toggle is enabled.
    pub website_text: Option<String>,

    pub contact_person_name: Option<String>,
    pub contact_person_role: Option<String>,
    pub contact_person_email: Option<String>,

    pub company_size: Option<CompanySizeBand>,
    #[serde(default)]
    pub is_multi_location: bool,
    #[serde(default)]
    pub branch_locations: Vec<String>,

    #[serde(default)]
    pub quality_score: f64,
    pub quality_label: Option<QualityLabel>,

    /// Primary contributing source, unchanged once set.
    pub source: Option<String>,
    /// All contributing sources; grows monotonically as records merge.
    #[serde(default)]
    pub sources: Vec<String>,

    pub discovered_at: DateTime<Utc>,
}

impl BusinessRecord {
    /// Partial record as produced by a discovery source.
    pub fn new(
        name: impl Into<String>,
        niche: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        let source = source.into();
        Self {
            name: Some(name.into()),
            niche: Some(niche.into()),
            source: Some(source.clone()),
            sources: vec![source],
            ..Self::empty()
        }
    }

    pub fn empty() -> Self {
        Self {
            name: None,
            niche: None,
            website: None,
            address: None,
            city: None,
            country: None,
            emails: Vec::new(),
            phones: Vec::new(),
            cms: None,
            tech_stack: Vec::new(),
            third_party_widgets: Vec::new(),
            social_links: BTreeMap::new(),
            service_tags: Vec::new(),
            compliance_flags: Vec::new(),
            website_text: None,
            contact_person_name: None,
            contact_person_role: None,
            contact_person_email: None,
            company_size: None,
            is_multi_location: false,
            branch_locations: Vec::new(),
            quality_score: 0.0,
            quality_label: None,
            source: None,
            sources: Vec::new(),
            discovered_at: Utc::now(),
        }
    }

    /// Insert a value keeping the list sorted and free of duplicates.
    pub fn push_sorted_unique(list: &mut Vec<String>, value: String) {
        if let Err(pos) = list.binary_search(&value) {
            list.insert(pos, value);
        }
    }
}

/// Independent toggles for the extraction/enrichment sub-steps. A disabled
/// toggle skips the corresponding sub-step entirely. Every field carries a
/// serde default so a partial `extract:` config section still deserializes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExtractConfig {
    #[serde(default = "enabled")]
    pub emails: bool,
    #[serde(default = "enabled")]
    pub phones: bool,
    #[serde(default)]
    pub website_content: bool,
    #[serde(default = "enabled")]
    pub services: bool,
    #[serde(default = "enabled")]
    pub social_links: bool,
    #[serde(default = "enabled")]
    pub social_numbers: bool,
}

fn enabled() -> bool {
    true
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            emails: true,
            phones: true,
            website_content: false,
            services: true,
            social_links: true,
            social_numbers: true,
        }
    }
}
