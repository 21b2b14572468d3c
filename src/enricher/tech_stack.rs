use regex::Regex;

use crate::models::BusinessRecord;

/// At most this many tags are recorded per category.
const MAX_TAGS_PER_CATEGORY: usize = 3;

enum Target {
    /// CMS category: first match also fills `record.cms`.
    Cms,
    TechStack,
    Widgets,
}

struct Category {
    target: Target,
    patterns: Vec<(&'static str, Regex)>,
}

/// Regex-table-driven detection of CMS, JS frameworks, analytics and
/// third-party widgets from raw page HTML.
pub struct TechStackDetector {
    categories: Vec<Category>,
}

impl TechStackDetector {
    pub fn new() -> Self {
        let compile = |rows: &[(&'static str, &str)]| -> Vec<(&'static str, Regex)> {
            rows.iter()
                .map(|(tag, pattern)| {
                    (*tag, Regex::new(pattern).expect("invalid tech pattern"))
                })
                .collect()
        };

        let categories = vec![
            Category {
                target: Target::Cms,
                patterns: compile(&[
                    ("wordpress", r"(?i)wp-content|wp-includes|/wp-json"),
                    ("shopify", r"(?i)cdn\.shopify\.com|myshopify\.com"),
                    ("wix", r"(?i)wixstatic\.com|wix\.com"),
                    ("squarespace", r"(?i)squarespace\.com|static1\.squarespace"),
                    ("webflow", r"(?i)webflow\.(?:io|com)|wf-page"),
                    ("drupal", r"(?i)/sites/default/files|drupal"),
                    ("joomla", r"(?i)/media/jui/|joomla"),
                ]),
            },
            Category {
                target: Target::TechStack,
                patterns: compile(&[
                    ("react", r"(?i)react(?:\.production)?(?:\.min)?\.js|data-reactroot"),
                    ("nextjs", r"(?i)/_next/|__NEXT_DATA__"),
                    ("vue", r"(?i)vue(?:\.runtime)?(?:\.min)?\.js|data-v-app"),
                    ("angular", r"(?i)ng-version=|angular(?:\.min)?\.js"),
                    ("jquery", r"(?i)jquery[.\-]"),
                ]),
            },
            Category {
                target: Target::TechStack,
                patterns: compile(&[
                    ("google-analytics", r"(?i)google-analytics\.com|gtag\("),
                    ("google-tag-manager", r"(?i)googletagmanager\.com"),
                    ("facebook-pixel", r"(?i)connect\.facebook\.net|fbq\("),
                    ("hotjar", r"(?i)static\.hotjar\.com"),
                    ("matomo", r"(?i)matomo\.js|piwik\.js"),
                ]),
            },
            Category {
                target: Target::Widgets,
                patterns: compile(&[
                    ("intercom", r"(?i)widget\.intercom\.io|intercomSettings"),
                    ("drift", r"(?i)js\.driftt\.com"),
                    ("tawk", r"(?i)embed\.tawk\.to"),
                    ("crisp", r"(?i)client\.crisp\.chat"),
                    ("zendesk", r"(?i)static\.zdassets\.com|zopim"),
                ]),
            },
            Category {
                target: Target::Widgets,
                patterns: compile(&[
                    ("calendly", r"(?i)calendly\.com"),
                    ("acuity-scheduling", r"(?i)acuityscheduling\.com"),
                    ("opentable", r"(?i)opentable\.(?:com|co)"),
                    ("zocdoc", r"(?i)zocdoc\.com"),
                    ("booksy", r"(?i)booksy\.com"),
                ]),
            },
            Category {
                target: Target::Widgets,
                patterns: compile(&[
                    ("stripe", r"(?i)js\.stripe\.com"),
                    ("paypal", r"(?i)paypal\.com/sdk|paypalobjects\.com"),
                    ("square", r"(?i)squareup\.com|square\.site"),
                    ("klarna", r"(?i)klarna\.com"),
                ]),
            },
        ];

        Self { categories }
    }

    pub fn detect(&self, record: &mut BusinessRecord, html: &str) {
        for category in &self.categories {
            let mut matched = 0usize;
            for (tag, pattern) in &category.patterns {
                if matched >= MAX_TAGS_PER_CATEGORY {
                    break;
                }
                if !pattern.is_match(html) {
                    continue;
                }
                matched += 1;
                match category.target {
                    Target::Cms => {
                        if record.cms.is_none() {
                            record.cms = Some((*tag).to_string());
                        }
                        BusinessRecord::push_sorted_unique(
                            &mut record.tech_stack,
                            (*tag).to_string(),
                        );
                    }
                    Target::TechStack => {
                        BusinessRecord::push_sorted_unique(
                            &mut record.tech_stack,
                            (*tag).to_string(),
                        );
                    }
                    Target::Widgets => {
                        BusinessRecord::push_sorted_unique(
                            &mut record.third_party_widgets,
                            (*tag).to_string(),
                        );
                    }
                }
            }
        }
    }
}

impl Default for TechStackDetector {
    fn default() -> Self {
        Self::new()
    }
}
