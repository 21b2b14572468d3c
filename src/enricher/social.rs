use regex::Regex;

use crate::models::BusinessRecord;

/// Per-platform social profile detection over raw HTML. The first URL found
/// for a platform wins; later matches on the same page are ignored.
pub struct SocialLinkDetector {
    platforms: Vec<(&'static str, Regex)>,
}

impl SocialLinkDetector {
    pub fn new() -> Self {
        let table: [(&'static str, &str); 7] = [
            (
                "facebook",
                r"(?:https?://)?(?:www\.)?facebook\.com/[A-Za-z0-9_.\-]+",
            ),
            (
                "instagram",
                r"(?:https?://)?(?:www\.)?instagram\.com/[A-Za-z0-9_.\-]+",
            ),
            (
                "linkedin",
                r"(?:https?://)?(?:www\.)?linkedin\.com/(?:in|company)/[A-Za-z0-9\-_%]+",
            ),
            (
                "twitter",
                r"(?:https?://)?(?:www\.)?(?:twitter\.com|x\.com)/[A-Za-z0-9_]+",
            ),
            (
                "youtube",
                r"(?:https?://)?(?:www\.)?youtube\.com/(?:channel/|c/|user/|@)[A-Za-z0-9_\-]+",
            ),
            (
                "tiktok",
                r"(?:https?://)?(?:www\.)?tiktok\.com/@[A-Za-z0-9_.\-]+",
            ),
            (
                "pinterest",
                r"(?:https?://)?(?:www\.)?pinterest\.com/[A-Za-z0-9_\-]+",
            ),
        ];
        Self {
            platforms: table
                .iter()
                .map(|(name, pattern)| {
                    (*name, Regex::new(pattern).expect("invalid social pattern"))
                })
                .collect(),
        }
    }

    pub fn detect(&self, record: &mut BusinessRecord, html: &str) {
        for (platform, pattern) in &self.platforms {
            if record.social_links.contains_key(*platform) {
                continue;
            }
            let Some(m) = pattern.find(html) else {
                continue;
            };
            let url = upgrade_scheme(m.as_str());
            if url.is_empty() {
                continue;
            }
            // Sharer and plugin URLs are not profiles.
            if url.contains("sharer") || url.contains("/share") || url.contains("/plugins/") {
                continue;
            }
            record.social_links.insert((*platform).to_string(), url);
        }
    }
}

impl Default for SocialLinkDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn upgrade_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}
