use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::debug;

use crate::models::ExtractConfig;
use crate::web_crawler::normalizer::{
    normalize_email, normalize_emails, normalize_phone, normalize_phones, phone_digit_count,
};
use crate::web_crawler::types::ExtractedContacts;

/// Minimum length of a normalized email worth keeping.
const MIN_EMAIL_LEN: usize = 5;
/// Minimum digit count of a normalized phone worth keeping.
const MIN_PHONE_DIGITS: usize = 7;

/// Pulls candidate emails and phone numbers out of raw HTML. Pure: the same
/// input always yields the same output sets.
pub struct ContactExtractor {
    email_regex: Regex,
    phone_intl_regex: Regex,
    phone_us_regex: Regex,
    phone_paren_regex: Regex,
    link_selector: Selector,
}

impl ContactExtractor {
    pub fn new() -> Self {
        Self {
            email_regex: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
                .expect("invalid email regex"),
            phone_intl_regex: Regex::new(
                r"\+\d{1,3}[-.\s]?\(?\d{1,4}\)?(?:[-.\s]?\d{2,4}){2,4}",
            )
            .expect("invalid international phone regex"),
            phone_us_regex: Regex::new(r"\b\d{3}-\d{3}-\d{4}\b").expect("invalid us phone regex"),
            phone_paren_regex: Regex::new(r"\(\d{3}\)\s*\d{3}[-.\s]?\d{4}")
                .expect("invalid paren phone regex"),
            link_selector: Selector::parse("a[href]").expect("invalid link selector"),
        }
    }

    pub fn extract(&self, html: &str, config: &ExtractConfig) -> ExtractedContacts {
        let mut raw_emails: HashSet<String> = HashSet::new();
        let mut raw_phones: HashSet<String> = HashSet::new();

        if config.emails {
            for m in self.email_regex.find_iter(html) {
                raw_emails.insert(m.as_str().to_string());
            }
        }

        if config.phones {
            for regex in [
                &self.phone_intl_regex,
                &self.phone_us_regex,
                &self.phone_paren_regex,
            ] {
                for m in regex.find_iter(html) {
                    raw_phones.insert(m.as_str().to_string());
                }
            }
        }

        // mailto:/tel: targets are the most reliable signal on a page.
        if config.emails || (config.phones && config.social_numbers) {
            let document = Html::parse_document(html);
            for element in document.select(&self.link_selector) {
                let Some(href) = element.value().attr("href") else {
                    continue;
                };
                if config.emails {
                    if let Some(target) = href.strip_prefix("mailto:") {
                        let address = target.split('?').next().unwrap_or(target);
                        raw_emails.insert(address.to_string());
                    }
                }
                if config.phones && config.social_numbers {
                    if let Some(target) = href.strip_prefix("tel:") {
                        raw_phones.insert(target.to_string());
                    }
                }
            }
        }

        let emails: Vec<String> = normalize_emails(raw_emails)
            .into_iter()
            .filter(|e| e.len() > MIN_EMAIL_LEN)
            .collect();
        let phones: Vec<String> = normalize_phones(raw_phones)
            .into_iter()
            .filter(|p| phone_digit_count(p) >= MIN_PHONE_DIGITS)
            .collect();

        debug!(
            emails = emails.len(),
            phones = phones.len(),
            "extracted contact candidates"
        );

        ExtractedContacts { emails, phones }
    }

    /// Generic mailboxes score differently from personal ones.
    pub fn is_generic_email(email: &str) -> bool {
        const GENERIC_PREFIXES: [&str; 10] = [
            "info@",
            "contact@",
            "hello@",
            "support@",
            "admin@",
            "office@",
            "sales@",
            "mail@",
            "team@",
            "enquiries@",
        ];
        let email = normalize_email(email);
        GENERIC_PREFIXES.iter().any(|p| email.starts_with(p))
    }
}

impl Default for ContactExtractor {
    fn default() -> Self {
        Self::new()
    }
}
