use regex::Regex;

use crate::models::{BusinessRecord, CompanySizeBand};
use crate::web_crawler::contact_extractor::ContactExtractor;

/// Weaker text heuristics: company size band, contact person guess and the
/// multi-location flag.
pub struct HeuristicScanner {
    team_size_regex: Regex,
    careers_regex: Regex,
    founded_by_regex: Regex,
    section_regex: Regex,
    name_role_regex: Regex,
    role_name_regex: Regex,
    multi_location_regex: Regex,
}

impl HeuristicScanner {
    pub fn new() -> Self {
        Self {
            team_size_regex: Regex::new(
                r"(?i)team of (\d{1,4})|(\d{1,4})\+? employees|(\d{1,4}) staff",
            )
            .expect("invalid team size regex"),
            careers_regex: Regex::new(r"(?i)careers|we're hiring|join our team|open positions")
                .expect("invalid careers regex"),
            founded_by_regex: Regex::new(r"(?i)founded by|owner-operated|family[- ]run")
                .expect("invalid founded-by regex"),
            section_regex: Regex::new(r"(?i)about us|our team|meet the team|who we are|contact")
                .expect("invalid section regex"),
            name_role_regex: Regex::new(
                r"(?:Dr\.\s+)?([A-Z][a-z]+ [A-Z][a-z]+)\s*(?:[,\-–—:]\s*)?((?i:owner|founder|co-founder|director|ceo|principal|practice manager|manager))",
            )
            .expect("invalid name-role regex"),
            role_name_regex: Regex::new(
                r"((?i:owner|founder|co-founder|director|ceo|principal)):?\s+(?:Dr\.\s+)?([A-Z][a-z]+ [A-Z][a-z]+)",
            )
            .expect("invalid role-name regex"),
            multi_location_regex: Regex::new(r"(?i)our locations|\blocations\b|\bbranches\b|find us in")
                .expect("invalid multi-location regex"),
        }
    }

    pub fn scan(&self, record: &mut BusinessRecord, text: &str) {
        self.scan_company_size(record, text);
        self.scan_contact_person(record, text);
        if self.multi_location_regex.is_match(text) {
            record.is_multi_location = true;
        }
    }

    fn scan_company_size(&self, record: &mut BusinessRecord, text: &str) {
        if record.company_size.is_some() {
            return;
        }
        if let Some(caps) = self.team_size_regex.captures(text) {
            let count = caps
                .iter()
                .skip(1)
                .flatten()
                .find_map(|m| m.as_str().parse::<u32>().ok());
            if let Some(count) = count {
                record.company_size = Some(match count {
                    0 | 1 => CompanySizeBand::Solo,
                    2..=10 => CompanySizeBand::Small,
                    11..=50 => CompanySizeBand::Medium,
                    _ => CompanySizeBand::Large,
                });
                return;
            }
        }
        // Weaker signals when no headcount is stated.
        if self.careers_regex.is_match(text) {
            record.company_size = Some(CompanySizeBand::Medium);
        } else if self.founded_by_regex.is_match(text) {
            record.company_size = Some(CompanySizeBand::Small);
        }
    }

    /// Looks for a capitalized two-word name near a role keyword, restricted
    /// to windows around about/contact-like section headings.
    fn scan_contact_person(&self, record: &mut BusinessRecord, text: &str) {
        if record.contact_person_name.is_some() {
            return;
        }
        for section in self.section_regex.find_iter(text) {
            // Window offsets are byte-based and may land inside a multibyte
            // character; widen to the nearest boundaries before slicing.
            let mut start = section.start().saturating_sub(100);
            while !text.is_char_boundary(start) {
                start -= 1;
            }
            let mut end = (section.end() + 600).min(text.len());
            while !text.is_char_boundary(end) {
                end += 1;
            }
            let window = &text[start..end];

            let found = self
                .name_role_regex
                .captures(window)
                .and_then(|caps| match (caps.get(1), caps.get(2)) {
                    (Some(name), Some(role)) => Some((name.as_str(), role.as_str())),
                    _ => None,
                })
                .or_else(|| {
                    self.role_name_regex
                        .captures(window)
                        .and_then(|caps| match (caps.get(2), caps.get(1)) {
                            (Some(name), Some(role)) => Some((name.as_str(), role.as_str())),
                            _ => None,
                        })
                });

            if let Some((name, role)) = found {
                record.contact_person_name = Some(name.to_string());
                record.contact_person_role = Some(role.to_lowercase());
                record.contact_person_email = Self::guess_person_email(name, &record.emails);
                return;
            }
        }
    }

    /// An email whose local part contains the person's first or last name is
    /// assumed to be theirs; generic mailboxes never qualify.
    fn guess_person_email(name: &str, emails: &[String]) -> Option<String> {
        let parts: Vec<String> = name
            .split_whitespace()
            .map(|p| p.to_lowercase())
            .collect();
        emails
            .iter()
            .find(|email| {
                if ContactExtractor::is_generic_email(email) {
                    return false;
                }
                let local = email.split('@').next().unwrap_or("");
                parts.iter().any(|p| local.contains(p.as_str()))
            })
            .cloned()
    }
}

impl Default for HeuristicScanner {
    fn default() -> Self {
        Self::new()
    }
}
