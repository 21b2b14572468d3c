//! Cross-source identity resolution: decides whether two business records
//! denote the same real-world entity and merges field-by-field when they do.

use tracing::debug;
use url::Url;

use crate::enricher::quality;
use crate::models::BusinessRecord;

/// Website host stripped of scheme, leading `www.`, path, query and
/// fragment; the primary identity key.
pub fn normalize_domain(website: &str) -> Option<String> {
    let candidate = if website.contains("://") {
        website.to_string()
    } else {
        format!("https://{website}")
    };
    let url = Url::parse(&candidate).ok()?;
    url.host_str().map(|h| {
        h.to_ascii_lowercase()
            .trim_start_matches("www.")
            .to_string()
    })
}

fn normalize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn intersects(a: &[String], b: &[String]) -> bool {
    // Both sides are sorted; a linear walk beats hashing at these sizes.
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Equal => return true,
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
        }
    }
    false
}

/// Ordered identity rules; the first rule that matches decides.
/// A record lacking both a website and a name never matches anything.
pub fn is_duplicate(a: &BusinessRecord, b: &BusinessRecord) -> bool {
    if (a.website.is_none() && a.name.is_none()) || (b.website.is_none() && b.name.is_none()) {
        return false;
    }

    // Rule 1: website domain equality.
    if let (Some(da), Some(db)) = (
        a.website.as_deref().and_then(normalize_domain),
        b.website.as_deref().and_then(normalize_domain),
    ) {
        if da == db {
            return true;
        }
    }

    let names_match = match (a.name.as_deref(), b.name.as_deref()) {
        (Some(na), Some(nb)) => {
            let na = normalize_name(na);
            !na.is_empty() && na == normalize_name(nb)
        }
        _ => false,
    };
    let phones_intersect = intersects(&a.phones, &b.phones);

    // Rule 2: same name and a shared phone.
    if names_match && phones_intersect {
        return true;
    }

    // Rule 3: same name and a shared email.
    if names_match && intersects(&a.emails, &b.emails) {
        return true;
    }

    // Rule 4: shared phone and same city.
    if phones_intersect {
        if let (Some(ca), Some(cb)) = (a.city.as_deref(), b.city.as_deref()) {
            if ca.eq_ignore_ascii_case(cb) {
                return true;
            }
        }
    }

    false
}

fn union(into: &mut Vec<String>, from: Vec<String>) {
    for value in from {
        BusinessRecord::push_sorted_unique(into, value);
    }
}

fn longer_non_empty(a: Option<String>, b: Option<String>) -> Option<String> {
    match (a, b) {
        (Some(a), Some(b)) => {
            if b.trim().len() > a.trim().len() && !b.trim().is_empty() {
                Some(b)
            } else if a.trim().is_empty() {
                Some(b)
            } else {
                Some(a)
            }
        }
        (a, b) => a.or(b),
    }
}

fn prefer_https(a: Option<String>, b: Option<String>) -> Option<String> {
    match (a, b) {
        (Some(a), Some(b)) => {
            if !a.starts_with("https://") && b.starts_with("https://") {
                Some(b)
            } else {
                Some(a)
            }
        }
        (a, b) => a.or(b),
    }
}

/// Deterministic field-level merge. Set fields are unioned, scalar fields
/// keep the existing value unless the policy says otherwise, and the quality
/// score is recomputed from the merged fields.
pub fn merge(mut a: BusinessRecord, b: BusinessRecord) -> BusinessRecord {
    union(&mut a.emails, b.emails);
    union(&mut a.phones, b.phones);
    union(&mut a.sources, b.sources);
    union(&mut a.tech_stack, b.tech_stack);
    union(&mut a.service_tags, b.service_tags);
    union(&mut a.third_party_widgets, b.third_party_widgets);
    union(&mut a.branch_locations, b.branch_locations);
    union(&mut a.compliance_flags, b.compliance_flags);

    a.name = longer_non_empty(a.name, b.name);
    a.address = longer_non_empty(a.address, b.address);
    a.website = prefer_https(a.website, b.website);
    a.city = a.city.or(b.city);
    a.country = a.country.or(b.country);
    a.niche = a.niche.or(b.niche);
    a.cms = a.cms.or(b.cms);
    a.company_size = a.company_size.or(b.company_size);
    a.contact_person_name = a.contact_person_name.or(b.contact_person_name);
    a.contact_person_role = a.contact_person_role.or(b.contact_person_role);
    a.contact_person_email = a.contact_person_email.or(b.contact_person_email);
    a.website_text = a.website_text.or(b.website_text);
    a.is_multi_location = a.is_multi_location || b.is_multi_location;
    a.source = a.source.or(b.source);
    a.discovered_at = a.discovered_at.min(b.discovered_at);

    for (platform, url) in b.social_links {
        a.social_links.entry(platform).or_insert(url);
    }

    quality::score(&mut a);
    a
}

/// Collapses a batch to one canonical record per business. Pairwise against
/// the already-accepted records; fine at the batch sizes one discovery run
/// produces.
pub fn dedupe(batch: Vec<BusinessRecord>) -> Vec<BusinessRecord> {
    let before = batch.len();
    let mut out: Vec<BusinessRecord> = Vec::with_capacity(batch.len());

    'next: for record in batch {
        for existing in out.iter_mut() {
            if is_duplicate(existing, &record) {
                let merged = merge(std::mem::replace(existing, BusinessRecord::empty()), record);
                *existing = merged;
                continue 'next;
            }
        }
        out.push(record);
    }

    debug!(before, after = out.len(), "deduplicated batch");
    out
}
