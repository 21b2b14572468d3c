use crate::models::{BusinessRecord, QualityLabel};
use crate::web_crawler::contact_extractor::ContactExtractor;

/// Rule-based quality score. Weighted table, clamped to [0, 100]; the label
/// is banded from the final score.
pub fn score(record: &mut BusinessRecord) {
    let mut score: f64 = 0.0;

    let all_generic = !record.emails.is_empty()
        && record
            .emails
            .iter()
            .all(|e| ContactExtractor::is_generic_email(e));

    if !record.emails.is_empty() {
        score += 20.0;
        if record.emails.len() > 1 {
            score += 5.0;
        }
        if all_generic {
            score -= 5.0;
        } else {
            score += 5.0;
        }
    }

    if !record.phones.is_empty() {
        score += 25.0;
    }

    match record.website.as_deref() {
        Some(website) => {
            score += 15.0;
            if website.starts_with("https://") {
                score += 5.0;
            }
        }
        None => score -= 10.0,
    }

    if !record.social_links.is_empty() {
        score += 10.0;
        if record.social_links.len() > 2 {
            score += 2.0;
        }
    }

    match (
        &record.contact_person_name,
        &record.contact_person_role,
        &record.contact_person_email,
    ) {
        (Some(_), Some(_), Some(_)) => score += 10.0,
        (Some(_), _, _) => score += 5.0,
        _ => {}
    }

    if !record.tech_stack.is_empty() {
        score += 5.0;
    }
    if !record.service_tags.is_empty() {
        score += 5.0;
    }

    if all_generic && record.phones.is_empty() {
        score -= 5.0;
    }

    record.quality_score = score.clamp(0.0, 100.0);
    record.quality_label = Some(QualityLabel::from_score(record.quality_score));
}
