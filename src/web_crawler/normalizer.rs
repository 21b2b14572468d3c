//! Canonical forms for raw email/phone strings. The plural helpers dedupe
//! and sort, which the resolver's set-intersection checks rely on.

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Strip whitespace, parentheses, hyphens and dots, keeping digits and a
/// leading `+` if present.
pub fn normalize_phone(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut out = String::with_capacity(trimmed.len());
    for (i, c) in trimmed.chars().enumerate() {
        if c.is_ascii_digit() || (c == '+' && i == 0) {
            out.push(c);
        }
    }
    out
}

pub fn normalize_emails<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut emails: Vec<String> = raw
        .into_iter()
        .map(|e| normalize_email(e.as_ref()))
        .filter(|e| !e.is_empty())
        .collect();
    emails.sort();
    emails.dedup();
    emails
}

pub fn normalize_phones<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut phones: Vec<String> = raw
        .into_iter()
        .map(|p| normalize_phone(p.as_ref()))
        .filter(|p| !p.is_empty())
        .collect();
    phones.sort();
    phones.dedup();
    phones
}

/// Digit count of a normalized phone, ignoring the leading `+`.
pub fn phone_digit_count(normalized: &str) -> usize {
    normalized.chars().filter(|c| c.is_ascii_digit()).count()
}
