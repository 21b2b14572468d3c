use regex::Regex;

use crate::models::BusinessRecord;

/// Boolean detection of compliance signals in page text or link labels.
/// A detected signal is appended to the record as an uppercase tag.
pub struct ComplianceDetector {
    flags: Vec<(&'static str, Regex)>,
}

impl ComplianceDetector {
    pub fn new() -> Self {
        let table: [(&'static str, &str); 7] = [
            ("GDPR", r"(?i)\bgdpr\b|general data protection"),
            ("CCPA", r"(?i)\bccpa\b|california consumer privacy"),
            ("PRIVACY_POLICY", r"(?i)privacy policy|privacy statement"),
            (
                "COOKIE_CONSENT",
                r"(?i)cookie (?:consent|policy|settings|preferences)|we use cookies",
            ),
            ("TERMS_OF_SERVICE", r"(?i)terms (?:of service|of use|and conditions)"),
            ("MEDICAL_CONSENT", r"(?i)medical consent|patient consent|informed consent"),
            ("HIPAA", r"(?i)\bhipaa\b"),
        ];
        Self {
            flags: table
                .iter()
                .map(|(tag, pattern)| {
                    (*tag, Regex::new(pattern).expect("invalid compliance pattern"))
                })
                .collect(),
        }
    }

    pub fn detect(&self, record: &mut BusinessRecord, text: &str) {
        for (tag, pattern) in &self.flags {
            if pattern.is_match(text) {
                BusinessRecord::push_sorted_unique(
                    &mut record.compliance_flags,
                    (*tag).to_string(),
                );
            }
        }
    }
}

impl Default for ComplianceDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_uppercase_tags() {
        let text = "We use cookies. Read our Privacy Policy. HIPAA compliant practice.";
        let mut record = BusinessRecord::empty();
        ComplianceDetector::new().detect(&mut record, text);
        assert_eq!(
            record.compliance_flags,
            vec!["COOKIE_CONSENT", "HIPAA", "PRIVACY_POLICY"]
        );
    }

    #[test]
    fn no_signals_no_flags() {
        let mut record = BusinessRecord::empty();
        ComplianceDetector::new().detect(&mut record, "Welcome to our bakery");
        assert!(record.compliance_flags.is_empty());
    }
}
