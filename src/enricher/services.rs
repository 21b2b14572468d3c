use crate::models::BusinessRecord;

struct NicheVocabulary {
    /// Niche keywords that select this vocabulary.
    niches: &'static [&'static str],
    /// Service keywords looked up in page text; matches become tags.
    services: &'static [&'static str],
}

const VOCABULARIES: [NicheVocabulary; 5] = [
    NicheVocabulary {
        niches: &["dentist", "dental", "orthodontist", "doctor", "clinic", "medical", "physio"],
        services: &[
            "implants",
            "orthodontics",
            "invisalign",
            "teeth whitening",
            "root canal",
            "dental hygiene",
            "emergency appointments",
            "pediatric",
            "physiotherapy",
            "telehealth",
        ],
    },
    NicheVocabulary {
        niches: &["restaurant", "cafe", "bistro", "bar", "catering"],
        services: &[
            "vegan",
            "vegetarian",
            "gluten-free",
            "delivery",
            "takeaway",
            "catering",
            "outdoor seating",
            "reservations",
            "brunch",
        ],
    },
    NicheVocabulary {
        niches: &["lawyer", "attorney", "legal", "law firm", "notary"],
        services: &[
            "family law",
            "criminal defense",
            "immigration",
            "personal injury",
            "estate planning",
            "corporate law",
            "free consultation",
        ],
    },
    NicheVocabulary {
        niches: &["gym", "fitness", "yoga", "pilates", "crossfit"],
        services: &[
            "personal training",
            "group classes",
            "yoga",
            "pilates",
            "nutrition coaching",
            "day pass",
            "memberships",
        ],
    },
    NicheVocabulary {
        niches: &["salon", "spa", "barber", "beauty"],
        services: &[
            "haircut",
            "coloring",
            "manicure",
            "pedicure",
            "massage",
            "facial",
            "waxing",
            "walk-ins",
        ],
    },
];

/// Niche-keyword membership test against a curated vocabulary. Only runs a
/// vocabulary whose niche keywords match the candidate's niche.
pub struct ServiceTagger;

impl ServiceTagger {
    pub fn new() -> Self {
        Self
    }

    pub fn tag(&self, record: &mut BusinessRecord, text: &str) {
        let Some(niche) = record.niche.as_deref() else {
            return;
        };
        let niche = niche.to_lowercase();
        let text = text.to_lowercase();

        for vocabulary in &VOCABULARIES {
            if !vocabulary.niches.iter().any(|n| niche.contains(n)) {
                continue;
            }
            for service in vocabulary.services {
                if text.contains(service) {
                    BusinessRecord::push_sorted_unique(
                        &mut record.service_tags,
                        (*service).to_string(),
                    );
                }
            }
        }
    }
}

impl Default for ServiceTagger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_match_the_record_niche() {
        let mut record = BusinessRecord::new("Acme Dental", "dentist", "test");
        let text = "We offer Invisalign, implants and emergency appointments. Also vegan food.";
        ServiceTagger::new().tag(&mut record, text);
        assert_eq!(
            record.service_tags,
            vec!["emergency appointments", "implants", "invisalign"]
        );
    }

    #[test]
    fn unknown_niche_gets_no_tags() {
        let mut record = BusinessRecord::new("Acme Mining", "mining equipment", "test");
        ServiceTagger::new().tag(&mut record, "implants delivery yoga");
        assert!(record.service_tags.is_empty());
    }

    #[test]
    fn no_niche_no_tags() {
        let mut record = BusinessRecord::empty();
        ServiceTagger::new().tag(&mut record, "implants");
        assert!(record.service_tags.is_empty());
    }
}
