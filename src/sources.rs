use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{BusinessRecord, Result};
use crate::web_crawler::normalizer::{normalize_emails, normalize_phones};

/// A provider of partial business records for a (niche, location) query.
/// Sources may fail independently; the pipeline logs and moves on.
#[async_trait]
pub trait DiscoverySource: Send + Sync {
    fn name(&self) -> &str;
    async fn search(&self, niche: &str, location: &str) -> Result<Vec<BusinessRecord>>;
}

/// One seed entry in a YAML-backed source file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedEntry {
    pub name: String,
    pub niche: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub phones: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedFile {
    pub source: String,
    pub entries: Vec<SeedEntry>,
}

/// Discovery source backed by a static seed list. Matches entries whose
/// niche contains the queried niche and whose city/country matches the
/// queried location when one is present on the entry.
pub struct StaticSource {
    name: String,
    entries: Vec<SeedEntry>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, entries: Vec<SeedEntry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    pub async fn from_yaml(path: &str) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let file: SeedFile = serde_yaml::from_str(&content)?;
        Ok(Self::new(file.source, file.entries))
    }

    fn matches_location(entry: &SeedEntry, location: &str) -> bool {
        if location.is_empty() {
            return true;
        }
        let location = location.to_lowercase();
        let field_matches = |field: &Option<String>| {
            field
                .as_deref()
                .map(|v| v.to_lowercase().contains(&location) || location.contains(&v.to_lowercase()))
                .unwrap_or(false)
        };
        // Entries without any location data pass through.
        if entry.city.is_none() && entry.country.is_none() && entry.address.is_none() {
            return true;
        }
        field_matches(&entry.city) || field_matches(&entry.country) || field_matches(&entry.address)
    }
}

#[async_trait]
impl DiscoverySource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, niche: &str, location: &str) -> Result<Vec<BusinessRecord>> {
        let niche_lower = niche.to_lowercase();
        let records = self
            .entries
            .iter()
            .filter(|entry| {
                entry.niche.to_lowercase().contains(&niche_lower)
                    && Self::matches_location(entry, location)
            })
            .map(|entry| {
                let mut record = BusinessRecord::new(&entry.name, &entry.niche, &self.name);
                record.website = entry.website.clone();
                record.address = entry.address.clone();
                record.city = entry.city.clone();
                record.country = entry.country.clone();
                record.emails = normalize_emails(&entry.emails);
                record.phones = normalize_phones(&entry.phones);
                record
            })
            .collect();
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> StaticSource {
        StaticSource::new(
            "seed",
            vec![
                SeedEntry {
                    name: "Acme Dental".to_string(),
                    niche: "dentist".to_string(),
                    website: Some("https://acme-dental.com".to_string()),
                    address: None,
                    city: Some("Geneva".to_string()),
                    country: Some("Switzerland".to_string()),
                    emails: vec!["Info@Acme-Dental.com".to_string()],
                    phones: vec!["(555) 010-0200".to_string()],
                },
                SeedEntry {
                    name: "Burger Hut".to_string(),
                    niche: "restaurant".to_string(),
                    website: None,
                    address: None,
                    city: Some("Lausanne".to_string()),
                    country: None,
                    emails: vec![],
                    phones: vec![],
                },
            ],
        )
    }

    #[tokio::test]
    async fn filters_by_niche_and_location() {
        let records = source().search("dentist", "geneva").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_deref(), Some("Acme Dental"));

        let records = source().search("dentist", "lausanne").await.unwrap();
        assert!(records.is_empty());

        let records = source().search("restaurant", "").await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn seed_contacts_are_normalized() {
        let records = source().search("dentist", "geneva").await.unwrap();
        assert_eq!(records[0].emails, vec!["info@acme-dental.com"]);
        assert_eq!(records[0].phones, vec!["5550100200"]);
        assert_eq!(records[0].sources, vec!["seed"]);
    }
}
