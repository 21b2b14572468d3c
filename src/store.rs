use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::dedup;
use crate::models::{BusinessRecord, Result};

/// Persistence boundary. Implementations reconcile incoming records against
/// previously stored ones with the same identity and merge rules the batch
/// resolver uses, keyed by website identity when present.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Idempotent upsert; returns one persisted id per input record, in
    /// input order.
    async fn upsert(
        &self,
        records: &[BusinessRecord],
        job_id: Uuid,
        organization_id: &str,
    ) -> Result<Vec<String>>;
}

#[derive(Debug, Clone)]
struct StoredLead {
    id: String,
    organization_id: String,
    record: BusinessRecord,
}

/// In-memory store used by the binary and by tests.
#[derive(Default)]
pub struct MemoryStore {
    leads: Mutex<HashMap<String, StoredLead>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.leads.lock().await.len()
    }

    pub async fn records(&self) -> Vec<BusinessRecord> {
        self.leads
            .lock()
            .await
            .values()
            .map(|lead| lead.record.clone())
            .collect()
    }
}

#[async_trait]
impl LeadStore for MemoryStore {
    async fn upsert(
        &self,
        records: &[BusinessRecord],
        job_id: Uuid,
        organization_id: &str,
    ) -> Result<Vec<String>> {
        let mut leads = self.leads.lock().await;
        let mut ids = Vec::with_capacity(records.len());

        for record in records {
            let existing_key = leads
                .iter()
                .find(|(_, stored)| {
                    stored.organization_id == organization_id
                        && dedup::is_duplicate(&stored.record, record)
                })
                .map(|(key, _)| key.clone());

            match existing_key {
                Some(key) => {
                    let stored = leads.get_mut(&key).expect("key just found");
                    let merged = dedup::merge(
                        std::mem::replace(&mut stored.record, BusinessRecord::empty()),
                        record.clone(),
                    );
                    stored.record = merged;
                    ids.push(stored.id.clone());
                }
                None => {
                    let id = Uuid::new_v4().to_string();
                    let key = record
                        .website
                        .as_deref()
                        .and_then(dedup::normalize_domain)
                        .map(|domain| format!("{organization_id}/{domain}"))
                        .unwrap_or_else(|| format!("{organization_id}/{id}"));
                    leads.insert(
                        key,
                        StoredLead {
                            id: id.clone(),
                            organization_id: organization_id.to_string(),
                            record: record.clone(),
                        },
                    );
                    ids.push(id);
                }
            }
        }

        debug!(%job_id, organization_id, upserted = ids.len(), "batch stored");
        Ok(ids)
    }
}
