//! In-process store backed by `DashMap`
//!
//! Selected with `database_url = "memory://"`. Data lives only as long as the
//! process; useful for local runs and tests.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info};

use super::models::{BackendInfo, CounterField, LinkField, LinkRecord, NewLinkRecord};
use super::traits::LinkStore;
use crate::errors::{LinkhopError, Result};

#[derive(Default)]
pub struct MemoryStore {
    /// id -> record
    links: DashMap<String, LinkRecord>,
    /// short_code -> id，保证短码唯一
    codes: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn query_by_field(&self, field: LinkField, value: &str) -> Result<Vec<LinkRecord>> {
        let mut matches: Vec<LinkRecord> = match field {
            LinkField::ShortCode => self
                .codes
                .get(value)
                .and_then(|id| self.links.get(id.value()).map(|r| r.value().clone()))
                .into_iter()
                .collect(),
            LinkField::OwnerId => self
                .links
                .iter()
                .filter(|r| r.owner_id == value)
                .map(|r| r.value().clone())
                .collect(),
        };

        matches.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(matches)
    }

    async fn increment_field(&self, id: &str, field: CounterField, delta: u64) -> Result<()> {
        // get_mut 持有分片写锁，读改写在锁内完成
        match self.links.get_mut(id) {
            Some(mut record) => {
                match field {
                    CounterField::Clicks => {
                        record.clicks = record.clicks.saturating_add(delta);
                    }
                }
                Ok(())
            }
            None => Err(LinkhopError::not_found(format!("link '{}' does not exist", id))),
        }
    }

    async fn insert(&self, link: NewLinkRecord) -> Result<LinkRecord> {
        let id = uuid::Uuid::new_v4().to_string();

        match self.codes.entry(link.short_code.clone()) {
            Entry::Occupied(_) => Err(LinkhopError::conflict(format!(
                "short code '{}' is already taken",
                link.short_code
            ))),
            Entry::Vacant(slot) => {
                let record = LinkRecord {
                    id: id.clone(),
                    short_code: link.short_code,
                    original_url: link.original_url,
                    owner_id: link.owner_id,
                    clicks: 0,
                    created_at: Utc::now(),
                };
                self.links.insert(id.clone(), record.clone());
                slot.insert(id);
                debug!("MemoryStore: inserted '{}'", record.short_code);
                Ok(record)
            }
        }
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<LinkRecord>> {
        Ok(self.links.get(id).map(|r| r.value().clone()))
    }

    async fn update_original_url(&self, id: &str, original_url: &str) -> Result<LinkRecord> {
        match self.links.get_mut(id) {
            Some(mut record) => {
                record.original_url = original_url.to_string();
                Ok(record.clone())
            }
            None => Err(LinkhopError::not_found(format!("link '{}' does not exist", id))),
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let Some((_, record)) = self.links.remove(id) else {
            return Err(LinkhopError::not_found(format!("link '{}' does not exist", id)));
        };
        self.codes.remove_if(&record.short_code, |_, owner| owner == id);
        info!("MemoryStore: deleted '{}'", record.short_code);
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.links.len() as u64)
    }

    fn backend_info(&self) -> BackendInfo {
        BackendInfo {
            storage_type: "memory".to_string(),
            support_click: true,
        }
    }
}
