//! Link management service
//!
//! Owner-scoped CRUD used by the `/api/links` handlers. A record owned by
//! someone else is reported as not found.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{LinksConfig, StaticConfig};
use crate::errors::{LinkhopError, Result};
use crate::storage::{LinkField, LinkRecord, LinkStore, NewLinkRecord};
use crate::utils::url_validator::{validate_url, validation_error_message};
use crate::utils::{MAX_CODE_LENGTH, canonicalize_code, generate_random_code, is_valid_short_code};

/// Request to create a new link
#[derive(Debug, Clone)]
pub struct CreateLinkRequest {
    /// Destination; stored as given (a missing scheme is added at redirect time)
    pub original_url: String,
    /// Short code (optional, will be generated if not provided)
    pub code: Option<String>,
}

pub struct LinkService {
    store: Arc<dyn LinkStore>,
    links: LinksConfig,
    reserved_codes: Vec<String>,
}

impl LinkService {
    /// `links.code_length` is clamped to `1..=MAX_CODE_LENGTH` so generated
    /// codes are always resolvable.
    pub fn new(
        store: Arc<dyn LinkStore>,
        mut links: LinksConfig,
        reserved_codes: Vec<String>,
    ) -> Self {
        let code_length = links.code_length.clamp(1, MAX_CODE_LENGTH);
        if code_length != links.code_length {
            warn!(
                "links.code_length = {} is out of range, using {}",
                links.code_length, code_length
            );
            links.code_length = code_length;
        }
        Self {
            store,
            links,
            reserved_codes,
        }
    }

    pub fn from_config(store: Arc<dyn LinkStore>, config: &StaticConfig) -> Self {
        Self::new(store, config.links.clone(), config.routes.reserved_codes())
    }

    fn check_url(url: &str) -> Result<String> {
        let url = url.trim();
        validate_url(url).map_err(|e| {
            debug!("Rejected URL {:?}: {}", url, e);
            LinkhopError::validation(validation_error_message(&e))
        })?;
        Ok(url.to_string())
    }

    fn check_code(&self, code: &str) -> Result<String> {
        let code = canonicalize_code(code);
        if !is_valid_short_code(&code) {
            return Err(LinkhopError::validation(format!(
                "Invalid short code '{}'. Use 1-64 characters from a-z, 0-9, '_' and '-'",
                code
            )));
        }
        if self.reserved_codes.contains(&code) {
            return Err(LinkhopError::validation(format!(
                "Short code '{}' conflicts with reserved routes",
                code
            )));
        }
        Ok(code)
    }

    /// Caller's links, newest first.
    pub async fn list_links(&self, owner_id: &str) -> Result<Vec<LinkRecord>> {
        let mut links = self
            .store
            .query_by_field(LinkField::OwnerId, owner_id)
            .await?;
        // 存储顺序是最旧在前
        links.reverse();
        Ok(links)
    }

    pub async fn create_link(&self, owner_id: &str, req: CreateLinkRequest) -> Result<LinkRecord> {
        let original_url = Self::check_url(&req.original_url)?;

        let record = match req.code.as_deref().filter(|c| !c.trim().is_empty()) {
            Some(code) => {
                let short_code = self.check_code(code)?;
                self.store
                    .insert(NewLinkRecord {
                        short_code,
                        original_url,
                        owner_id: owner_id.to_string(),
                    })
                    .await?
            }
            None => self.insert_generated(owner_id, original_url).await?,
        };

        info!(
            "LinkService: created link '{}' -> '{}' for {}",
            record.short_code, record.original_url, owner_id
        );
        Ok(record)
    }

    /// Inserts under a fresh random code, retrying on collisions.
    async fn insert_generated(&self, owner_id: &str, original_url: String) -> Result<LinkRecord> {
        let attempts = self.links.max_generate_attempts.max(1);
        for attempt in 1..=attempts {
            // 与自定义短码走同一套校验（含保留路由）
            let Ok(short_code) = self.check_code(&generate_random_code(self.links.code_length))
            else {
                continue;
            };
            match self
                .store
                .insert(NewLinkRecord {
                    short_code,
                    original_url: original_url.clone(),
                    owner_id: owner_id.to_string(),
                })
                .await
            {
                Err(LinkhopError::Conflict(msg)) => {
                    debug!("Generated code collided (attempt {}/{}): {}", attempt, attempts, msg);
                }
                other => return other,
            }
        }
        Err(LinkhopError::conflict(format!(
            "Could not find a free short code after {} attempts",
            attempts
        )))
    }

    /// Record `id` if it exists and belongs to `owner_id`.
    pub async fn get_owned(&self, owner_id: &str, id: &str) -> Result<LinkRecord> {
        self.store
            .get_by_id(id)
            .await?
            .filter(|record| record.owner_id == owner_id)
            .ok_or_else(|| LinkhopError::not_found(format!("Link '{}' not found", id)))
    }

    pub async fn update_link(
        &self,
        owner_id: &str,
        id: &str,
        original_url: &str,
    ) -> Result<LinkRecord> {
        let original_url = Self::check_url(original_url)?;
        self.get_owned(owner_id, id).await?;

        let updated = self.store.update_original_url(id, &original_url).await?;
        info!("LinkService: updated '{}'", updated.short_code);
        Ok(updated)
    }

    pub async fn delete_link(&self, owner_id: &str, id: &str) -> Result<()> {
        let record = self.get_owned(owner_id, id).await?;
        self.store.delete(id).await?;
        info!("LinkService: deleted '{}'", record.short_code);
        Ok(())
    }
}
