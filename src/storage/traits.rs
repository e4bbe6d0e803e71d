use async_trait::async_trait;

use super::models::{BackendInfo, CounterField, LinkField, LinkRecord, NewLinkRecord};
use crate::errors::Result;

/// Document-store view of the `links` collection.
///
/// The resolution path uses only [`query_by_field`](LinkStore::query_by_field)
/// and [`increment_field`](LinkStore::increment_field); the rest exists for the
/// management surface and health checks.
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// All records whose `field` equals `value`, ordered by ascending
    /// `created_at`, then ascending `id`.
    async fn query_by_field(&self, field: LinkField, value: &str) -> Result<Vec<LinkRecord>>;

    /// Atomically adds `delta` to `field` of record `id`.
    ///
    /// Must be a single store-side operation; concurrent calls compose
    /// additively. An unknown `id` yields `LinkhopError::NotFound`.
    async fn increment_field(&self, id: &str, field: CounterField, delta: u64) -> Result<()>;

    /// Inserts a record with a store-assigned `id` and `created_at` and
    /// `clicks = 0`. A taken `short_code` yields `LinkhopError::Conflict`.
    async fn insert(&self, link: NewLinkRecord) -> Result<LinkRecord>;

    async fn get_by_id(&self, id: &str) -> Result<Option<LinkRecord>>;

    async fn update_original_url(&self, id: &str, original_url: &str) -> Result<LinkRecord>;

    async fn delete(&self, id: &str) -> Result<()>;

    async fn count(&self) -> Result<u64>;

    fn backend_info(&self) -> BackendInfo;
}
