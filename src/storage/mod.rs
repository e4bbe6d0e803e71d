use std::sync::Arc;

use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod memory;
pub mod models;
pub mod traits;

pub use backend::SeaOrmStore;
pub use memory::MemoryStore;
pub use models::{BackendInfo, CounterField, LinkField, LinkRecord, NewLinkRecord};
pub use traits::LinkStore;

pub const MEMORY_URL_SCHEME: &str = "memory://";

/// Opened store plus the SQL connection behind it, if any (needed for shutdown).
pub struct OpenedStore {
    pub store: Arc<dyn LinkStore>,
    pub sql: Option<Arc<SeaOrmStore>>,
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &DatabaseConfig) -> Result<OpenedStore> {
        if config.database_url.starts_with(MEMORY_URL_SCHEME) {
            info!("Using in-memory link store; data is lost on exit");
            return Ok(OpenedStore {
                store: Arc::new(MemoryStore::new()),
                sql: None,
            });
        }

        let storage = Arc::new(SeaOrmStore::new(config).await?);
        Ok(OpenedStore {
            store: storage.clone(),
            sql: Some(storage),
        })
    }
}
