//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod connection;
mod converters;
mod mutations;
mod query;
pub mod retry;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::{LinkhopError, Result};
use crate::storage::models::{BackendInfo, CounterField, LinkField, LinkRecord, NewLinkRecord};
use crate::storage::traits::LinkStore;

pub use connection::open_database;
pub use converters::model_to_record;

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(LinkhopError::database_config(format!(
            "Cannot infer database type from URL: {}. Supported: sqlite://, mysql://, mariadb://, postgres://, memory://",
            database_url
        )))
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
    backend_name: String,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStore {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let database_url = config.database_url.as_str();
        if database_url.is_empty() {
            return Err(LinkhopError::database_config("database_url 未设置"));
        }

        let backend_name = infer_backend_from_url(database_url)?;

        let db = open_database(config, &backend_name).await?;

        let store = Self::from_connection(db, &backend_name, config.into());
        info!("{} storage initialized", store.backend_name);
        Ok(store)
    }

    /// Wraps an already-migrated connection.
    pub fn from_connection(
        db: DatabaseConnection,
        backend_name: &str,
        retry_config: retry::RetryConfig,
    ) -> Self {
        Self {
            db,
            backend_name: backend_name.to_string(),
            retry_config,
        }
    }

    /// 获取数据库连接（关闭时使用）
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl LinkStore for SeaOrmStore {
    async fn query_by_field(&self, field: LinkField, value: &str) -> Result<Vec<LinkRecord>> {
        self.find_by_field(field, value).await
    }

    async fn increment_field(&self, id: &str, field: CounterField, delta: u64) -> Result<()> {
        self.increment(id, field, delta).await
    }

    async fn insert(&self, link: NewLinkRecord) -> Result<LinkRecord> {
        self.insert_link(link).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<LinkRecord>> {
        self.find_by_id(id).await
    }

    async fn update_original_url(&self, id: &str, original_url: &str) -> Result<LinkRecord> {
        self.set_original_url(id, original_url).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.remove(id).await
    }

    async fn count(&self) -> Result<u64> {
        self.count_links().await
    }

    fn backend_info(&self) -> BackendInfo {
        BackendInfo {
            storage_type: self.backend_name.clone(),
            support_click: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(infer_backend_from_url("sqlite://links.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("sqlite::memory:").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("links.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("mariadb://u@h/db").unwrap(), "mysql");
        assert_eq!(infer_backend_from_url("postgresql://u@h/db").unwrap(), "postgres");
        assert!(matches!(
            infer_backend_from_url("mongodb://h/db"),
            Err(LinkhopError::DatabaseConfig(_))
        ));
    }
}
