//! Mutation operations for SeaOrmStore
//!
//! This module contains all write database operations.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveValue::Set, ColumnTrait, EntityTrait, ExprTrait, QueryFilter, SqlErr};
use tracing::{debug, info};

use super::{SeaOrmStore, retry};
use crate::errors::{LinkhopError, Result};
use crate::storage::{CounterField, LinkRecord, NewLinkRecord};

use migration::entities::link;

impl SeaOrmStore {
    /// `UPDATE links SET clicks = clicks + ? WHERE id = ?`
    ///
    /// The addition happens inside the database; there is no read in between.
    pub async fn increment(&self, id: &str, field: CounterField, delta: u64) -> Result<()> {
        let delta = i64::try_from(delta)
            .map_err(|_| LinkhopError::validation(format!("increment too large: {}", delta)))?;
        let column = match field {
            CounterField::Clicks => link::Column::Clicks,
        };

        let db = &self.db;
        let id_owned = id.to_string();
        let result = retry::with_retry_when(
            &format!("increment({}.{})", id, field),
            self.retry_config,
            retry::is_safe_to_repeat,
            || async {
                link::Entity::update_many()
                    .col_expr(column, Expr::col(column).add(Expr::val(delta)))
                    .filter(link::Column::Id.eq(id_owned.as_str()))
                    .exec(db)
                    .await
            },
        )
        .await
        .map_err(|e| LinkhopError::database_operation(format!("increment failed: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(LinkhopError::not_found(format!("link '{}' does not exist", id)));
        }

        debug!("Incremented {} of '{}' by {}", field, id, delta);
        Ok(())
    }

    pub async fn insert_link(&self, link: NewLinkRecord) -> Result<LinkRecord> {
        let record = LinkRecord {
            id: uuid::Uuid::new_v4().to_string(),
            short_code: link.short_code,
            original_url: link.original_url,
            owner_id: link.owner_id,
            clicks: 0,
            created_at: Utc::now(),
        };

        let db = &self.db;
        let record_ref = &record;
        let result = retry::with_retry_when(
            &format!("insert({})", record.short_code),
            self.retry_config,
            retry::is_safe_to_repeat,
            || async {
                let active = link::ActiveModel {
                    id: Set(record_ref.id.clone()),
                    short_code: Set(record_ref.short_code.clone()),
                    original_url: Set(record_ref.original_url.clone()),
                    owner_id: Set(record_ref.owner_id.clone()),
                    clicks: Set(0),
                    created_at: Set(record_ref.created_at),
                };
                link::Entity::insert(active).exec_without_returning(db).await
            },
        )
        .await;

        match result {
            Ok(_) => {
                info!(
                    "Short link created: {} -> {}",
                    record.short_code, record.original_url
                );
                Ok(record)
            }
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(LinkhopError::conflict(
                    format!("short code '{}' is already taken", record.short_code),
                )),
                _ => Err(LinkhopError::database_operation(format!(
                    "创建短链接 '{}' 失败: {}",
                    record.short_code, e
                ))),
            },
        }
    }

    pub async fn set_original_url(&self, id: &str, original_url: &str) -> Result<LinkRecord> {
        let db = &self.db;
        let id_owned = id.to_string();
        let url_owned = original_url.to_string();

        retry::with_retry(&format!("update({})", id), self.retry_config, || async {
            link::Entity::update_many()
                .col_expr(link::Column::OriginalUrl, Expr::val(url_owned.as_str()).into())
                .filter(link::Column::Id.eq(id_owned.as_str()))
                .exec(db)
                .await
        })
        .await
        .map_err(|e| LinkhopError::database_operation(format!("更新短链接失败: {}", e)))?;

        // MySQL 对未变化的行返回 0 affected rows，以回读结果判断是否存在
        info!("Short link updated: {}", id);
        self.find_by_id(id)
            .await?
            .ok_or_else(|| LinkhopError::not_found(format!("link '{}' does not exist", id)))
    }

    pub async fn remove(&self, id: &str) -> Result<()> {
        let db = &self.db;
        let id_owned = id.to_string();

        let result = retry::with_retry(&format!("remove({})", id), self.retry_config, || async {
            link::Entity::delete_by_id(id_owned.as_str()).exec(db).await
        })
        .await
        .map_err(|e| LinkhopError::database_operation(format!("删除短链接失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(LinkhopError::not_found(format!("link '{}' does not exist", id)));
        }

        info!("Short link deleted: {}", id);
        Ok(())
    }
}
