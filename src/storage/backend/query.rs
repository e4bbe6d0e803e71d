//! Query operations for SeaOrmStore
//!
//! This module contains all read-only database operations.

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use tracing::error;

use super::converters::model_to_record;
use super::{SeaOrmStore, retry};
use crate::errors::{LinkhopError, Result};
use crate::storage::{LinkField, LinkRecord};

use migration::entities::link;

fn column_for(field: LinkField) -> link::Column {
    match field {
        LinkField::ShortCode => link::Column::ShortCode,
        LinkField::OwnerId => link::Column::OwnerId,
    }
}

impl SeaOrmStore {
    pub async fn find_by_field(&self, field: LinkField, value: &str) -> Result<Vec<LinkRecord>> {
        let db = &self.db;
        let column = column_for(field);
        let value_owned = value.to_string();

        let models = retry::with_retry(
            &format!("query_by_field({}={})", field, value),
            self.retry_config,
            || async {
                link::Entity::find()
                    .filter(column.eq(value_owned.as_str()))
                    .order_by_asc(link::Column::CreatedAt)
                    .order_by_asc(link::Column::Id)
                    .all(db)
                    .await
            },
        )
        .await
        .map_err(|e| {
            error!("查询短链接失败（重试后仍失败）: {}", e);
            LinkhopError::database_operation(format!("query by {} failed: {}", field, e))
        })?;

        Ok(models.into_iter().map(model_to_record).collect())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<LinkRecord>> {
        let db = &self.db;
        let id_owned = id.to_string();

        let model = retry::with_retry(&format!("get_by_id({})", id), self.retry_config, || async {
            link::Entity::find_by_id(id_owned.as_str()).one(db).await
        })
        .await
        .map_err(|e| LinkhopError::database_operation(format!("get link '{}' failed: {}", id, e)))?;

        Ok(model.map(model_to_record))
    }

    pub async fn count_links(&self) -> Result<u64> {
        let db = &self.db;
        retry::with_retry("count", self.retry_config, || async {
            link::Entity::find().count(db).await
        })
        .await
        .map_err(|e| LinkhopError::database_operation(format!("count failed: {}", e)))
    }
}
