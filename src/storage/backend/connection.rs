//! Connection setup for the SeaORM backend

use std::str::FromStr;
use std::time::Duration;

use sea_orm::sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, SqlxSqliteConnector};
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::errors::{LinkhopError, Result};
use migration::{Migrator, MigratorTrait};

/// Opens a pooled connection for `backend` ("sqlite", "mysql" or "postgres")
/// and brings the schema up to date.
pub async fn open_database(config: &DatabaseConfig, backend: &str) -> Result<DatabaseConnection> {
    let db = match backend {
        "sqlite" => connect_sqlite(&sqlite_url(&config.database_url), config).await?,
        _ => connect_pooled(&config.database_url, backend, config).await?,
    };
    run_migrations(&db).await?;
    Ok(db)
}

/// 裸文件路径补上 `sqlite://` 前缀
fn sqlite_url(database_url: &str) -> String {
    if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite://{}", database_url)
    }
}

async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
    // WAL 让跳转读取不被计数写入阻塞
    let options = SqliteConnectOptions::from_str(url)
        .map_err(|e| LinkhopError::database_config(format!("Invalid SQLite URL '{}': {}", url, e)))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.pool_size.max(1))
        .acquire_timeout(Duration::from_secs(config.timeout))
        .connect_with(options)
        .await
        .map_err(|e| LinkhopError::database_connection(format!("SQLite: {}", e)))?;

    debug!("SQLite pool opened ({} connections max)", config.pool_size.max(1));
    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

async fn connect_pooled(
    url: &str,
    backend: &str,
    config: &DatabaseConfig,
) -> Result<DatabaseConnection> {
    let timeout = Duration::from_secs(config.timeout);

    let mut options = ConnectOptions::new(url.to_owned());
    options
        .max_connections(config.pool_size)
        .min_connections(config.pool_size.min(2))
        .connect_timeout(timeout)
        .acquire_timeout(timeout)
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(false);

    Database::connect(options)
        .await
        .map_err(|e| LinkhopError::database_connection(format!("{}: {}", backend, e)))
}

async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None)
        .await
        .map_err(|e| LinkhopError::database_operation(format!("migration failed: {}", e)))?;
    info!("Database schema is up to date");
    Ok(())
}
