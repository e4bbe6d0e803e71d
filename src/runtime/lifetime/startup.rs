use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::StaticConfig;
use crate::services::{LinkService, RedirectFlow};
use crate::storage::{LinkStore, SeaOrmStore, StorageFactory};

pub struct StartupContext {
    pub store: Arc<dyn LinkStore>,
    /// SQL backend handle, kept to close the pool on shutdown
    pub sql: Option<Arc<SeaOrmStore>>,
    pub redirect_flow: RedirectFlow,
    pub link_service: Arc<LinkService>,
    pub route_config: RouteConfig,
}

#[derive(Clone, Debug)]
pub struct RouteConfig {
    pub api_prefix: String,
    pub health_prefix: String,
}

/// 准备服务器启动的上下文
/// 包括存储、服务和路由配置
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let opened = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!(
        "Using storage backend: {}",
        opened.store.backend_info().storage_type
    );

    let redirect_flow = RedirectFlow::new(opened.store.clone(), &config.redirect);
    info!(
        "Click accounting mode: {:?}, lookup deadline: {} ms",
        config.redirect.accounting, config.redirect.request_timeout_ms
    );

    let link_service = Arc::new(LinkService::from_config(opened.store.clone(), config));

    if config.auth.jwt_secret.is_empty() {
        warn!("auth.jwt_secret is empty; the management API is disabled");
    } else {
        info!("Management API available at: {}/links", config.routes.api_prefix);
    }

    let route_config = RouteConfig {
        api_prefix: config.routes.api_prefix.clone(),
        health_prefix: config.routes.health_prefix.clone(),
    };

    debug!("Pre-startup completed in {:?}", start_time.elapsed());

    Ok(StartupContext {
        store: opened.store,
        sql: opened.sql,
        redirect_flow,
        link_service,
        route_config,
    })
}
