//! Server mode
//!
//! Configures the route table and runs the HTTP server until Ctrl+C.

use actix_web::{App, HttpServer, http::StatusCode, middleware::Compress, web};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::api::middleware::{BearerAuth, RequestIdMiddleware};
use crate::api::services::types::{ErrorCode, error_response};
use crate::api::services::{AppStartTime, health_routes, links_routes, redirect_routes};
use crate::config::StaticConfig;
use crate::runtime::lifetime::{self, startup::RouteConfig};
use crate::services::{LinkService, RedirectFlow};
use crate::storage::LinkStore;

/// Everything the route table needs, cloned into each worker
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LinkStore>,
    pub redirect_flow: RedirectFlow,
    pub link_service: Arc<LinkService>,
    pub auth: BearerAuth,
    pub routes: RouteConfig,
    pub start_time: AppStartTime,
}

/// JSON body errors use the API envelope
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| {
            let response =
                error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &err.to_string());
            actix_web::error::InternalError::from_response(err, response).into()
        })
}

/// Registers app data and routes. The redirect catch-all goes last.
pub fn configure_routes(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state.store.clone()))
            .app_data(web::Data::new(state.redirect_flow.clone()))
            .app_data(web::Data::from(state.link_service.clone()))
            .app_data(web::Data::new(state.start_time.clone()))
            .app_data(json_config())
            .service(
                web::scope(&state.routes.api_prefix)
                    .wrap(state.auth.clone())
                    .service(links_routes()),
            )
            .service(health_routes(&state.routes.health_prefix))
            .service(redirect_routes());
    }
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: &StaticConfig) -> Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let startup = lifetime::startup::prepare_server_startup(config)
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {:#}", e))?;

    let state = AppState {
        store: startup.store.clone(),
        redirect_flow: startup.redirect_flow.clone(),
        link_service: startup.link_service.clone(),
        auth: BearerAuth::from_config(&config.auth),
        routes: startup.route_config.clone(),
        start_time: app_start_time,
    };

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(RequestIdMiddleware)
            .configure(configure_routes(state.clone()))
    })
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_millis(5000))
    .client_disconnect_timeout(Duration::from_millis(1000))
    .workers(cpu_count)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?;

    warn!("Starting server at http://{}", bind_address);
    let server = server.run();

    tokio::select! {
        res = server => {
            res.context("HTTP server terminated with an error")?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(startup.sql.clone()) => {
            warn!("Graceful shutdown completed");
        }
    }

    Ok(())
}
