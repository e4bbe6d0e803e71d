use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE, HeaderValue, LOCATION};
use actix_web::{HttpResponse, Responder, web};
use tracing::{debug, error};

use crate::errors::ResolveError;
use crate::services::RedirectFlow;

pub struct RedirectService;

impl RedirectService {
    pub async fn handle_redirect(
        path: web::Path<String>,
        flow: web::Data<RedirectFlow>,
    ) -> impl Responder {
        let code = path.into_inner();

        match flow.visit(&code).await {
            Ok(target) => match HeaderValue::from_bytes(target.location.as_bytes()) {
                Ok(location) => HttpResponse::build(StatusCode::TEMPORARY_REDIRECT)
                    .insert_header((LOCATION, location))
                    // 目标可被修改，不允许缓存跳转
                    .insert_header((CACHE_CONTROL, "no-store"))
                    .finish(),
                Err(e) => {
                    error!(
                        "Stored destination of '{}' is not a valid Location header: {}",
                        code, e
                    );
                    Self::error_response()
                }
            },
            Err(ResolveError::NotFound) => {
                debug!("Redirect link not found: {}", code);
                Self::not_found_response()
            }
            Err(ResolveError::Infra(e)) => {
                error!("Store failure during redirect of '{}': {}", code, e);
                Self::error_response()
            }
        }
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header((CONTENT_TYPE, "text/html; charset=utf-8"))
            .insert_header((CACHE_CONTROL, "no-store"))
            .body("<!doctype html><title>Not Found</title><h1>Not Found</h1>")
    }

    #[inline]
    fn error_response() -> HttpResponse {
        HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
            .insert_header((CONTENT_TYPE, "text/html; charset=utf-8"))
            .insert_header((CACHE_CONTROL, "no-store"))
            .body("Internal Server Error")
    }
}

/// Redirect 路由配置（必须最后注册，会匹配所有路径）
pub fn redirect_routes() -> actix_web::Scope {
    web::scope("")
        .route("/{code:.*}", web::get().to(RedirectService::handle_redirect))
        .route("/{code:.*}", web::head().to(RedirectService::handle_redirect))
}
