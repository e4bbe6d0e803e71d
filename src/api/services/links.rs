//! `/links` 管理接口：只操作调用者自己的链接

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use tracing::trace;

use super::types::{LinkResponse, PostNewLink, PutLink, error_from_linkhop, success_response};
use crate::api::middleware::AuthenticatedUser;
use crate::services::{CreateLinkRequest, LinkService};

pub async fn list_links(
    user: web::ReqData<AuthenticatedUser>,
    service: web::Data<LinkService>,
) -> HttpResponse {
    trace!("API: list links for {}", user.owner_id);
    match service.list_links(&user.owner_id).await {
        Ok(links) => success_response(
            StatusCode::OK,
            links.into_iter().map(LinkResponse::from).collect::<Vec<_>>(),
        ),
        Err(e) => error_from_linkhop(&e),
    }
}

pub async fn create_link(
    user: web::ReqData<AuthenticatedUser>,
    body: web::Json<PostNewLink>,
    service: web::Data<LinkService>,
) -> HttpResponse {
    let body = body.into_inner();
    let req = CreateLinkRequest {
        original_url: body.original_url,
        code: body.code,
    };
    match service.create_link(&user.owner_id, req).await {
        Ok(link) => success_response(StatusCode::CREATED, LinkResponse::from(link)),
        Err(e) => error_from_linkhop(&e),
    }
}

pub async fn update_link(
    user: web::ReqData<AuthenticatedUser>,
    id: web::Path<String>,
    body: web::Json<PutLink>,
    service: web::Data<LinkService>,
) -> HttpResponse {
    match service
        .update_link(&user.owner_id, &id, &body.original_url)
        .await
    {
        Ok(link) => success_response(StatusCode::OK, LinkResponse::from(link)),
        Err(e) => error_from_linkhop(&e),
    }
}

pub async fn delete_link(
    user: web::ReqData<AuthenticatedUser>,
    id: web::Path<String>,
    service: web::Data<LinkService>,
) -> HttpResponse {
    match service.delete_link(&user.owner_id, &id).await {
        Ok(()) => success_response(StatusCode::OK, serde_json::json!({ "deleted": id.as_str() })),
        Err(e) => error_from_linkhop(&e),
    }
}

/// 链接管理路由 `/links`
pub fn links_routes() -> actix_web::Scope {
    web::scope("/links")
        .route("", web::get().to(list_links))
        .route("", web::post().to(create_link))
        .route("/{id}", web::put().to(update_link))
        .route("/{id}", web::delete().to(delete_link))
}
