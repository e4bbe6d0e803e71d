use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, info, trace};

use crate::api::jwt::JwtService;
use crate::api::services::types::{ApiResponse, ErrorCode};
use crate::config::AuthConfig;

/// Caller identity taken from a verified token; handlers read it with
/// `web::ReqData<AuthenticatedUser>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub owner_id: String,
}

/// Bearer token authentication middleware
///
/// Without a configured secret the guarded scope answers 404.
#[derive(Clone)]
pub struct BearerAuth {
    jwt: Option<Arc<JwtService>>,
}

impl BearerAuth {
    pub fn new(jwt: Arc<JwtService>) -> Self {
        Self { jwt: Some(jwt) }
    }

    pub fn from_config(auth: &AuthConfig) -> Self {
        if auth.jwt_secret.is_empty() {
            Self { jwt: None }
        } else {
            Self::new(Arc::new(JwtService::from_config(auth)))
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddleware {
            service: Rc::new(service),
            jwt: self.jwt.clone(),
        }))
    }
}

pub struct BearerAuthMiddleware<S> {
    service: Rc<S>,
    jwt: Option<Arc<JwtService>>,
}

impl<S, B> BearerAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// Handle requests when no JWT secret is configured
    fn handle_missing_secret(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        debug!("JWT secret not configured - returning 404");
        req.into_response(
            HttpResponse::NotFound()
                .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                .body("Not Found")
                .map_into_right_body(),
        )
    }

    /// Handle unauthorized requests
    fn handle_unauthorized(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        req.into_response(
            HttpResponse::Unauthorized()
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(ApiResponse::<()> {
                    code: ErrorCode::Unauthorized as i32,
                    message: "Unauthorized: Invalid or missing token".to_string(),
                    data: None,
                })
                .map_into_right_body(),
        )
    }

    /// 从 Authorization header 提取 Bearer token
    fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let jwt = self.jwt.clone();

        Box::pin(async move {
            let Some(jwt) = jwt else {
                return Ok(Self::handle_missing_secret(req));
            };

            let Some(token) = Self::extract_bearer_token(&req) else {
                info!("Authentication failed - missing bearer token");
                return Ok(Self::handle_unauthorized(req));
            };

            match jwt.validate_token(&token) {
                Ok(claims) => {
                    trace!("Bearer token accepted for {}", claims.sub);
                    req.extensions_mut().insert(AuthenticatedUser {
                        owner_id: claims.sub,
                    });
                    let response = srv.call(req).await?.map_into_left_body();
                    Ok(response)
                }
                Err(e) => {
                    info!("Bearer token validation failed: {}", e);
                    Ok(Self::handle_unauthorized(req))
                }
            }
        })
    }
}
