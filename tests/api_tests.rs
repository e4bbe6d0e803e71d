//! HTTP API tests
//!
//! Full route table: management API with bearer tokens, health probes, and
//! the redirect catch-all.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::test::{self, TestRequest};
use actix_web::App;
use serde_json::{Value, json};

use linkhop::api::jwt::JwtService;
use linkhop::api::middleware::{BearerAuth, RequestIdMiddleware};
use linkhop::api::services::AppStartTime;
use linkhop::config::{AccountingMode, LinksConfig, RedirectConfig};
use linkhop::runtime::lifetime::startup::RouteConfig;
use linkhop::runtime::modes::{AppState, configure_routes};
use linkhop::services::{LinkService, RedirectFlow};
use linkhop::storage::{LinkStore, MemoryStore};

const SECRET: &str = "api-test-secret";

fn test_state(auth: BearerAuth) -> AppState {
    let store: Arc<dyn LinkStore> = Arc::new(MemoryStore::new());
    AppState {
        store: store.clone(),
        redirect_flow: RedirectFlow::new(
            store.clone(),
            &RedirectConfig {
                request_timeout_ms: 3000,
                accounting: AccountingMode::Inline,
            },
        ),
        link_service: Arc::new(LinkService::new(
            store,
            LinksConfig::default(),
            vec!["api".to_string(), "health".to_string()],
        )),
        auth,
        routes: RouteConfig {
            api_prefix: "/api".to_string(),
            health_prefix: "/health".to_string(),
        },
        start_time: AppStartTime {
            start_datetime: chrono::Utc::now(),
        },
    }
}

fn jwt() -> Arc<JwtService> {
    Arc::new(JwtService::new(SECRET, None, 15))
}

fn bearer(user: &str) -> (&'static str, String) {
    (
        "Authorization",
        format!("Bearer {}", jwt().issue_token(user).unwrap()),
    )
}

#[actix_web::test]
async fn test_missing_or_bad_token_is_401() {
    let app = test::init_service(App::new().configure(configure_routes(test_state(
        BearerAuth::new(jwt()),
    ))))
    .await;

    let resp = test::call_service(&app, TestRequest::get().uri("/api/links").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1001);

    // 没有 CORS 层，OPTIONS 也要鉴权
    let resp = test::call_service(
        &app,
        TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/api/links")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let forged = JwtService::new("another-secret", None, 15)
        .issue_token("user-1")
        .unwrap();
    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/links")
            .insert_header(("Authorization", format!("Bearer {}", forged)))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_management_disabled_without_secret() {
    let app = test::init_service(App::new().configure(configure_routes(test_state(
        BearerAuth::from_config(&Default::default()),
    ))))
    .await;

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/links")
            .insert_header(bearer("user-1"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_create_redirect_and_list_round_trip() {
    let app = test::init_service(App::new().configure(configure_routes(test_state(
        BearerAuth::new(jwt()),
    ))))
    .await;

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/links")
            .insert_header(bearer("user-1"))
            .set_json(json!({ "original_url": "example.com/page", "code": "abc123" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["code"], "abc123");
    assert_eq!(body["data"]["clicks"], 0);

    let resp = test::call_service(&app, TestRequest::get().uri("/abc123").to_request()).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        resp.headers().get(LOCATION).unwrap(),
        "https://example.com/page"
    );

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/links")
            .insert_header(bearer("user-1"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["clicks"], 1);

    // 其他用户看不到
    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/links")
            .insert_header(bearer("user-2"))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_create_errors_use_envelope() {
    let app = test::init_service(App::new().configure(configure_routes(test_state(
        BearerAuth::new(jwt()),
    ))))
    .await;

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/links")
            .insert_header(bearer("user-1"))
            .set_json(json!({ "original_url": "javascript:alert(1)" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1000);

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/links")
            .insert_header(bearer("user-1"))
            .set_json(json!({ "original_url": "https://example.com/a\nb", "code": "newline" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1000);
    let resp = test::call_service(&app, TestRequest::get().uri("/newline").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/links")
            .insert_header(bearer("user-1"))
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1000);

    for _ in 0..2 {
        let resp = test::call_service(
            &app,
            TestRequest::post()
                .uri("/api/links")
                .insert_header(bearer("user-1"))
                .set_json(json!({ "original_url": "https://a.example", "code": "same" }))
                .to_request(),
        )
        .await;
        if resp.status() != StatusCode::CREATED {
            assert_eq!(resp.status(), StatusCode::CONFLICT);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["code"], 3001);
        }
    }
}

#[actix_web::test]
async fn test_update_and_delete_are_owner_only() {
    let app = test::init_service(App::new().configure(configure_routes(test_state(
        BearerAuth::new(jwt()),
    ))))
    .await;

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/links")
            .insert_header(bearer("owner"))
            .set_json(json!({ "original_url": "https://before.example" }))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let code = body["data"]["code"].as_str().unwrap().to_string();

    let resp = test::call_service(
        &app,
        TestRequest::put()
            .uri(&format!("/api/links/{}", id))
            .insert_header(bearer("intruder"))
            .set_json(json!({ "original_url": "https://evil.example" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        TestRequest::put()
            .uri(&format!("/api/links/{}", id))
            .insert_header(bearer("owner"))
            .set_json(json!({ "original_url": "https://after.example" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp =
        test::call_service(&app, TestRequest::get().uri(&format!("/{}", code)).to_request()).await;
    assert_eq!(
        resp.headers().get(LOCATION).unwrap(),
        "https://after.example"
    );

    let resp = test::call_service(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/links/{}", id))
            .insert_header(bearer("intruder"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/links/{}", id))
            .insert_header(bearer("owner"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp =
        test::call_service(&app, TestRequest::get().uri(&format!("/{}", code)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_health_endpoints() {
    let app = test::init_service(
        App::new()
            .wrap(RequestIdMiddleware)
            .configure(configure_routes(test_state(BearerAuth::new(jwt())))),
    )
    .await;

    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["storage"]["storage_type"], "memory");
    assert_eq!(body["data"]["storage"]["links_count"], 0);

    let resp = test::call_service(&app, TestRequest::get().uri("/health/live").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp =
        test::call_service(&app, TestRequest::get().uri("/health/ready").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_request_id_is_propagated() {
    let app = test::init_service(
        App::new()
            .wrap(RequestIdMiddleware)
            .configure(configure_routes(test_state(BearerAuth::new(jwt())))),
    )
    .await;

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/health/ready")
            .insert_header(("X-Request-ID", "trace-abc"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "trace-abc");
}
