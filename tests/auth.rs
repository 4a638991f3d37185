use std::net::TcpListener;
use std::time::Duration;

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use jsonwebtoken::get_current_timestamp;
use serde_json::json;

use sales_clients::domain::auth::Role;
use sales_clients::models::config::AuthConfig;
use sales_clients::services::ServiceError;
use sales_clients::services::auth::{AuthResolver, RemoteOutcome};

mod common;

async fn valid_user(req: HttpRequest) -> HttpResponse {
    let authorized = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer "));
    if !authorized {
        return HttpResponse::BadRequest().finish();
    }
    HttpResponse::Ok().json(json!({
        "user": { "id": 7, "email": "remote@example.com", "role": "sales" }
    }))
}

async fn viewer_user() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "user": { "id": "v-1", "email": "viewer@example.com", "role": "viewer" }
    }))
}

async fn revoked_token() -> HttpResponse {
    HttpResponse::Unauthorized().json(json!({ "success": false, "message": "Token revoked" }))
}

async fn garbled_body() -> HttpResponse {
    HttpResponse::Ok().body("definitely not json")
}

async fn slow_service() -> HttpResponse {
    actix_web::rt::time::sleep(Duration::from_secs(3)).await;
    HttpResponse::Ok().json(json!({
        "user": { "id": 7, "email": "remote@example.com", "role": "sales" }
    }))
}

/// Starts a throwaway auth service answering `/validate` with `handler`.
fn spawn_auth_service<F, Fut>(handler: F) -> String
where
    F: Fn(HttpRequest) -> Fut + Clone + Send + 'static,
    Fut: std::future::Future<Output = HttpResponse> + 'static,
{
    let server = HttpServer::new(move || {
        App::new().route("/validate", web::get().to(handler.clone()))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{addr}/validate")
}

fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/validate")
}

fn resolver(service_url: Option<String>, timeout_secs: u64) -> AuthResolver {
    AuthResolver::new(&AuthConfig {
        service_url,
        jwt_secret: Some(common::JWT_SECRET.to_string()),
        timeout_secs,
    })
    .unwrap()
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[actix_web::test]
async fn remote_validation_resolves_principal() {
    let url = spawn_auth_service(valid_user);
    let token = common::token(json!(99), "admin");

    let principal = resolver(Some(url), 5)
        .resolve(Some(&bearer(&token)))
        .await
        .unwrap();

    // The remote answer wins over the local claims.
    assert_eq!(principal.id, "7");
    assert_eq!(principal.email, "remote@example.com");
    assert_eq!(principal.role, Role::Sales);
}

#[actix_web::test]
async fn remote_viewer_role_is_forbidden() {
    let url = spawn_auth_service(|_req: HttpRequest| viewer_user());
    let token = common::token(json!(1), "sales");

    let result = resolver(Some(url), 5).resolve(Some(&bearer(&token))).await;
    assert!(matches!(result, Err(ServiceError::Forbidden(_))));
}

#[actix_web::test]
async fn remote_rejection_is_propagated_without_fallback() {
    let url = spawn_auth_service(|_req: HttpRequest| revoked_token());
    // Locally this token verifies fine.
    let token = common::token(json!(1), "sales");

    let result = resolver(Some(url), 5).resolve(Some(&bearer(&token))).await;
    match result {
        Err(ServiceError::Upstream { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Token revoked");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[actix_web::test]
async fn malformed_remote_answer_is_rejected() {
    let url = spawn_auth_service(|_req: HttpRequest| garbled_body());
    let resolver = resolver(Some(url.clone()), 5);
    let token = common::token(json!(1), "sales");

    let outcome = resolver.validate_remote(&url, &token).await;
    assert!(matches!(outcome, RemoteOutcome::Rejected { status: 401, .. }));
}

#[actix_web::test]
async fn remote_timeout_falls_back_to_local_verification() {
    let url = spawn_auth_service(|_req: HttpRequest| slow_service());
    let token = common::token(json!(42), "sales");

    let principal = resolver(Some(url), 1)
        .resolve(Some(&bearer(&token)))
        .await
        .unwrap();

    assert_eq!(principal.id, "42");
    assert_eq!(principal.role, Role::Sales);
}

#[actix_web::test]
async fn unreachable_service_falls_back_to_local_verification() {
    let token = common::token(json!("rep-5"), "admin");

    let principal = resolver(Some(closed_port_url()), 5)
        .resolve(Some(&bearer(&token)))
        .await
        .unwrap();

    assert_eq!(principal.id, "rep-5");
    assert_eq!(principal.role, Role::Admin);
}

#[actix_web::test]
async fn fallback_still_rejects_foreign_signatures() {
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &json!({ "id": 1, "role": "sales", "exp": get_current_timestamp() + 60 }),
        &jsonwebtoken::EncodingKey::from_secret(b"someone-else"),
    )
    .unwrap();

    let result = resolver(Some(closed_port_url()), 5)
        .resolve(Some(&bearer(&token)))
        .await;
    assert!(matches!(result, Err(ServiceError::Unauthorized(_))));
}

#[actix_web::test]
async fn expired_tokens_are_unauthorized_on_every_path() {
    let token = common::signed(json!({
        "id": 1,
        "email": "rep@example.com",
        "role": "sales",
        "exp": get_current_timestamp() - 10,
    }));

    let remote = spawn_auth_service(valid_user);
    for service_url in [Some(remote), Some(closed_port_url()), None] {
        let result = resolver(service_url, 5).resolve(Some(&bearer(&token))).await;
        assert!(matches!(result, Err(ServiceError::Unauthorized(_))));
    }
}

#[actix_web::test]
async fn missing_or_malformed_header_is_unauthorized() {
    let resolver = resolver(None, 5);
    assert!(matches!(
        resolver.resolve(None).await,
        Err(ServiceError::Unauthorized(_))
    ));
    assert!(matches!(
        resolver.resolve(Some("Token abc")).await,
        Err(ServiceError::Unauthorized(_))
    ));
}
