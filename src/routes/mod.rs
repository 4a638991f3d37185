//! HTTP handlers and the error hooks that keep every answer in the JSON envelope.

use actix_multipart::MultipartError;
use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{Error, HttpRequest, HttpResponse, Responder, get};
use chrono::Utc;
use serde_json::json;

use crate::dto::api::ApiResponse;
use crate::services::ServiceError;

pub mod client;

/// Liveness probe, no authentication.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(
        ApiResponse::ok(json!({
            "status": "ok",
            "timestamp": Utc::now().to_rfc3339(),
        }))
        .with_message("Sales clients service is running"),
    )
}

/// Fallback for unmatched routes.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error("Route not found"))
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    ServiceError::Validation(format!("Invalid JSON body: {err}")).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    ServiceError::Validation(format!("Invalid query string: {err}")).into()
}

pub fn multipart_error_handler(err: MultipartError, _req: &HttpRequest) -> Error {
    ServiceError::Validation(format!("Invalid multipart body: {err}")).into()
}
