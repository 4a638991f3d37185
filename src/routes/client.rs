use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, get, post, web};

use crate::blob::BlobStorage;
use crate::domain::auth::Principal;
use crate::dto::api::{ApiResponse, ListQueryParams, RecentQueryParams};
use crate::forms::client::ClientPayload;
use crate::forms::documents::ClientWithDocumentsForm;
use crate::repository::DieselRepository;
use crate::services::{ServiceError, client as client_service, documents as document_service};

const CLIENT_CREATED: &str = "Client created successfully";

#[post("/clients")]
pub async fn create_client(
    principal: Principal,
    repo: web::Data<DieselRepository>,
    payload: web::Json<ClientPayload>,
) -> Result<HttpResponse, ServiceError> {
    let client = client_service::create_client(repo.get_ref(), &principal, payload.into_inner())?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(client).with_message(CLIENT_CREATED)))
}

#[post("/clients/with-documents")]
pub async fn create_client_with_documents(
    principal: Principal,
    repo: web::Data<DieselRepository>,
    storage: web::Data<BlobStorage>,
    MultipartForm(form): MultipartForm<ClientWithDocumentsForm>,
) -> Result<HttpResponse, ServiceError> {
    let (payload, documents) = form.into_parts().await?;

    let created = document_service::create_client_with_documents(
        repo.get_ref(),
        storage.get_ref(),
        &principal,
        payload,
        documents,
    )
    .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(created).with_message(CLIENT_CREATED)))
}

#[get("/clients")]
pub async fn list_clients(
    principal: Principal,
    repo: web::Data<DieselRepository>,
    params: web::Query<ListQueryParams>,
) -> Result<HttpResponse, ServiceError> {
    let page = client_service::list_clients(repo.get_ref(), &principal, &params)?;
    let pagination = page.pagination();
    let count = page.clients.len();

    Ok(HttpResponse::Ok().json(
        ApiResponse::ok(page.clients)
            .with_pagination(pagination)
            .with_count(count),
    ))
}

#[get("/clients/recent")]
pub async fn recent_clients(
    principal: Principal,
    repo: web::Data<DieselRepository>,
    params: web::Query<RecentQueryParams>,
) -> Result<HttpResponse, ServiceError> {
    let clients = client_service::recent_clients(repo.get_ref(), &principal, &params)?;
    let count = clients.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(clients).with_count(count)))
}
