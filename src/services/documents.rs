use std::path::Path;

use chrono::Utc;

use crate::blob::BlobStore;
use crate::domain::auth::Principal;
use crate::domain::client::{DocumentKind, DocumentUpload, NewClientRecord};
use crate::domain::types::ClientId;
use crate::dto::api::{ClientWithDocuments, UploadedDocument};
use crate::forms::client::ClientPayload;
use crate::repository::{ClientReader, ClientWriter};
use crate::services::ServiceResult;
use crate::services::client::{ensure_unique, insert_client, prepare_client};

const FALLBACK_EXTENSION: &str = "bin";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Blob name of a document: `<client_id>/<kind>-<unix_millis>.<ext>`.
pub fn blob_name(
    client_id: &ClientId,
    kind: DocumentKind,
    file_name: Option<&str>,
    timestamp_millis: i64,
) -> String {
    let extension = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());

    format!(
        "{client_id}/{}-{timestamp_millis}.{extension}",
        kind.field_name()
    )
}

/// Uploads every document and records the resulting URLs on `client`.
/// A failed upload is logged and the document skipped.
pub async fn upload_documents<S>(
    store: &S,
    client: &mut NewClientRecord,
    documents: Vec<DocumentUpload>,
) -> Vec<UploadedDocument>
where
    S: BlobStore,
{
    let mut uploaded = Vec::with_capacity(documents.len());

    for document in documents {
        let name = blob_name(
            &client.id,
            document.kind,
            document.file_name.as_deref(),
            Utc::now().timestamp_millis(),
        );
        let content_type = document
            .content_type
            .as_deref()
            .unwrap_or(FALLBACK_CONTENT_TYPE);

        match store.upload(&name, content_type, document.bytes).await {
            Ok(url) => {
                client.details.set_document_url(document.kind, url.clone());
                uploaded.push(UploadedDocument {
                    kind: document.kind,
                    url,
                });
            }
            Err(err) => {
                log::error!(
                    "Failed to upload {} for client {}: {err}",
                    document.kind.field_name(),
                    client.id
                );
            }
        }
    }

    uploaded
}

/// Creates a client and attaches the uploaded documents.
///
/// The payload is validated and checked for duplicates before anything is
/// written to blob storage.
pub async fn create_client_with_documents<R, S>(
    repo: &R,
    store: &S,
    principal: &Principal,
    payload: ClientPayload,
    documents: Vec<DocumentUpload>,
) -> ServiceResult<ClientWithDocuments>
where
    R: ClientReader + ClientWriter + ?Sized,
    S: BlobStore,
{
    let mut client = prepare_client(principal, payload)?;
    ensure_unique(repo, &client)?;

    let uploaded_documents = upload_documents(store, &mut client, documents).await;
    let client = match insert_client(repo, &client) {
        Ok(client) => client,
        Err(err) => {
            if !uploaded_documents.is_empty() {
                let orphaned = uploaded_documents
                    .iter()
                    .map(|document| document.url.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                log::warn!(
                    "Client {} was not stored, orphaned blobs: {orphaned}",
                    client.id
                );
            }
            return Err(err);
        }
    };

    log::info!(
        "Client {} created with {} document(s)",
        client.id,
        uploaded_documents.len()
    );

    Ok(ClientWithDocuments {
        client,
        uploaded_documents,
    })
}
