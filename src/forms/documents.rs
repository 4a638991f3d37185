use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use actix_web::web;

use crate::domain::client::{DocumentKind, DocumentUpload};
use crate::forms::FormError;
use crate::forms::client::ClientPayload;

/// Multipart body of `POST /api/sales/clients/with-documents`.
#[derive(MultipartForm)]
pub struct ClientWithDocumentsForm {
    /// Client attributes as a JSON document.
    #[multipart(rename = "clientData", limit = "1MB")]
    pub client_data: Text<String>,
    #[multipart(limit = "10MB")]
    pub pan_card: Option<TempFile>,
    #[multipart(limit = "10MB")]
    pub aadhar_card: Option<TempFile>,
    #[multipart(limit = "10MB")]
    pub photo: Option<TempFile>,
    #[multipart(limit = "20MB")]
    pub policy_document: Option<TempFile>,
}

impl ClientWithDocumentsForm {
    /// Splits the form into the client payload and the non-empty documents.
    pub async fn into_parts(self) -> Result<(ClientPayload, Vec<DocumentUpload>), FormError> {
        let payload = serde_json::from_str::<ClientPayload>(&self.client_data.0)
            .map_err(|err| FormError::Malformed(err.to_string()))?;

        let files = [
            (DocumentKind::PanCard, self.pan_card),
            (DocumentKind::AadharCard, self.aadhar_card),
            (DocumentKind::Photo, self.photo),
            (DocumentKind::PolicyDocument, self.policy_document),
        ];

        let mut documents = Vec::new();
        for (kind, file) in files {
            if let Some(document) = read_document(kind, file).await {
                documents.push(document);
            }
        }

        Ok((payload, documents))
    }
}

/// Reads a spooled upload off the worker thread. Absent, empty and unreadable
/// files yield `None`.
async fn read_document(kind: DocumentKind, file: Option<TempFile>) -> Option<DocumentUpload> {
    let TempFile {
        file,
        content_type,
        file_name,
        size,
    } = file?;
    if size == 0 {
        return None;
    }

    let bytes = match web::block(move || std::fs::read(file.path())).await {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(err)) => {
            log::error!("Failed to read uploaded {}: {err}", kind.field_name());
            return None;
        }
        Err(err) => {
            log::error!("Failed to read uploaded {}: {err}", kind.field_name());
            return None;
        }
    };

    Some(DocumentUpload {
        kind,
        file_name,
        content_type: content_type.map(|mime| mime.to_string()),
        bytes,
    })
}
