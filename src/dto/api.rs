//! DTOs exposed by the sales API endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::client::{ClientRecord, DocumentKind};

/// JSON envelope wrapping every API response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            pagination: None,
            count: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_pagination(mut self, pagination: PaginationMeta) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

impl ApiResponse<()> {
    /// Error envelope: `{ success: false, message }`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            pagination: None,
            count: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl PaginationMeta {
    pub fn new(page: usize, page_size: usize, total: usize) -> Self {
        Self {
            page,
            page_size,
            total,
            total_pages: total.div_ceil(page_size.max(1)),
        }
    }
}

/// Raw query string of `GET /api/sales/clients`.
///
/// Numbers are kept as text so that non-numeric values fall back to defaults
/// instead of failing the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQueryParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub search: Option<String>,
}

/// Raw query string of `GET /api/sales/clients/recent`.
#[derive(Debug, Default, Deserialize)]
pub struct RecentQueryParams {
    pub limit: Option<String>,
}

/// Page of clients returned by [`crate::services::client::list_clients`].
#[derive(Debug)]
pub struct ClientsPage {
    pub clients: Vec<ClientRecord>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

impl ClientsPage {
    pub fn pagination(&self) -> PaginationMeta {
        PaginationMeta::new(self.page, self.page_size, self.total)
    }
}

/// Document stored while creating a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedDocument {
    pub kind: DocumentKind,
    pub url: String,
}

/// Payload of a successful `POST /api/sales/clients/with-documents`.
///
/// Keys follow the snake_case of the flattened client record.
#[derive(Debug, Serialize)]
pub struct ClientWithDocuments {
    #[serde(flatten)]
    pub client: ClientRecord,
    pub uploaded_documents: Vec<UploadedDocument>,
}
