//! Storage of uploaded client documents.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use actix_files::Files;
use actix_web::web;
use thiserror::Error;

use crate::models::config::BlobConfig;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upload rejected with status {0}")]
    Status(u16),

    #[error("Blocking task failed: {0}")]
    Blocking(String),
}

/// Container scoped object storage.
pub trait BlobStore {
    /// Stores `bytes` under `blob_name` and returns the URL the blob can be retrieved from.
    fn upload(
        &self,
        blob_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> impl Future<Output = Result<String, BlobError>>;
}

/// Block blob upload over HTTP (`PUT {endpoint}/{container}/{blob}[?sas]`).
#[derive(Clone)]
pub struct HttpBlobStore {
    http: reqwest::Client,
    endpoint: String,
    container: String,
    sas_token: Option<String>,
}

impl HttpBlobStore {
    pub fn new(
        endpoint: &str,
        container: &str,
        sas_token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, BlobError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            container: container.trim_matches('/').to_string(),
            sas_token: sas_token
                .map(|token| token.trim_start_matches('?').to_string())
                .filter(|token| !token.is_empty()),
        })
    }

    pub fn blob_url(&self, blob_name: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.container, blob_name)
    }
}

impl BlobStore for HttpBlobStore {
    async fn upload(
        &self,
        blob_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, BlobError> {
        let url = self.blob_url(blob_name);
        let request_url = match &self.sas_token {
            Some(sas) => format!("{url}?{sas}"),
            None => url.clone(),
        };

        let response = self
            .http
            .put(request_url)
            .header("x-ms-blob-type", "BlockBlob")
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BlobError::Status(response.status().as_u16()));
        }

        Ok(url)
    }
}

/// Stores blobs below a local directory, one subdirectory per container.
#[derive(Clone)]
pub struct LocalBlobStore {
    root_dir: PathBuf,
    container: String,
    public_url: String,
}

impl LocalBlobStore {
    pub fn new(root_dir: impl Into<PathBuf>, container: &str, public_url: &str) -> Self {
        Self {
            root_dir: root_dir.into(),
            container: container.trim_matches('/').to_string(),
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    /// Static file service exposing the stored blobs under the path of
    /// `public_url`. `None` when that URL has no path to mount on.
    pub fn files(&self) -> Option<Files> {
        let public_url = reqwest::Url::parse(&self.public_url).ok()?;
        let mount_path = public_url.path().trim_end_matches('/');
        if mount_path.is_empty() {
            return None;
        }
        Some(Files::new(mount_path, &self.root_dir))
    }

    fn path_of(&self, blob_name: &str) -> PathBuf {
        blob_name
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
            .fold(self.root_dir.join(&self.container), |path, segment| {
                path.join(segment)
            })
    }
}

impl BlobStore for LocalBlobStore {
    async fn upload(
        &self,
        blob_name: &str,
        _content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, BlobError> {
        let path = self.path_of(blob_name);

        web::block(move || {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, bytes)
        })
        .await
        .map_err(|err| BlobError::Blocking(err.to_string()))??;

        Ok(format!("{}/{}/{}", self.public_url, self.container, blob_name))
    }
}

/// Configured blob backend shared by the request handlers.
#[derive(Clone)]
pub enum BlobStorage {
    Http(HttpBlobStore),
    Local(LocalBlobStore),
}

impl BlobStorage {
    pub fn from_config(config: &BlobConfig) -> Result<Self, BlobError> {
        match config {
            BlobConfig::Http {
                endpoint,
                container,
                sas_token,
                timeout_secs,
            } => Ok(BlobStorage::Http(HttpBlobStore::new(
                endpoint,
                container,
                sas_token.as_deref(),
                Duration::from_secs(*timeout_secs),
            )?)),
            BlobConfig::Local {
                root_dir,
                container,
                public_url,
            } => {
                std::fs::create_dir_all(root_dir)?;
                Ok(BlobStorage::Local(LocalBlobStore::new(
                    root_dir, container, public_url,
                )))
            }
        }
    }
}

impl BlobStore for BlobStorage {
    async fn upload(
        &self,
        blob_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, BlobError> {
        match self {
            BlobStorage::Http(store) => store.upload(blob_name, content_type, bytes).await,
            BlobStorage::Local(store) => store.upload(blob_name, content_type, bytes).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_urls_exclude_the_sas_token() {
        let store = HttpBlobStore::new(
            "https://acct.blob.core.windows.net/",
            "client-documents",
            Some("?sv=2024&sig=abc"),
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(
            store.blob_url("C0123abcd/photo-1.png"),
            "https://acct.blob.core.windows.net/client-documents/C0123abcd/photo-1.png"
        );
        assert_eq!(store.sas_token.as_deref(), Some("sv=2024&sig=abc"));
    }

    #[test]
    fn local_paths_stay_inside_the_container() {
        let store = LocalBlobStore::new("/srv/blobs", "docs", "http://localhost/files/");
        assert_eq!(
            store.path_of("../../etc/passwd"),
            PathBuf::from("/srv/blobs/docs/etc/passwd")
        );
    }

    #[test]
    fn local_files_mount_on_public_url_path() {
        let mounted = LocalBlobStore::new("/srv/blobs", "docs", "http://localhost:8080/uploads/");
        assert!(mounted.files().is_some());

        let bare_host = LocalBlobStore::new("/srv/blobs", "docs", "http://files.test");
        assert!(bare_host.files().is_none());
    }

    #[actix_web::test]
    async fn local_store_writes_file_and_returns_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "docs", "http://localhost:8080/files/");

        let url = store
            .upload("C0123abcd/pan_card-1.pdf", "application/pdf", b"%PDF".to_vec())
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:8080/files/docs/C0123abcd/pan_card-1.pdf");
        let stored = std::fs::read(dir.path().join("docs/C0123abcd/pan_card-1.pdf")).unwrap();
        assert_eq!(stored, b"%PDF");
    }
}
