//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_max_connections() -> u32 {
    10
}

fn default_auth_timeout_secs() -> u64 {
    5
}

fn default_upload_timeout_secs() -> u64 {
    30
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Upper bound of concurrently checked-out database connections.
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,
    pub auth: AuthConfig,
    pub blob: BlobConfig,
}

#[derive(Clone, Debug, Deserialize)]
/// Settings of the bearer token resolver.
pub struct AuthConfig {
    /// Remote endpoint validating tokens. When absent only local verification is used.
    #[serde(default)]
    pub service_url: Option<String>,
    /// Shared HS256 secret for local verification.
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "default_auth_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
/// Where uploaded client documents are stored.
pub enum BlobConfig {
    /// Object storage reachable over HTTP (`PUT {endpoint}/{container}/{blob}`).
    Http {
        endpoint: String,
        container: String,
        /// Query string appended to upload requests (e.g. a SAS token).
        #[serde(default)]
        sas_token: Option<String>,
        #[serde(default = "default_upload_timeout_secs")]
        timeout_secs: u64,
    },
    /// Local directory, mostly for development and tests.
    Local {
        root_dir: String,
        container: String,
        /// Base URL the stored files are served from.
        public_url: String,
    },
}
