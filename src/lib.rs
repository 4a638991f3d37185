#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "data")]
pub mod schema;

#[cfg(feature = "server")]
pub mod blob;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

#[cfg(feature = "server")]
pub use server::{configure, run};

#[cfg(feature = "server")]
mod server {
    use actix_multipart::form::MultipartFormConfig;
    use actix_multipart::form::text::TextConfig;
    use actix_web::{App, HttpServer, middleware, web};

    use crate::blob::BlobStorage;
    use crate::db::establish_connection_pool;
    use crate::models::config::ServerConfig;
    use crate::repository::DieselRepository;
    use crate::routes::client::{
        create_client, create_client_with_documents, list_clients, recent_clients,
    };
    use crate::routes::{
        health, json_error_handler, multipart_error_handler, not_found, query_error_handler,
    };
    use crate::services::auth::AuthResolver;

    /// Upper bound of a whole multipart request (client data plus every document).
    const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

    /// Registers the routes and the extractor configuration. Handlers expect
    /// `web::Data` of [`DieselRepository`], [`AuthResolver`] and [`BlobStorage`].
    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(
                MultipartFormConfig::default()
                    .total_limit(MAX_UPLOAD_BYTES)
                    .error_handler(multipart_error_handler),
            )
            // `clientData` is JSON but often sent without an explicit text/plain part type.
            .app_data(TextConfig::default().validate_content_type(false))
            .service(health)
            .service(
                web::scope("/api/sales")
                    .service(create_client_with_documents)
                    .service(create_client)
                    .service(recent_clients)
                    .service(list_clients),
            );
    }

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        // Establish Diesel connection pool for the SQLite database.
        let pool = establish_connection_pool(
            &server_config.database_url,
            server_config.database_max_connections,
        )
        .map_err(|e| {
            std::io::Error::other(format!("Failed to establish database connection: {e}"))
        })?;

        let repo = web::Data::new(DieselRepository::new(pool));

        let resolver = AuthResolver::new(&server_config.auth)
            .map_err(|e| std::io::Error::other(format!("Failed to build auth client: {e}")))?;
        if server_config.auth.service_url.is_none() && server_config.auth.jwt_secret.is_none() {
            log::warn!("Neither an auth service URL nor a JWT secret is configured");
        }
        let resolver = web::Data::new(resolver);

        let storage = BlobStorage::from_config(&server_config.blob)
            .map_err(|e| std::io::Error::other(format!("Failed to set up blob storage: {e}")))?;
        let storage = web::Data::new(storage);
        if let BlobStorage::Local(store) = storage.get_ref() {
            if store.files().is_none() {
                log::warn!("Local blob public_url has no path; stored documents are not served");
            }
        }

        let bind_address = (server_config.address.clone(), server_config.port);
        log::info!(
            "Starting sales clients service on {}:{}",
            server_config.address,
            server_config.port
        );

        HttpServer::new(move || {
            let mut app = App::new()
                .wrap(middleware::Logger::default())
                .app_data(repo.clone())
                .app_data(resolver.clone())
                .app_data(storage.clone())
                .configure(configure);
            if let BlobStorage::Local(store) = storage.get_ref() {
                if let Some(files) = store.files() {
                    app = app.service(files);
                }
            }
            app.default_service(web::route().to(not_found))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
